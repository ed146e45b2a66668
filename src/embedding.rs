//! Identifier-keyed embedding stores and the vector math used by the
//! alignment and cohesion stages. Vectors arrive as JSONL artifacts from
//! the external sentence-embedding collaborator; keying them by id
//! (video id, comment ordinal) instead of array position removes silent
//! misalignment between reruns.

use crate::error::PipelineError;
use ahash::AHashMap;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Cosine similarity, `None` when either vector has zero magnitude
/// (callers exclude such pairs instead of propagating NaN). Both slices
/// must share a dimension; stores validate that on load.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return None;
    }
    Some(dot / (na * nb))
}

/// Arithmetic mean of a non-empty set of equal-dimension vectors.
pub fn centroid(vectors: &[&[f32]], dim: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; dim];
    if vectors.is_empty() {
        return out;
    }
    for v in vectors {
        for (acc, x) in out.iter_mut().zip(v.iter()) {
            *acc += *x;
        }
    }
    let n = vectors.len() as f32;
    for acc in &mut out {
        *acc /= n;
    }
    out
}

#[derive(Debug, Deserialize)]
struct VideoVectorRow {
    video_id: String,
    vector: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct CommentVectorRow {
    comment_id: u32,
    vector: Vec<f32>,
}

/// Dense vectors keyed by video id.
#[derive(Debug)]
pub struct VideoEmbeddings {
    dim: usize,
    map: AHashMap<String, Vec<f32>>,
}

impl VideoEmbeddings {
    /// Load `{"video_id": ..., "vector": [...]}` JSONL. Duplicate ids and
    /// dimension drift are fatal.
    pub fn load_jsonl(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let r = BufReader::new(f);

        let mut dim = 0usize;
        let mut map: AHashMap<String, Vec<f32>> = AHashMap::new();
        for (lineno, line) in r.lines().enumerate() {
            let line = line.with_context(|| format!("read {}", path.display()))?;
            if line.is_empty() {
                continue;
            }
            let row: VideoVectorRow = serde_json::from_str(&line).map_err(|e| {
                PipelineError::MalformedRecord {
                    stage: "video embeddings",
                    at: format!("{}:{}", path.display(), lineno + 1),
                    detail: e.to_string(),
                }
            })?;
            if map.is_empty() {
                dim = row.vector.len();
            } else if row.vector.len() != dim {
                return Err(PipelineError::DimensionMismatch {
                    stage: "video embeddings",
                    unit: "vector dimensions",
                    expected: dim,
                    actual: row.vector.len(),
                }
                .into());
            }
            if map.insert(row.video_id.clone(), row.vector).is_some() {
                return Err(PipelineError::MalformedRecord {
                    stage: "video embeddings",
                    at: format!("{}:{}", path.display(), lineno + 1),
                    detail: format!("duplicate video id {}", row.video_id),
                }
                .into());
            }
        }

        Ok(Self { dim, map })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, video_id: &str) -> Option<&[f32]> {
        self.map.get(video_id).map(|v| v.as_slice())
    }
}

/// Dense vectors keyed by comment ordinal, covering every entry of the
/// comment index exactly once.
#[derive(Debug)]
pub struct CommentEmbeddings {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl CommentEmbeddings {
    /// Load `{"comment_id": <ordinal>, "vector": [...]}` JSONL against an
    /// index of `expected_len` entries. Out-of-range ordinals, duplicate
    /// ordinals, dimension drift, and incomplete coverage are all fatal:
    /// centroids are only meaningful over complete, order-consistent
    /// inputs.
    pub fn load_jsonl(path: &Path, expected_len: usize) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let r = BufReader::new(f);

        let mut dim = 0usize;
        let mut filled = 0usize;
        let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected_len];
        for (lineno, line) in r.lines().enumerate() {
            let line = line.with_context(|| format!("read {}", path.display()))?;
            if line.is_empty() {
                continue;
            }
            let row: CommentVectorRow = serde_json::from_str(&line).map_err(|e| {
                PipelineError::MalformedRecord {
                    stage: "comment embeddings",
                    at: format!("{}:{}", path.display(), lineno + 1),
                    detail: e.to_string(),
                }
            })?;
            let ordinal = row.comment_id as usize;
            if ordinal >= expected_len {
                return Err(PipelineError::DimensionMismatch {
                    stage: "comment embeddings",
                    unit: "comment ordinals",
                    expected: expected_len,
                    actual: ordinal + 1,
                }
                .into());
            }
            if filled == 0 {
                dim = row.vector.len();
            } else if row.vector.len() != dim {
                return Err(PipelineError::DimensionMismatch {
                    stage: "comment embeddings",
                    unit: "vector dimensions",
                    expected: dim,
                    actual: row.vector.len(),
                }
                .into());
            }
            if slots[ordinal].is_some() {
                return Err(PipelineError::MalformedRecord {
                    stage: "comment embeddings",
                    at: format!("{}:{}", path.display(), lineno + 1),
                    detail: format!("duplicate comment ordinal {}", ordinal),
                }
                .into());
            }
            slots[ordinal] = Some(row.vector);
            filled += 1;
        }

        if filled != expected_len {
            return Err(PipelineError::DimensionMismatch {
                stage: "comment embeddings",
                unit: "comment vectors",
                expected: expected_len,
                actual: filled,
            }
            .into());
        }

        let vectors: Vec<Vec<f32>> = slots.into_iter().flatten().collect();
        Ok(Self { dim, vectors })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, ordinal: u32) -> Option<&[f32]> {
        self.vectors.get(ordinal as usize).map(|v| v.as_slice())
    }
}
