//! Cluster-labeled video tables: orientation tags, table discovery by the
//! external `self_*` / `group_*` naming convention, and CSV loading with
//! per-table video dedup and transcript cleaning.

use crate::error::PipelineError;
use crate::normalize::{clean_transcript, CleanMode};
use ahash::AHashSet;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How a video frames participation: agency-oriented ("self") or
/// communal-oriented ("group"). Assigned by which table the video came
/// from; mutually exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Orientation {
    Agency,
    Communal,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Agency => "self",
            Orientation::Communal => "group",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "self" => Some(Orientation::Agency),
            "group" => Some(Orientation::Communal),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved (orientation, cluster label, table path) triple. Carrying
/// the triple explicitly keeps downstream stages independent of the file
/// naming convention that produced it.
#[derive(Clone, Debug)]
pub struct ClusterSpec {
    pub orientation: Orientation,
    pub label: String,
    pub path: PathBuf,
}

/// Scan `dir` for cluster tables named `self_*<n>.csv` / `group_*<n>.csv`
/// (trailing numeric suffix = cluster label) and return resolved specs,
/// sorted by orientation then label then path.
pub fn discover_clusters(dir: &Path) -> Vec<ClusterSpec> {
    let re = Regex::new(r"^(self|group)_(?:.+_)?(\d+)\.csv$").unwrap();
    let mut specs = Vec::new();
    if !dir.exists() {
        return specs;
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        if let Ok(ent) = entry {
            if let Some(name) = ent.file_name().to_str() {
                if let Some(caps) = re.captures(name) {
                    let Some(orientation) = Orientation::parse(&caps[1]) else {
                        continue;
                    };
                    specs.push(ClusterSpec {
                        orientation,
                        label: caps[2].to_string(),
                        path: ent.path().to_path_buf(),
                    });
                }
            }
        }
    }
    specs.sort_by(|a, b| {
        (a.orientation, &a.label, &a.path).cmp(&(b.orientation, &b.label, &b.path))
    });
    specs
}

#[derive(Debug, Deserialize)]
struct VideoRow {
    #[serde(rename = "Video ID")]
    video_id: String,
    #[serde(rename = "Video Transcript")]
    transcript: String,
}

#[derive(Clone, Debug)]
pub struct Video {
    pub video_id: String,
    pub transcript: String,
}

#[derive(Debug)]
pub struct Cluster {
    pub orientation: Orientation,
    pub label: String,
    pub videos: Vec<Video>,
}

impl Cluster {
    /// Narrative tag used in the feature table, e.g. `self_3`.
    pub fn narrative(&self) -> String {
        format!("{}_{}", self.orientation, self.label)
    }
}

/// Load one cluster table: dedup videos by first occurrence of
/// `Video ID`, clean transcripts, and drop videos whose cleaned
/// transcript collapses to empty. A row missing the required columns is
/// a fatal `MalformedRecord`.
pub fn load_cluster(spec: &ClusterSpec, stopwords: &AHashSet<String>) -> Result<Cluster> {
    let mut rdr = csv::Reader::from_path(&spec.path)
        .with_context(|| format!("open cluster table {}", spec.path.display()))?;

    let mut seen: AHashSet<String> = AHashSet::new();
    let mut videos = Vec::new();
    let mut dropped = 0usize;

    for row in rdr.deserialize::<VideoRow>() {
        let row = row.map_err(|e| PipelineError::MalformedRecord {
            stage: "cluster table",
            at: spec.path.display().to_string(),
            detail: e.to_string(),
        })?;
        if !seen.insert(row.video_id.clone()) {
            continue;
        }
        let transcript = clean_transcript(&row.transcript, stopwords, CleanMode::Transcript);
        if transcript.is_empty() {
            dropped += 1;
            continue;
        }
        videos.push(Video {
            video_id: row.video_id,
            transcript,
        });
    }

    if dropped > 0 {
        tracing::debug!(
            table = %spec.path.display(),
            dropped,
            "videos with empty cleaned transcript excluded"
        );
    }

    Ok(Cluster {
        orientation: spec.orientation,
        label: spec.label.clone(),
        videos,
    })
}
