//! Deduplicating comment index: the unique `(cleaned text, video id)`
//! pairs of a run, in first-seen order, with an inverse video → ordinals
//! map. Built once, read-only afterwards. The ordinal (position) is the
//! comment's identifier for the rest of the run and the key comment
//! embeddings are joined on.

use crate::error::PipelineError;
use crate::ingest::{parse_published, CommentDump, DateWindow};
use crate::normalize::clean_comment;
use ahash::{AHashMap, AHashSet};
use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedComment {
    pub text: String,
    pub video_id: String,
}

#[derive(Debug, Default)]
pub struct CommentIndex {
    entries: Vec<IndexedComment>,
    by_video: AHashMap<String, Vec<u32>>,
}

impl CommentIndex {
    /// Flatten dumps in input order, clean each body, drop empties, and
    /// keep the first occurrence of every `(cleaned, video_id)` pair.
    /// Two different raw comments that clean to the same text under the
    /// same video collapse to one entry; the same text under another
    /// video stays separate.
    ///
    /// When `window` is set, comments published outside it are dropped
    /// before cleaning; an unparseable stamp is then a fatal
    /// `MalformedRecord` (dumps are controlled inputs).
    pub fn build(dumps: &[CommentDump], window: Option<DateWindow>) -> Result<Self> {
        let mut entries: Vec<IndexedComment> = Vec::new();
        let mut seen: AHashSet<(String, String)> = AHashSet::new();
        let mut by_video: AHashMap<String, Vec<u32>> = AHashMap::new();

        for dump in dumps {
            for rec in &dump.comments {
                if let Some(w) = window {
                    let date = parse_published(rec.published_at()).map_err(|e| {
                        PipelineError::MalformedRecord {
                            stage: "comment index",
                            at: format!("video {} comment {}", dump.video_id, rec.id()),
                            detail: e.to_string(),
                        }
                    })?;
                    if !w.contains(date) {
                        continue;
                    }
                }

                let cleaned = clean_comment(rec.text());
                if cleaned.is_empty() {
                    continue;
                }
                if !seen.insert((cleaned.clone(), dump.video_id.clone())) {
                    continue;
                }

                let ordinal = entries.len() as u32;
                by_video.entry(dump.video_id.clone()).or_default().push(ordinal);
                entries.push(IndexedComment {
                    text: cleaned,
                    video_id: dump.video_id.clone(),
                });
            }
        }

        Ok(Self { entries, by_video })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexedComment] {
        &self.entries
    }

    pub fn get(&self, ordinal: u32) -> Option<&IndexedComment> {
        self.entries.get(ordinal as usize)
    }

    /// Ordinals of all retained comments under `video_id`, in index
    /// order. Empty slice when the video drew no (retained) comments.
    pub fn comments_for(&self, video_id: &str) -> &[u32] {
        self.by_video.get(video_id).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
