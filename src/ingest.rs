//! Comment dump ingestion: discovery of `.json` / `.json.zst` archives,
//! decoding, and the optional published-date window.

use crate::error::PipelineError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use walkdir::WalkDir;

/// One scraped video's comment thread, as dumped by the collector.
#[derive(Debug, Deserialize)]
pub struct CommentDump {
    #[serde(rename = "VideoID")]
    pub video_id: String,
    #[serde(rename = "Comments")]
    pub comments: Vec<CommentRecord>,
}

/// One comment row: `[id, text, parent_id, like_count, published_at]`.
/// The text slot may be null for comments the API returned empty.
#[derive(Debug, Deserialize)]
pub struct CommentRecord(String, Option<String>, String, i64, String);

impl CommentRecord {
    pub fn new(
        id: impl Into<String>,
        text: Option<String>,
        parent_id: impl Into<String>,
        like_count: i64,
        published_at: impl Into<String>,
    ) -> Self {
        Self(id.into(), text, parent_id.into(), like_count, published_at.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Null text is treated as the empty string.
    pub fn text(&self) -> &str {
        self.1.as_deref().unwrap_or("")
    }

    pub fn parent_id(&self) -> &str {
        &self.2
    }

    pub fn like_count(&self) -> i64 {
        self.3
    }

    pub fn published_at(&self) -> &str {
        &self.4
    }
}

/// Inclusive publication-date window applied to comments at ingest.
#[derive(Clone, Copy, Debug)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

impl DateWindow {
    pub fn new(start: Date, end: Date) -> Self {
        assert!(start <= end, "window start must not follow its end");
        Self { start, end }
    }

    pub fn contains(&self, d: Date) -> bool {
        d >= self.start && d <= self.end
    }
}

/// Parse an RFC3339 `published_at` stamp down to its calendar date.
pub fn parse_published(raw: &str) -> Result<Date, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339).map(|dt| dt.date())
}

/// Find dump archives directly under `dir`, sorted by file name so runs
/// over the same tree flatten comments in a stable order.
pub fn discover_dumps(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if !dir.exists() {
        return out;
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        if let Ok(ent) = entry {
            if let Some(name) = ent.file_name().to_str() {
                if name.ends_with(".json") || name.ends_with(".json.zst") {
                    out.push(ent.path().to_path_buf());
                }
            }
        }
    }
    out.sort();
    out
}

/// Decode one dump archive (a JSON array of [`CommentDump`] records),
/// transparently decompressing `.json.zst`.
pub fn read_dump(path: &Path, read_buf_bytes: usize) -> Result<Vec<CommentDump>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let is_zst = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(".json.zst"))
        .unwrap_or(false);

    let parsed: Result<Vec<CommentDump>, serde_json::Error> = if is_zst {
        let dec = zstd::stream::read::Decoder::new(file)
            .with_context(|| format!("zstd decoder for {}", path.display()))?;
        serde_json::from_reader(BufReader::with_capacity(read_buf_bytes.max(8 * 1024), dec))
    } else {
        serde_json::from_reader(BufReader::with_capacity(read_buf_bytes.max(8 * 1024), file))
    };

    parsed.map_err(|e| {
        PipelineError::MalformedRecord {
            stage: "comment ingest",
            at: path.display().to_string(),
            detail: e.to_string(),
        }
        .into()
    })
}
