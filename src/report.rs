//! Result writers. Every table is written to a `.inprogress` sibling and
//! atomically promoted, so a failed run never leaves a truncated file
//! where downstream analysis expects a complete one.

use crate::index::CommentIndex;
use crate::util::replace_file_atomic;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialize `rows` as a headered CSV at `path`.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let tmp = path.with_extension("csv.inprogress");
    {
        let mut w = csv::Writer::from_path(&tmp)
            .with_context(|| format!("create {}", tmp.display()))?;
        for row in rows {
            w.serialize(row)
                .with_context(|| format!("write row to {}", tmp.display()))?;
        }
        w.flush().with_context(|| format!("flush {}", tmp.display()))?;
    }
    replace_file_atomic(&tmp, path)
}

#[derive(Serialize)]
struct CorpusRow<'a> {
    comment_id: u32,
    text: &'a str,
    video_id: &'a str,
}

/// Export the deduplicated index as JSONL, one row per unique comment in
/// index order. The embedding collaborator encodes these rows and hands
/// vectors back keyed by `comment_id`, which keeps both sides of the
/// join on the same ordered sequence.
pub fn write_comment_corpus(path: &Path, index: &CommentIndex, write_buf_bytes: usize) -> Result<()> {
    let tmp = path.with_extension("jsonl.inprogress");
    {
        let f = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        let mut w = BufWriter::with_capacity(write_buf_bytes.max(8 * 1024), f);
        for (i, entry) in index.entries().iter().enumerate() {
            let row = CorpusRow {
                comment_id: i as u32,
                text: &entry.text,
                video_id: &entry.video_id,
            };
            serde_json::to_writer(&mut w, &row)
                .with_context(|| format!("write row to {}", tmp.display()))?;
            w.write_all(b"\n")?;
        }
        w.flush().with_context(|| format!("flush {}", tmp.display()))?;
    }
    replace_file_atomic(&tmp, path)
}
