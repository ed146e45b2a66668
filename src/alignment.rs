//! Video–comment alignment: cosine similarity between a video's vector
//! and the centroid of its comments' vectors, per cluster.

use crate::clusters::Cluster;
use crate::embedding::{centroid, cosine_similarity, CommentEmbeddings, VideoEmbeddings};
use crate::error::PipelineError;
use crate::index::CommentIndex;
use anyhow::Result;
use serde::Serialize;

/// One output row; field order matches the persisted CSV.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentRow {
    pub cosine_similarity: f32,
    pub video_id: String,
}

/// Compute alignment for every video of a cluster.
///
/// Videos with zero retained comments are omitted (expected absence);
/// so are videos whose own vector or comment centroid has zero magnitude
/// (degenerate, logged at debug). A retained video without a vector in
/// the store is fatal, as is any gap between the index and the comment
/// store: both sides must come from the same deduplicated sequence.
pub fn align_cluster(
    cluster: &Cluster,
    videos: &VideoEmbeddings,
    index: &CommentIndex,
    comments: &CommentEmbeddings,
) -> Result<Vec<AlignmentRow>> {
    if !videos.is_empty() && !comments.is_empty() && videos.dim() != comments.dim() {
        return Err(PipelineError::DimensionMismatch {
            stage: "alignment",
            unit: "embedding dimensions",
            expected: videos.dim(),
            actual: comments.dim(),
        }
        .into());
    }

    let mut rows = Vec::new();
    for video in &cluster.videos {
        let v = videos.get(&video.video_id).ok_or_else(|| PipelineError::MissingEmbedding {
            stage: "alignment",
            kind: "video",
            id: video.video_id.clone(),
        })?;

        let ordinals = index.comments_for(&video.video_id);
        if ordinals.is_empty() {
            tracing::debug!(video = %video.video_id, "no comments; skipping alignment");
            continue;
        }

        let mut member_vecs = Vec::with_capacity(ordinals.len());
        for &ordinal in ordinals {
            let c = comments.get(ordinal).ok_or_else(|| PipelineError::DimensionMismatch {
                stage: "alignment",
                unit: "comment vectors",
                expected: index.len(),
                actual: comments.len(),
            })?;
            member_vecs.push(c);
        }
        let center = centroid(&member_vecs, comments.dim());

        match cosine_similarity(v, &center) {
            Some(cos) => rows.push(AlignmentRow {
                cosine_similarity: cos,
                video_id: video.video_id.clone(),
            }),
            None => {
                tracing::debug!(video = %video.video_id, "degenerate embedding; excluded from alignment");
            }
        }
    }

    Ok(rows)
}
