//! Per-comment lexical feature rows for a cluster's comment set.

use crate::clusters::Cluster;
use crate::index::CommentIndex;
use crate::lexicon::ActionLexicon;
use crate::normalize::scoring_tokens;
use serde::Serialize;

/// One retained comment of a cluster's videos; field order matches the
/// persisted CSV. `relative_freq` is NaN when the comment tokenizes to
/// nothing.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    pub text: String,
    pub video_id: String,
    pub token_count: usize,
    pub relative_freq: f64,
    pub narrative: String,
    pub comment_id: u32,
}

/// Score every comment of every video in the cluster, in video order
/// then index order. The comment ordinal doubles as the row identifier.
pub fn cluster_features(
    cluster: &Cluster,
    index: &CommentIndex,
    lexicon: &ActionLexicon,
) -> Vec<FeatureRow> {
    let narrative = cluster.narrative();
    let mut rows = Vec::new();
    for video in &cluster.videos {
        for &ordinal in index.comments_for(&video.video_id) {
            let Some(entry) = index.get(ordinal) else {
                continue;
            };
            let tokens = scoring_tokens(&entry.text);
            let score = lexicon.score(&tokens);
            rows.push(FeatureRow {
                text: entry.text.clone(),
                video_id: entry.video_id.clone(),
                token_count: tokens.len(),
                relative_freq: score.relative_freq,
                narrative: narrative.clone(),
                comment_id: ordinal,
            });
        }
    }
    rows
}
