//! Silhouette cohesion under cosine distance, computed per orientation
//! across all of its clusters jointly.
//!
//! A coefficient is defined only when the item's cluster has at least
//! two members and at least one other cluster is non-empty; otherwise
//! the row carries an explicit `None` (persisted as an empty field),
//! never a silent zero. Zero-magnitude vectors are likewise undefined
//! and excluded from everyone else's distance pools.

use crate::embedding::cosine_similarity;
use ahash::AHashMap;
use rayon::prelude::*;
use serde::Serialize;

/// One labeled, embedded video entering the cohesion computation.
#[derive(Debug, Clone)]
pub struct SilhouetteItem {
    pub video_id: String,
    pub label: String,
    pub vector: Vec<f32>,
}

/// One output row; `silhouette` is `None` when undefined.
#[derive(Debug, Clone, Serialize)]
pub struct SilhouetteRow {
    pub video_id: String,
    pub silhouette: Option<f32>,
}

/// Standard silhouette samples, `(b - a) / max(a, b)`, with the distance
/// metric fixed to cosine. Output rows are in input order, one per item.
pub fn silhouette_samples(items: &[SilhouetteItem]) -> Vec<SilhouetteRow> {
    let n = items.len();
    let mut scores: Vec<Option<f32>> = vec![None; n];

    let norms: Vec<f32> = items
        .iter()
        .map(|it| it.vector.iter().map(|x| x * x).sum::<f32>().sqrt())
        .collect();
    let valid: Vec<usize> = (0..n).filter(|&i| norms[i] > 0.0).collect();

    // positions into `valid`, grouped by cluster label
    let mut members: AHashMap<&str, Vec<usize>> = AHashMap::new();
    for (p, &i) in valid.iter().enumerate() {
        members.entry(items[i].label.as_str()).or_default().push(p);
    }

    if valid.len() >= 2 && members.len() >= 2 {
        let dist: Vec<Vec<f32>> = valid
            .par_iter()
            .map(|&i| {
                valid
                    .iter()
                    .map(|&j| {
                        if i == j {
                            0.0
                        } else {
                            // norms are nonzero for every valid item
                            1.0 - cosine_similarity(&items[i].vector, &items[j].vector)
                                .unwrap_or(0.0)
                        }
                    })
                    .collect()
            })
            .collect();

        for (p, &i) in valid.iter().enumerate() {
            let label = items[i].label.as_str();
            let own = &members[label];
            if own.len() < 2 {
                continue; // singleton cluster: coefficient undefined
            }

            let a = own
                .iter()
                .filter(|&&q| q != p)
                .map(|&q| dist[p][q])
                .sum::<f32>()
                / (own.len() - 1) as f32;

            let b = members
                .iter()
                .filter(|&(l, _)| *l != label)
                .map(|(_, qs)| qs.iter().map(|&q| dist[p][q]).sum::<f32>() / qs.len() as f32)
                .fold(f32::INFINITY, f32::min);

            let denom = a.max(b);
            scores[i] = Some(if denom == 0.0 { 0.0 } else { (b - a) / denom });
        }
    }

    items
        .iter()
        .zip(scores)
        .map(|(it, s)| SilhouetteRow {
            video_id: it.video_id.clone(),
            silhouette: s,
        })
        .collect()
}
