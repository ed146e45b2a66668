use crate::alignment::align_cluster;
use crate::clusters::{discover_clusters, load_cluster, ClusterSpec, Orientation};
use crate::config::PipelineOptions;
use crate::embedding::{CommentEmbeddings, VideoEmbeddings};
use crate::error::PipelineError;
use crate::features::{cluster_features, FeatureRow};
use crate::index::CommentIndex;
use crate::ingest::{discover_dumps, read_dump, DateWindow};
use crate::lexicon::ActionLexicon;
use crate::progress::ProgressScope;
use crate::report::{write_comment_corpus, write_table};
use crate::silhouette::{silhouette_samples, SilhouetteItem};
use crate::util::{init_tracing_once, load_word_list};
use ahash::{AHashMap, AHashSet};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline front-end with builder chaining, mirroring how a run is
/// described in the research scripts: a data tree in, a results tree out.
#[derive(Clone, Default)]
pub struct NarrativeETL {
    pub(crate) opts: PipelineOptions,
}

/// Counts reported after a completed run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub dump_files: usize,
    pub raw_comments: usize,
    pub unique_comments: usize,
    pub clusters: usize,
    pub videos: usize,
    pub feature_rows: usize,
    pub alignment_rows: usize,
    pub silhouette_rows: usize,
}

struct IngestStats {
    dump_files: usize,
    raw_comments: usize,
}

impl NarrativeETL {
    pub fn new() -> Self {
        Self { opts: PipelineOptions::default() }
    }

    // -------- Builder methods --------
    pub fn base_dir(mut self, base: impl AsRef<Path>) -> Self { self.opts = self.opts.with_base_dir(base); self }
    pub fn comments_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_comments_dir(dir); self }
    pub fn clusters_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_clusters_dir(dir); self }
    pub fn embeddings_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_embeddings_dir(dir); self }
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_dir(dir); self }
    pub fn dictionary(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_dictionary(path); self }
    pub fn stopwords(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_stopwords(path); self }
    pub fn cluster_specs(mut self, specs: Vec<ClusterSpec>) -> Self { self.opts = self.opts.with_cluster_specs(specs); self }
    pub fn date_window(mut self, window: DateWindow) -> Self { self.opts = self.opts.with_date_window(window); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    /// Build the comment index and export it as JSONL for the embedding
    /// collaborator (one `{comment_id, text, video_id}` row per unique
    /// comment, in index order). Returns the number of exported rows.
    pub fn export_comment_corpus(&self, out_path: &Path) -> Result<usize> {
        init_tracing_once();
        let (index, stats) = self.build_index()?;
        write_comment_corpus(out_path, &index, self.opts.write_buffer_bytes)?;
        tracing::info!(
            files = stats.dump_files,
            raw = stats.raw_comments,
            unique = index.len(),
            out = %out_path.display(),
            "comment corpus exported"
        );
        Ok(index.len())
    }

    /// Run the full pipeline: index comments, score lexical features,
    /// align videos with their comment centroids, and compute silhouette
    /// cohesion per orientation. All results land in the output dir.
    pub fn run(&self) -> Result<RunSummary> {
        init_tracing_once();
        if let Some(n) = self.opts.parallelism {
            if n > 0 {
                rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok();
            }
        }

        let lexicon = ActionLexicon::load(&self.opts.dictionary_path)?;
        let stopwords = match &self.opts.stopwords_path {
            Some(p) => load_word_list(p)?,
            None => AHashSet::new(),
        };

        let (index, ingest) = self.build_index()?;
        tracing::info!(
            files = ingest.dump_files,
            raw = ingest.raw_comments,
            unique = index.len(),
            "comment index built"
        );

        let comment_vecs =
            CommentEmbeddings::load_jsonl(&self.opts.embeddings_dir.join("comments.jsonl"), index.len())?;

        let specs = match &self.opts.cluster_specs {
            Some(v) => v.clone(),
            None => discover_clusters(&self.opts.clusters_dir),
        };
        if specs.is_empty() {
            tracing::warn!(dir = %self.opts.clusters_dir.display(), "no cluster tables found");
        }

        fs::create_dir_all(&self.opts.output_dir)
            .with_context(|| format!("create {}", self.opts.output_dir.display()))?;

        let pb = if self.opts.progress && !specs.is_empty() {
            Some(ProgressScope::count(
                self.opts.progress_label.clone().unwrap_or_else(|| "Processing clusters".to_string()),
                specs.len() as u64,
            ))
        } else {
            None
        };

        let mut summary = RunSummary {
            dump_files: ingest.dump_files,
            raw_comments: ingest.raw_comments,
            unique_comments: index.len(),
            clusters: specs.len(),
            ..Default::default()
        };
        let mut features: Vec<FeatureRow> = Vec::new();
        let mut sil_items: AHashMap<Orientation, Vec<SilhouetteItem>> = AHashMap::new();

        for spec in &specs {
            let cluster = load_cluster(spec, &stopwords)?;
            summary.videos += cluster.videos.len();

            let video_vecs = VideoEmbeddings::load_jsonl(&self.video_embeddings_path(spec))?;

            let rows = align_cluster(&cluster, &video_vecs, &index, &comment_vecs)?;
            summary.alignment_rows += rows.len();
            let out = self
                .opts
                .output_dir
                .join(format!("alignment_{}_{}.csv", spec.orientation, spec.label));
            write_table(&out, &rows)?;

            features.extend(cluster_features(&cluster, &index, &lexicon));

            let items = sil_items.entry(cluster.orientation).or_default();
            for video in &cluster.videos {
                // align_cluster already proved every retained video has a vector
                let v = video_vecs.get(&video.video_id).ok_or_else(|| {
                    PipelineError::MissingEmbedding {
                        stage: "cohesion",
                        kind: "video",
                        id: video.video_id.clone(),
                    }
                })?;
                items.push(SilhouetteItem {
                    video_id: video.video_id.clone(),
                    label: cluster.label.clone(),
                    vector: v.to_vec(),
                });
            }

            if let Some(pb) = &pb {
                pb.inc_items(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish("clusters processed");
        }

        summary.feature_rows = features.len();
        write_table(
            &self.opts.output_dir.join("collective_action_features.csv"),
            &features,
        )?;

        for orientation in [Orientation::Agency, Orientation::Communal] {
            let Some(items) = sil_items.get(&orientation) else {
                continue;
            };
            let rows = silhouette_samples(items);
            summary.silhouette_rows += rows.len();
            let out = self
                .opts
                .output_dir
                .join(format!("silhouette_{}.csv", orientation));
            write_table(&out, &rows)?;
        }

        tracing::info!(
            clusters = summary.clusters,
            videos = summary.videos,
            features = summary.feature_rows,
            alignment = summary.alignment_rows,
            silhouette = summary.silhouette_rows,
            "run complete"
        );
        Ok(summary)
    }

    fn video_embeddings_path(&self, spec: &ClusterSpec) -> PathBuf {
        self.opts
            .embeddings_dir
            .join(format!("videos_{}_{}.jsonl", spec.orientation, spec.label))
    }

    fn build_index(&self) -> Result<(CommentIndex, IngestStats)> {
        let paths = discover_dumps(&self.opts.comments_dir);
        if paths.is_empty() {
            tracing::warn!(dir = %self.opts.comments_dir.display(), "no comment dumps found");
        }

        let pb = if self.opts.progress && !paths.is_empty() {
            Some(ProgressScope::count("Reading comment dumps", paths.len() as u64))
        } else {
            None
        };

        let mut dumps = Vec::new();
        let mut raw_comments = 0usize;
        for p in &paths {
            let batch = read_dump(p, self.opts.read_buffer_bytes)?;
            raw_comments += batch.iter().map(|d| d.comments.len()).sum::<usize>();
            dumps.extend(batch);
            if let Some(pb) = &pb {
                pb.inc_items(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish("dumps read");
        }

        let index = CommentIndex::build(&dumps, self.opts.date_window)?;
        Ok((
            index,
            IngestStats {
                dump_files: paths.len(),
                raw_comments,
            },
        ))
    }
}
