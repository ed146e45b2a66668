use crate::clusters::ClusterSpec;
use crate::ingest::DateWindow;
use std::path::{Path, PathBuf};

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub base_dir: PathBuf,
    pub comments_dir: PathBuf,
    pub clusters_dir: PathBuf,
    pub embeddings_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dictionary_path: PathBuf,
    pub stopwords_path: Option<PathBuf>,

    /// Explicit (orientation, label, path) triples. When None, the
    /// clusters dir is scanned for the `self_*`/`group_*` convention.
    pub cluster_specs: Option<Vec<ClusterSpec>>,
    pub date_window: Option<DateWindow>,

    pub parallelism: Option<usize>,   // Some(N) to set rayon threads, None to use default
    pub progress: bool,               // show progress bars
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity
}

impl Default for PipelineOptions {
    fn default() -> Self {
        let base = PathBuf::from("./data");
        let default_read = 256 * 1024;
        let default_write = 256 * 1024;

        Self {
            comments_dir: base.join("comments"),
            clusters_dir: base.join("clusters"),
            embeddings_dir: base.join("embeddings"),
            dictionary_path: base.join("collective_action_dic.csv"),
            base_dir: base,
            output_dir: PathBuf::from("./results"),
            stopwords_path: None,
            cluster_specs: None,
            date_window: None,
            parallelism: None,
            progress: true,
            progress_label: None,

            read_buffer_bytes: default_read,
            write_buffer_bytes: default_write,
        }
    }
}

impl PipelineOptions {
    pub fn with_base_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        let base = base_dir.as_ref().to_path_buf();
        self.comments_dir = base.join("comments");
        self.clusters_dir = base.join("clusters");
        self.embeddings_dir = base.join("embeddings");
        self.dictionary_path = base.join("collective_action_dic.csv");
        self.base_dir = base;
        self
    }
    pub fn with_comments_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.comments_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_clusters_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.clusters_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_embeddings_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.embeddings_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_dictionary(mut self, path: impl AsRef<Path>) -> Self {
        self.dictionary_path = path.as_ref().to_path_buf();
        self
    }
    pub fn with_stopwords(mut self, path: impl AsRef<Path>) -> Self {
        self.stopwords_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_cluster_specs(mut self, specs: Vec<ClusterSpec>) -> Self {
        self.cluster_specs = Some(specs);
        self
    }
    pub fn with_date_window(mut self, window: DateWindow) -> Self {
        self.date_window = Some(window);
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
