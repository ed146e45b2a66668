mod config;
mod error;
mod normalize;
mod lexicon;

mod ingest;
mod index;
mod clusters;
mod embedding;

mod alignment;
mod silhouette;
mod features;

mod progress;
mod report;
mod util;
mod pipeline;

pub use crate::config::PipelineOptions;
pub use crate::error::PipelineError;
pub use crate::pipeline::{NarrativeETL, RunSummary};

pub use crate::normalize::{clean_comment, clean_transcript, scoring_tokens, CleanMode};
pub use crate::lexicon::{ActionLexicon, LexicalScore};

pub use crate::ingest::{discover_dumps, parse_published, read_dump, CommentDump, CommentRecord, DateWindow};
pub use crate::index::{CommentIndex, IndexedComment};
pub use crate::clusters::{discover_clusters, load_cluster, Cluster, ClusterSpec, Orientation, Video};

// Expose the embedding stores and vector math for standalone use.
pub use crate::embedding::{centroid, cosine_similarity, CommentEmbeddings, VideoEmbeddings};

pub use crate::alignment::{align_cluster, AlignmentRow};
pub use crate::silhouette::{silhouette_samples, SilhouetteItem, SilhouetteRow};
pub use crate::features::{cluster_features, FeatureRow};

// Expose writers and helpers so binaries can import from the crate root.
pub use crate::report::{write_comment_corpus, write_table};
pub use crate::util::{init_tracing_once, load_word_list, replace_file_atomic};
