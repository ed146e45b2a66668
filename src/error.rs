use thiserror::Error;

/// Fatal structural failures. Expected absences (a video with no comments,
/// a zero-magnitude vector) are not errors; they are filtered at the point
/// where they occur.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A controlled input file contained a record we could not decode.
    #[error("{stage}: malformed record at {at}: {detail}")]
    MalformedRecord {
        stage: &'static str,
        at: String,
        detail: String,
    },

    /// Two parallel collections disagree on shape (vector dimensions,
    /// comment-ordinal coverage, and the like).
    #[error("{stage}: expected {expected} {unit}, found {actual}")]
    DimensionMismatch {
        stage: &'static str,
        unit: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A retained video or comment has no vector in the supplied store.
    #[error("{stage}: no embedding for {kind} {id}")]
    MissingEmbedding {
        stage: &'static str,
        kind: &'static str,
        id: String,
    },
}
