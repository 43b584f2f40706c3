//! Error types for the data model.

/// Errors raised by the data model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The board has no column with this index.
    #[error("board has no column {0}")]
    NoSuchColumn(usize),

    /// The card catalog could not be parsed.
    #[error("invalid catalog: {0}")]
    Catalog(#[source] serde_json::Error),
}
