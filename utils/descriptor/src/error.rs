use thiserror::Error;

/// Errors produced while decoding descriptor trees.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The input was not a valid JSON encoding of a descriptor.
    #[error("malformed descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A node carried an empty `type` string.
    #[error("descriptor at {path:?} has an empty type")]
    EmptyType {
        /// Child-index path of the offending node.
        path: Vec<usize>,
    },
}
