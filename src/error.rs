//! Error types for schema setup.

/// Errors that abort a setup run.
///
/// Steps applied before the failure stay applied. Rerunning is safe.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The server could not be reached.
    #[error("cannot reach database: {0}")]
    Connection(String),

    /// The connecting principal may not modify the schema.
    #[error("permission denied: {0}")]
    Permission(String),

    /// An existing index is incompatible with the declared one.
    #[error("index conflict on {collection}.{index}: {detail}")]
    IndexConflict {
        collection: String,
        index: String,
        detail: String,
    },

    /// An existing collection has incompatible options.
    #[error("collection conflict on {collection}: {detail}")]
    CollectionConflict { collection: String, detail: String },

    /// Any other driver failure.
    #[error("database error: {0}")]
    Database(String),

    /// A setting could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = SetupError> = std::result::Result<T, E>;
