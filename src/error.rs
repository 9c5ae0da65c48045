use thiserror::Error;

/// Failures while loading a catalog. Every variant except `Io` is a schema
/// violation: the load is rejected as a whole and no partial catalog exists.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed catalog: missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed catalog: row {row} has no value for '{field}'")]
    MissingField { row: usize, field: String },

    #[error("Malformed catalog: duplicate title '{0}'")]
    DuplicateTitle(String),
}

impl CatalogError {
    pub fn is_schema_error(&self) -> bool {
        !matches!(self, CatalogError::Io { .. })
    }
}

/// The query title is not part of the catalog. Expected control flow: the
/// orchestrator answers it with a provider lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{title}' not found in the dataset")]
pub struct ItemNotFound {
    pub title: String,
}

/// Transient failure talking to a metadata provider. Retried, then dropped.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(String),
}
