use thiserror::Error;

/// Convenient result alias for the cable routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// These are run-level failures. Per-segment topology failures are reported
/// through [`crate::topology::TopologyError`] and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// A rule or the default referenced a catalog id with no configured product.
    #[error("cable product '{catalog_id}' is not configured in the catalog")]
    MissingCableProduct { catalog_id: String },

    /// Raised when the run configuration fails validation.
    #[error("invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the configuration file")]
    ProjectDirsUnavailable,

    /// Raised when the drawing snapshot contains unusable entities.
    #[error("invalid drawing input: {message}")]
    InputValidation { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
