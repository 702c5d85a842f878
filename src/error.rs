use thiserror::Error;

/// Domain failures raised while loading, cleaning or downloading the dataset.
///
/// Library functions return `anyhow::Result`; these are the root causes that
/// callers can `downcast_ref` when they need to tell failures apart.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("archive does not contain '{0}'")]
    MissingArchiveEntry(String),

    #[error("invalid dataset handle '{0}', expected owner/name")]
    InvalidDatasetHandle(String),

    #[error("server returned {status} for {url}")]
    HttpStatus { status: u16, url: String },
}
