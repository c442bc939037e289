use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Curl error: {0}")]
    Curl(#[from] curl::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unsupported file type: .{0}")]
    UnsupportedFileType(String),

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Coordinate conversion failed: {0}")]
    Coordinate(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;
