use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid content: {0}")]
    InvalidContent(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
