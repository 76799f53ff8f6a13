use thiserror::Error;

pub type Result<T> = std::result::Result<T, SerpApiError>;

#[derive(Debug, Error)]
pub enum SerpApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SerpApi error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// SerpApi reports some failures in-band with a 200 and an `error` field.
    #[error("SerpApi search failed: {0}")]
    Search(String),
}
