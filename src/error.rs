/// Failure of a single generate request. All variants are treated the same by
/// the view: logged, recorded, and the previous image stays.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Connection refused, timeout, or body read failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no generated image to save")]
    NoImage,

    #[error("image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
