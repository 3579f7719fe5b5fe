use thiserror::Error;

/// Top-level error type for the relay pipeline.
///
/// The `Display` text of these variants is what the sender sees in a failure
/// reply, so messages stay short and never include secrets.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("credentials error: {0}")]
    Credentials(String),

    #[error("content download failed: {0}")]
    ContentFetch(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("reply failed: {0}")]
    Reply(String),
}

pub type RelayResult<T> = std::result::Result<T, RelayError>;
