use linedrive_config::CredentialError;
use linedrive_core::RelayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("invalid service account private key: {0}")]
    InvalidKey(String),

    #[error("token exchange failed: {0}")]
    Token(String),

    #[error("Drive API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for DriveError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url().to_string())
    }
}

impl From<DriveError> for RelayError {
    fn from(err: DriveError) -> Self {
        match err {
            DriveError::Credentials(e) => RelayError::Credentials(e.to_string()),
            DriveError::InvalidKey(_) | DriveError::Token(_) => {
                RelayError::Credentials(err.to_string())
            }
            other => RelayError::Upload(other.to_string()),
        }
    }
}
