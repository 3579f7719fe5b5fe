//! Google Drive storage for relayed files.
//!
//! Authenticates with a service-account key (JWT-bearer grant) and uploads
//! with Drive v3 multipart requests.

pub mod auth;
pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use auth::{DRIVE_FILE_SCOPE, TokenProvider};
pub use client::{DriveClient, DriveEndpoints};
pub use error::DriveError;
pub use store::DriveStore;
pub use types::{DriveFile, FolderInfo, FolderReport, Permission};
