//! Drive v3 wire types.

use linedrive_core::UploadedFile;
use serde::{Deserialize, Serialize};

/// Fields requested when creating a file.
pub const CREATE_FIELDS: &str = "id,name,webViewLink,webContentLink,parents";
/// Fields requested when inspecting the target folder.
pub const FOLDER_FIELDS: &str = "id,name,mimeType,driveId,trashed,capabilities(canAddChildren)";
/// Fields requested when listing permissions.
pub const PERMISSION_FIELDS: &str = "permissions(id,type,role,emailAddress,domain)";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub web_content_link: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
}

impl From<DriveFile> for UploadedFile {
    fn from(file: DriveFile) -> Self {
        UploadedFile {
            id: file.id,
            name: file.name,
            view_link: file.web_view_link,
            content_link: file.web_content_link,
            parent_id: file.parents.into_iter().next(),
        }
    }
}

/// Metadata sent in the first part of a multipart upload.
#[derive(Debug, Serialize)]
pub struct FileMetadata<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<&'a str>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Permission {
    /// Anyone with the link may read.
    pub fn anyone_reader() -> Self {
        Self {
            id: None,
            kind: "anyone".into(),
            role: "reader".into(),
            email_address: None,
            domain: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PermissionList {
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInfo {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    #[serde(default)]
    pub drive_id: Option<String>,
    #[serde(default)]
    pub trashed: bool,
    #[serde(default)]
    pub capabilities: Option<FolderCapabilities>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderCapabilities {
    #[serde(default)]
    pub can_add_children: bool,
}

/// What the service account can see of the upload target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderReport {
    pub service_account: String,
    pub folder: FolderInfo,
    pub is_folder: bool,
    pub permissions: Vec<Permission>,
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleErrorBody {
    pub error: GoogleError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleError {
    #[serde(default)]
    pub message: String,
}
