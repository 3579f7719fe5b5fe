//! Drive v3 REST client.

use std::sync::Arc;
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::TokenProvider;
use crate::error::DriveError;
use crate::types::{
    CREATE_FIELDS, DriveFile, FOLDER_FIELDS, FileMetadata, FolderInfo, GoogleErrorBody,
    PERMISSION_FIELDS, Permission, PermissionList,
};

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Timeout for Drive calls, uploads included.
pub const DRIVE_TIMEOUT: Duration = Duration::from_secs(120);

/// Base URL of the Google APIs host.
#[derive(Debug, Clone)]
pub struct DriveEndpoints {
    pub api_base: String,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com".to_string(),
        }
    }
}

pub struct DriveClient {
    tokens: Arc<TokenProvider>,
    http: Client,
    endpoints: DriveEndpoints,
}

impl DriveClient {
    pub fn new(tokens: Arc<TokenProvider>, http: Client, endpoints: DriveEndpoints) -> Self {
        Self {
            tokens,
            http,
            endpoints,
        }
    }

    pub fn service_account(&self) -> &str {
        self.tokens.client_email()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.api_base.trim_end_matches('/'), path)
    }

    /// Create a file with content in one multipart request.
    pub async fn create_file(
        &self,
        name: &str,
        mime_type: &str,
        parent: Option<&str>,
        data: Bytes,
    ) -> Result<DriveFile, DriveError> {
        let metadata = FileMetadata {
            name,
            parents: parent.into_iter().collect(),
        };
        let boundary = format!("linedrive-{}", Uuid::new_v4().simple());
        let body = multipart_related(&boundary, &metadata, mime_type, &data)?;

        let token = self.tokens.access_token().await?;
        let res = self
            .http
            .post(self.url("/upload/drive/v3/files"))
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", CREATE_FIELDS),
            ])
            .bearer_auth(token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await?;

        let file: DriveFile = read_json(res).await?;
        info!(file_id = %file.id, name = %file.name, bytes = data.len(), "Created Drive file");
        Ok(file)
    }

    /// Add a permission to a file or folder.
    pub async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
    ) -> Result<Permission, DriveError> {
        let token = self.tokens.access_token().await?;
        let res = self
            .http
            .post(self.url(&format!("/drive/v3/files/{file_id}/permissions")))
            .query(&[("supportsAllDrives", "true")])
            .bearer_auth(token)
            .json(permission)
            .send()
            .await?;
        read_json(res).await
    }

    /// Folder metadata as seen by the service account.
    pub async fn get_folder(&self, folder_id: &str) -> Result<FolderInfo, DriveError> {
        let token = self.tokens.access_token().await?;
        let res = self
            .http
            .get(self.url(&format!("/drive/v3/files/{folder_id}")))
            .query(&[("supportsAllDrives", "true"), ("fields", FOLDER_FIELDS)])
            .bearer_auth(token)
            .send()
            .await?;
        read_json(res).await
    }

    pub async fn list_permissions(&self, file_id: &str) -> Result<Vec<Permission>, DriveError> {
        let token = self.tokens.access_token().await?;
        let res = self
            .http
            .get(self.url(&format!("/drive/v3/files/{file_id}/permissions")))
            .query(&[("supportsAllDrives", "true"), ("fields", PERMISSION_FIELDS)])
            .bearer_auth(token)
            .send()
            .await?;
        let list: PermissionList = read_json(res).await?;
        Ok(list.permissions)
    }
}

/// Build a `multipart/related` body: JSON metadata part, then the media part.
fn multipart_related(
    boundary: &str,
    metadata: &FileMetadata<'_>,
    mime_type: &str,
    data: &[u8],
) -> Result<Bytes, DriveError> {
    let meta_json = serde_json::to_vec(metadata)
        .map_err(|e| DriveError::Http(format!("failed to encode metadata: {e}")))?;

    let mut body = BytesMut::with_capacity(data.len() + meta_json.len() + 256);
    body.put_slice(format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n").as_bytes());
    body.put_slice(&meta_json);
    body.put_slice(format!("\r\n--{boundary}\r\nContent-Type: {mime_type}\r\n\r\n").as_bytes());
    body.put_slice(data);
    body.put_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Ok(body.freeze())
}

/// Decode a successful response, or turn Google's error envelope into `DriveError::Api`.
async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, DriveError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let raw = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&raw)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(raw);
    warn!(status = status.as_u16(), message = %message, "Drive API request failed");
    Err(DriveError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::auth::test_support::test_key;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Mount a token endpoint on `server` and return a client pointed at it.
    pub async fn client_for(server: &MockServer) -> DriveClient {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.drive-test",
                "expires_in": 3600
            })))
            .mount(server)
            .await;
        let tokens = TokenProvider::new(test_key(&format!("{}/token", server.uri())), Client::new())
            .unwrap();
        DriveClient::new(
            Arc::new(tokens),
            Client::new(),
            DriveEndpoints {
                api_base: server.uri(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::client_for;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn drive_timeout_allows_large_uploads() {
        assert_eq!(DRIVE_TIMEOUT, Duration::from_secs(120));
    }

    #[test]
    fn multipart_body_has_both_parts() {
        let meta = FileMetadata {
            name: "a.jpg",
            parents: vec!["folder1"],
        };
        let body = multipart_related("B", &meta, "image/jpeg", b"JPEGDATA").unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--B\r\nContent-Type: application/json"));
        assert!(text.contains(r#"{"name":"a.jpg","parents":["folder1"]}"#));
        assert!(text.contains("Content-Type: image/jpeg\r\n\r\nJPEGDATA\r\n--B--"));
    }

    #[tokio::test]
    async fn create_file_uploads_multipart() {
        let server = MockServer::start().await;
        let drive = client_for(&server).await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .and(query_param("uploadType", "multipart"))
            .and(query_param("supportsAllDrives", "true"))
            .and(header("authorization", "Bearer ya29.drive-test"))
            .and(body_string_contains(r#""parents":["folder1"]"#))
            .and(body_string_contains("hello bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "file-1",
                "name": "note.txt",
                "webViewLink": "https://drive.google.com/file/d/file-1/view",
                "parents": ["folder1"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = drive
            .create_file(
                "note.txt",
                "text/plain",
                Some("folder1"),
                Bytes::from_static(b"hello bytes"),
            )
            .await
            .unwrap();
        assert_eq!(file.id, "file-1");
        assert_eq!(file.parents, vec!["folder1".to_string()]);
    }

    #[tokio::test]
    async fn api_error_message_is_extracted() {
        let server = MockServer::start().await;
        let drive = client_for(&server).await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "Service Accounts do not have storage quota."
                }
            })))
            .mount(&server)
            .await;

        let err = drive
            .create_file("a", "text/plain", None, Bytes::new())
            .await
            .unwrap_err();
        match err {
            DriveError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Service Accounts do not have storage quota.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn grants_anyone_reader() {
        let server = MockServer::start().await;
        let drive = client_for(&server).await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files/file-1/permissions"))
            .and(body_json(json!({ "type": "anyone", "role": "reader" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "anyoneWithLink",
                "type": "anyone",
                "role": "reader"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let perm = drive
            .create_permission("file-1", &Permission::anyone_reader())
            .await
            .unwrap();
        assert_eq!(perm.id.as_deref(), Some("anyoneWithLink"));
    }

    #[tokio::test]
    async fn reads_folder_and_permissions() {
        let server = MockServer::start().await;
        let drive = client_for(&server).await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/folder1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "folder1",
                "name": "Uploads",
                "mimeType": FOLDER_MIME_TYPE,
                "capabilities": { "canAddChildren": true }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/folder1/permissions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "permissions": [
                    { "id": "1", "type": "user", "role": "writer",
                      "emailAddress": "relay@demo.iam.gserviceaccount.com" }
                ]
            })))
            .mount(&server)
            .await;

        let folder = drive.get_folder("folder1").await.unwrap();
        assert_eq!(folder.name, "Uploads");
        assert!(folder.capabilities.unwrap().can_add_children);

        let perms = drive.list_permissions("folder1").await.unwrap();
        assert_eq!(perms.len(), 1);
        assert_eq!(perms[0].role, "writer");
    }
}
