//! `FileStore` backed by Google Drive.
//!
//! Credentials are resolved on first use rather than at startup, so a relay
//! started without credentials still answers every media message with a
//! failure reply instead of refusing to boot.

use std::sync::Arc;

use async_trait::async_trait;
use linedrive_config::{CredentialSettings, resolve_credentials};
use linedrive_core::{FetchedContent, FileStore, RelayResult, UploadedFile};
use media::upload_content_type;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::auth::TokenProvider;
use crate::client::{DRIVE_TIMEOUT, DriveClient, DriveEndpoints, FOLDER_MIME_TYPE};
use crate::error::DriveError;
use crate::types::{FolderReport, Permission};

pub struct DriveStore {
    credentials: CredentialSettings,
    folder_id: Option<String>,
    endpoints: DriveEndpoints,
    http: Client,
    client: Mutex<Option<Arc<DriveClient>>>,
}

impl DriveStore {
    pub fn new(
        credentials: CredentialSettings,
        folder_id: Option<String>,
    ) -> Result<Self, DriveError> {
        Self::with_endpoints(credentials, folder_id, DriveEndpoints::default())
    }

    pub fn with_endpoints(
        credentials: CredentialSettings,
        folder_id: Option<String>,
        endpoints: DriveEndpoints,
    ) -> Result<Self, DriveError> {
        let http = Client::builder().timeout(DRIVE_TIMEOUT).build()?;
        Ok(Self {
            credentials,
            folder_id,
            endpoints,
            http,
            client: Mutex::new(None),
        })
    }

    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    /// The authenticated client, resolving credentials on first call.
    ///
    /// Failures are not cached; the next call tries again.
    pub async fn client(&self) -> Result<Arc<DriveClient>, DriveError> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        let resolved = resolve_credentials(&self.credentials).await?;
        let tokens = TokenProvider::new(resolved.key, self.http.clone())?;
        let client = Arc::new(DriveClient::new(
            Arc::new(tokens),
            self.http.clone(),
            self.endpoints.clone(),
        ));
        info!(service_account = %client.service_account(), "Drive client ready");
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Inspect the target folder: metadata plus its permission list.
    pub async fn folder_report(&self) -> Result<Option<FolderReport>, DriveError> {
        let Some(folder_id) = self.folder_id.as_deref() else {
            return Ok(None);
        };
        let client = self.client().await?;
        let folder = client.get_folder(folder_id).await?;
        let permissions = client.list_permissions(folder_id).await?;
        let is_folder = folder.mime_type == FOLDER_MIME_TYPE;
        if !is_folder {
            warn!(folder_id, mime_type = %folder.mime_type, "Upload target is not a folder");
        }
        Ok(Some(FolderReport {
            service_account: client.service_account().to_string(),
            folder,
            is_folder,
            permissions,
        }))
    }
}

#[async_trait]
impl FileStore for DriveStore {
    fn name(&self) -> &str {
        "google-drive"
    }

    async fn upload(&self, content: &FetchedContent) -> RelayResult<UploadedFile> {
        let client = self.client().await?;
        let mime_type = upload_content_type(content);
        let file = client
            .create_file(
                &content.file_name,
                &mime_type,
                self.folder_id.as_deref(),
                content.data.clone(),
            )
            .await?;
        Ok(file.into())
    }

    async fn grant_public_read(&self, file_id: &str) -> RelayResult<()> {
        let client = self.client().await?;
        client
            .create_permission(file_id, &Permission::anyone_reader())
            .await?;
        info!(file_id, "Granted anyone-with-link read access");
        Ok(())
    }
}
