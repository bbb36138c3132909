//! Media host abstraction for video files and thumbnails.
//!
//! Assets live on an external, Cloudinary-compatible host. Callers hand in a
//! local file path; the host returns a public URL which is what gets stored.

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, multipart};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::MediaConfig;
use crate::{AppError, AppResult};

const SIGNATURE_ALGORITHM: &str = "sha256";

/// Kind of asset, which selects the resource type on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Video file.
    Video,
    /// Thumbnail or other image.
    Image,
}

impl MediaKind {
    /// Resource type segment used in host URLs.
    #[must_use]
    pub const fn resource_type(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedia {
    /// Public HTTPS URL of the asset.
    pub url: String,
    /// Host-side identifier.
    pub public_id: String,
    /// Duration in seconds, reported for videos.
    pub duration: Option<f64>,
}

/// Media storage backend.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a local file.
    async fn upload(&self, path: &Path, kind: MediaKind) -> AppResult<UploadedMedia>;

    /// Delete an asset by its public URL.
    async fn delete(&self, url: &str, kind: MediaKind) -> AppResult<()>;
}

/// Extract the host-side public id from an asset URL.
///
/// The id is the last path segment with its extension stripped.
#[must_use]
pub fn public_id_from_url(url: &str) -> Option<&str> {
    let last = url.trim_end_matches('/').rsplit('/').next()?;
    let id = last.split('.').next()?;
    if id.is_empty() { None } else { Some(id) }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Cloudinary-compatible HTTP client.
#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryStore {
    /// Build a client from configuration.
    pub fn new(config: &MediaConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create media client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.cloud_name,
            kind.resource_type(),
            action
        )
    }

    /// Sign request parameters: sorted `k=v` pairs joined by `&`, followed by the secret.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Signed parameters plus the credentials the host expects alongside them.
    ///
    /// The host assumes SHA-1 unless the algorithm is named.
    fn signed_params(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        let signature = self.sign(&params);
        params.push(("api_key", self.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", SIGNATURE_ALGORITHM.to_string()));
        params
    }
}

#[async_trait::async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, path: &Path, kind: MediaKind) -> AppResult<UploadedMedia> {
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            AppError::Unexpected(format!("Failed to open upload {}: {e}", path.display()))
        })?;
        let length = file
            .metadata()
            .await
            .map_err(|e| {
                AppError::Unexpected(format!("Failed to stat upload {}: {e}", path.display()))
            })?
            .len();

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let mut form = multipart::Form::new().part(
            "file",
            multipart::Part::stream_with_length(file, length).file_name(file_name),
        );
        for (key, value) in self.signed_params(vec![("timestamp", timestamp)]) {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint(kind, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Media upload failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Media upload returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid upload response: {e}")))?;

        tracing::debug!(public_id = %body.public_id, kind = ?kind, "Uploaded media");

        Ok(UploadedMedia {
            url: body.secure_url,
            public_id: body.public_id,
            duration: body.duration,
        })
    }

    async fn delete(&self, url: &str, kind: MediaKind) -> AppResult<()> {
        let public_id = public_id_from_url(url)
            .ok_or_else(|| AppError::ExternalService(format!("Cannot derive media id from {url}")))?
            .to_string();

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = self.signed_params(vec![
            ("public_id", public_id.clone()),
            ("timestamp", timestamp),
        ]);

        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Media delete failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Media delete returned {}",
                response.status()
            )));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid delete response: {e}")))?;

        // "not found" means a previous attempt already removed it
        match body.result.as_str() {
            "ok" | "not found" => {
                tracing::debug!(public_id = %public_id, result = %body.result, "Deleted media");
                Ok(())
            }
            other => Err(AppError::ExternalService(format!(
                "Media delete rejected: {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> MediaConfig {
        MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "123".to_string(),
            api_secret: "shh".to_string(),
            api_base_url: "https://api.example.com/v1_1/".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_public_id_from_url() {
        assert_eq!(
            public_id_from_url("https://res.example.com/demo/video/upload/v17/abc123.mp4"),
            Some("abc123")
        );
        assert_eq!(
            public_id_from_url("https://res.example.com/demo/image/upload/thumb"),
            Some("thumb")
        );
        assert_eq!(public_id_from_url(""), None);
    }

    #[test]
    fn test_endpoint_uses_resource_type() {
        let store = CloudinaryStore::new(&test_config()).unwrap();
        assert_eq!(
            store.endpoint(MediaKind::Video, "upload"),
            "https://api.example.com/v1_1/demo/video/upload"
        );
        assert_eq!(
            store.endpoint(MediaKind::Image, "destroy"),
            "https://api.example.com/v1_1/demo/image/destroy"
        );
    }

    #[test]
    fn test_sign_sorts_params() {
        let store = CloudinaryStore::new(&test_config()).unwrap();

        let a = store.sign(&[
            ("timestamp", "1700000000".to_string()),
            ("public_id", "abc".to_string()),
        ]);
        let b = store.sign(&[
            ("public_id", "abc".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);
        assert_eq!(a, b);

        let expected = hex::encode(Sha256::digest(b"public_id=abc&timestamp=1700000000shh"));
        assert_eq!(a, expected);
    }

    #[test]
    fn test_signed_params_name_algorithm() {
        let store = CloudinaryStore::new(&test_config()).unwrap();

        let params = store.signed_params(vec![("timestamp", "1700000000".to_string())]);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        };

        assert_eq!(get("api_key").as_deref(), Some("123"));
        assert_eq!(get("signature_algorithm").as_deref(), Some("sha256"));
        assert_eq!(
            get("signature"),
            Some(hex::encode(Sha256::digest(b"timestamp=1700000000shh")))
        );
    }

    #[tokio::test]
    async fn test_upload_of_missing_file_hides_path() {
        let store = CloudinaryStore::new(&test_config()).unwrap();

        let err = store
            .upload(Path::new("/nonexistent/vidhub-upload.mp4"), MediaKind::Video)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unexpected(_)));
        assert_eq!(err.public_message(), "Internal server error");
    }
}
