use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::screening::PhotoUpload;
use crate::entities::values::Category;

/// Used when the upload name has no usable extension
const DEFAULT_EXTENSION: &str = "jpg";

/// Photo storage errors
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Invalid {0} photo data")]
    InvalidData(&'static str),

    #[error("Failed to store photo: {0}")]
    Io(#[from] std::io::Error),
}

/// Which identity document a photo shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Aadhar,
    Shramik,
}

impl PhotoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoKind::Aadhar => "aadhar",
            PhotoKind::Shramik => "shramik",
        }
    }
}

/// Writes decoded photos to `<upload_dir>/<category>_<kind>/<uuid>.<ext>`
#[derive(Debug, Clone)]
pub struct PhotoStore {
    upload_dir: PathBuf,
}

impl PhotoStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Decode and write one photo, returning the stored path
    pub async fn save(
        &self,
        category: Category,
        kind: PhotoKind,
        upload: &PhotoUpload,
    ) -> Result<String, PhotoError> {
        let bytes = decode(&upload.data).ok_or_else(|| {
            warn!("Rejected undecodable {} photo", kind.as_str());
            PhotoError::InvalidData(kind.as_str())
        })?;

        let dir = self
            .upload_dir
            .join(format!("{}_{}", category.as_str(), kind.as_str()));
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}.{}",
            Uuid::new_v4(),
            extension(upload.name.as_deref())
        );
        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        debug!("Stored {} photo at {}", kind.as_str(), path.display());
        Ok(path.to_string_lossy().replace('\\', "/"))
    }

    /// Delete photos written for a screening that was not stored
    pub async fn discard(&self, paths: &[&str]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Failed to remove orphaned photo {}: {}", path, e);
            } else {
                debug!("Removed orphaned photo {}", path);
            }
        }
    }
}

/// Plain base64 or a `data:` URL; empty input is invalid
fn decode(data: &str) -> Option<Vec<u8>> {
    let payload = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if payload.is_empty() {
        return None;
    }
    STANDARD.decode(payload).ok()
}

/// Lowercase alphanumeric extension of `name`, else the default
fn extension(name: Option<&str>) -> String {
    name.and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
