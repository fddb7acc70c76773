use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Extensions accepted by the upload endpoint.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "pdf"];

/// Manages the directory behind `/uploads`.
///
/// Stored names are generated (UUIDv7 plus the validated extension) so client
/// filenames never reach the filesystem.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    base_dir: PathBuf,
}

impl UploadStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Creates the uploads directory if it does not exist.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await.map_err(|e| {
            Error::Internal(format!(
                "Failed to create uploads directory {:?}: {}",
                self.base_dir, e
            ))
        })
    }

    /// Persists an uploaded file and returns the stored name.
    pub async fn save(&self, original_name: &str, data: Bytes) -> Result<String> {
        let extension = validate_extension(original_name)?;
        let stored_name = format!("{}.{}", Uuid::now_v7(), extension);
        let path = self.base_dir.join(&stored_name);

        fs::write(&path, data)
            .await
            .map_err(|e| Error::Internal(format!("Failed to write upload {:?}: {}", path, e)))?;

        Ok(stored_name)
    }

    /// Removes a stored file by name. The name must be a bare filename.
    pub async fn remove(&self, stored_name: &str) -> Result<()> {
        validate_stored_name(stored_name)?;
        let path = self.base_dir.join(stored_name);

        if !path.exists() {
            return Err(Error::NotFound("Archivo no encontrado".to_string()));
        }

        fs::remove_file(&path)
            .await
            .map_err(|e| Error::Internal(format!("Failed to remove upload {:?}: {}", path, e)))
    }
}

/// Extracts and validates the file extension against the allowlist.
fn validate_extension(filename: &str) -> Result<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| Error::Validation("El archivo no tiene extensión".to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::Validation(format!(
            "Tipo de archivo no permitido: .{}",
            extension
        )));
    }

    Ok(extension)
}

/// Rejects names that could escape the uploads directory.
fn validate_stored_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(Error::Validation("Nombre de archivo inválido".to_string()));
    }
    Ok(())
}
