// rest_api/src/uploads.rs
//
// Record attachments land in the uploads directory under a
// timestamp-randomized name so uploads never collide or overwrite each
// other. Callers hold the returned handle and delete the file if the rest
// of their operation fails.

use std::path::{Path, PathBuf};

use chrono::Utc;
use models::errors::ClinicError;
use uuid::Uuid;

/// A file that has been written to disk but whose owning database row may
/// not exist yet.
#[derive(Debug)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
}

impl StoredUpload {
    /// Public URL path for the stored file.
    pub fn url(&self) -> String {
        format!("/uploads/{}", self.file_name)
    }

    /// Removes the file; used on failure paths after the upload was
    /// written. Best-effort: a missing file is not an error.
    pub fn discard(self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove upload");
            }
        }
    }
}

/// Writes uploaded bytes under `dir` with a unique name keeping the
/// original extension.
pub fn store_upload(
    dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<StoredUpload, ClinicError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| ClinicError::Internal(format!("failed to create uploads dir: {e}")))?;

    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let file_name = format!(
        "record-{}-{}{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    );
    let path = dir.join(&file_name);
    std::fs::write(&path, bytes)
        .map_err(|e| ClinicError::Internal(format!("failed to write upload: {e}")))?;
    Ok(StoredUpload { file_name, path })
}

/// Removes a previously stored file given its public URL, if it lives in
/// the uploads directory. Used when a record's file is replaced or the
/// record is deleted.
pub fn remove_by_url(dir: &Path, file_url: &str) {
    if let Some(name) = file_url.strip_prefix("/uploads/") {
        // Reject anything that could escape the uploads directory.
        if name.contains('/') || name.contains("..") {
            return;
        }
        let path = dir.join(name);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove upload");
            }
        }
    }
}
