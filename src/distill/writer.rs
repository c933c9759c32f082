//! Atomic cognition document writer
//!
//! Writes the rendered document to a temporary file in the destination
//! directory and renames it into place. A rename within one directory is
//! atomic, so a half-written `cognition.md` is never observable.

use super::document::{render, DOCUMENT_FILE};
use super::profile::CognitionProfile;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Serializes cognition profiles to the canonical on-disk document.
pub struct CognitionWriter;

impl CognitionWriter {
    /// Write `profile` under `destination_dir`, creating the directory if
    /// absent. Returns the path of the written document.
    pub async fn write(profile: &CognitionProfile, destination_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(destination_dir)
            .await
            .map_err(|e| Error::Write(format!("create {}: {e}", destination_dir.display())))?;

        let final_path = destination_dir.join(DOCUMENT_FILE);
        let tmp_path = destination_dir.join(format!("{DOCUMENT_FILE}.{}.tmp", uuid::Uuid::new_v4()));

        let text = render(profile);
        tokio::fs::write(&tmp_path, text.as_bytes())
            .await
            .map_err(|e| Error::Write(format!("write {}: {e}", tmp_path.display())))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &final_path).await {
            // Best effort: don't leave the temp file behind on failure.
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(Error::Write(format!(
                "rename into {}: {e}",
                final_path.display()
            )));
        }

        tracing::info!(path = %final_path.display(), "cognition document written");
        Ok(final_path)
    }
}
