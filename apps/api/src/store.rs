//! Disk-backed artifact store for finished .pptx packages.
//!
//! Artifacts are addressed by presentation id and written atomically: bytes
//! land in a temp file in the target directory, then rename into place, so
//! the download endpoint never observes a half-written package.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;

/// MIME type of the stored artifacts.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Opens (and creates, if needed) the artifact directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AppError::ArtifactWrite(format!(
                "Cannot create artifact directory '{}': {e}",
                dir.display()
            ))
        })?;
        info!("Artifact store ready at {}", dir.display());
        Ok(Self { dir })
    }

    /// The download filename for a presentation id.
    pub fn filename(presentation_id: &str) -> String {
        format!("edudeck_{presentation_id}.pptx")
    }

    fn path_for(&self, presentation_id: &str) -> PathBuf {
        self.dir.join(Self::filename(presentation_id))
    }

    /// Persists the package bytes under the given id.
    pub fn put(&self, presentation_id: &str, bytes: &[u8]) -> Result<(), AppError> {
        let target = self.path_for(presentation_id);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| {
            AppError::ArtifactWrite(format!("Cannot create temp artifact file: {e}"))
        })?;
        tmp.write_all(bytes).map_err(|e| {
            AppError::ArtifactWrite(format!("Cannot write artifact bytes: {e}"))
        })?;
        tmp.persist(&target).map_err(|e| {
            AppError::ArtifactWrite(format!(
                "Cannot persist artifact to '{}': {e}",
                target.display()
            ))
        })?;

        info!(
            "Stored artifact {} ({} bytes)",
            target.display(),
            bytes.len()
        );
        Ok(())
    }

    /// Loads the package bytes for the given id, or `NotFound`.
    pub fn get(&self, presentation_id: &str) -> Result<Vec<u8>, AppError> {
        validate_id(presentation_id)?;

        let path = self.path_for(presentation_id);
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Presentation {presentation_id} not found"
            )));
        }

        std::fs::read(&path).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to read artifact '{}': {e}",
                path.display()
            ))
        })
    }
}

/// Ids are generated as `pres_` + lowercase hex; anything else is rejected
/// before it can reach the filesystem.
fn validate_id(presentation_id: &str) -> Result<(), AppError> {
    let well_formed = !presentation_id.is_empty()
        && presentation_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if well_formed {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Malformed presentation id '{presentation_id}'"
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        store.put("pres_0123abcd4567", b"deck bytes").unwrap();
        assert_eq!(store.get("pres_0123abcd4567").unwrap(), b"deck bytes");
    }

    #[test]
    fn test_get_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let err = store.get("pres_ffffffffffff").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_put_overwrites_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        store.put("pres_aaaaaaaaaaaa", b"old").unwrap();
        store.put("pres_aaaaaaaaaaaa", b"new").unwrap();
        assert_eq!(store.get("pres_aaaaaaaaaaaa").unwrap(), b"new");
    }

    #[test]
    fn test_traversal_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        for bad in ["../etc/passwd", "pres_ABC", "pres_1/2", ""] {
            let err = store.get(bad).unwrap_err();
            assert!(
                matches!(err, AppError::Validation(_)),
                "id {bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_filename_shape() {
        assert_eq!(
            ArtifactStore::filename("pres_0123abcd4567"),
            "edudeck_pres_0123abcd4567.pptx"
        );
    }
}
