//! Content-addressed media storage
//!
//! Uploaded cover and audio files are written under `<root>/uploads/`,
//! named by the SHA-256 of their contents. Re-uploading identical bytes
//! lands on the same file, so storage never duplicates media.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

const UPLOADS_DIR: &str = "uploads";

/// Filesystem store for uploaded media
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(root_folder: &Path) -> Self {
        Self {
            dir: root_folder.join(UPLOADS_DIR),
        }
    }

    /// Persist uploaded bytes; returns the URL path the file is served
    /// under (e.g. `/uploads/ab12...f.mp3`).
    ///
    /// The extension is carried over from the client filename so media
    /// players can infer the type; unknown or missing extensions are
    /// dropped.
    pub fn store(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        std::fs::create_dir_all(&self.dir)?;

        let hash = Sha256::digest(bytes);
        let file_name = match sanitized_extension(original_name) {
            Some(ext) => format!("{hash:x}.{ext}"),
            None => format!("{hash:x}"),
        };

        let path = self.dir.join(&file_name);
        if !path.exists() {
            std::fs::write(&path, bytes)?;
            debug!("Stored media file {} ({} bytes)", file_name, bytes.len());
        }

        Ok(format!("/{UPLOADS_DIR}/{file_name}"))
    }
}

/// Lower-case alphanumeric extension of at most 8 chars, if any.
fn sanitized_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_by_content_hash() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MediaStore::new(tmp.path());

        let url = store.store("track.MP3", b"audio-bytes").unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".mp3"));

        // Same content, different client name: same stored object
        let again = store.store("other.mp3", b"audio-bytes").unwrap();
        assert_eq!(url, again);

        let stored: Vec<_> = std::fs::read_dir(tmp.path().join("uploads"))
            .unwrap()
            .collect();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn suspicious_extensions_are_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MediaStore::new(tmp.path());

        let url = store.store("../../evil.sh/..", b"x").unwrap();
        assert!(!url.contains(".."));

        let no_ext = store.store("cover", b"y").unwrap();
        assert!(!no_ext.trim_start_matches("/uploads/").contains('.'));
    }
}
