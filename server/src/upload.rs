//! Per-request temp upload handling.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Accepted upload extensions.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["wav", "mp3", "m4a", "ogg", "flac", "webm"];

/// Returns the lowercase extension when the filename carries one of
/// the allowed formats.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reduces an untrusted filename to `[A-Za-z0-9._-]`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// An upload written to disk for the duration of one detection call.
///
/// The file gets a uuid prefix to avoid collisions in the shared
/// upload directory and is removed when the guard drops, on success
/// and on every error path alike.
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub fn write(dir: &Path, original_name: &str, data: &[u8]) -> io::Result<Self> {
        let name = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_filename(original_name)
        );
        let path = dir.join(name);
        fs::write(&path, data)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "temp upload not removed");
            }
        }
    }
}
