//! File selection and object URL lifecycle
//!
//! A selected file is previewed and sent through a session-scoped object URL.
//! URLs stay valid until released: on replacement of the pending attachment,
//! or all at once when the widget is torn down.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Extensions accepted besides `image/*`, matching the file chooser filter
const DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Default upper bound for an attachment
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Why a file could not be attached
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),
    #[error("{name} is not an image, PDF, or Word document")]
    Unsupported { name: String },
    #[error("{name} is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },
}

/// A file the user picked, not yet sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl SelectedFile {
    /// Inspect a file on disk. `max_bytes` of `None` disables the size bound.
    pub fn from_path(path: impl AsRef<Path>, max_bytes: Option<u64>) -> Result<Self, AttachmentError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| AttachmentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(AttachmentError::NotAFile(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        if !is_accepted(path, &mime_type) {
            return Err(AttachmentError::Unsupported { name });
        }

        let size = metadata.len();
        if let Some(limit) = max_bytes {
            if size > limit {
                return Err(AttachmentError::TooLarge { name, size, limit });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime_type,
            size,
        })
    }
}

/// `image/*`, `.pdf`, `.doc`, `.docx`
fn is_accepted(path: &Path, mime_type: &str) -> bool {
    if mime_type.starts_with("image/") {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Owner of every object URL minted in one session
#[derive(Debug)]
pub struct ObjectUrlRegistry {
    session: Uuid,
    next: u64,
    live: HashMap<String, PathBuf>,
}

impl Default for ObjectUrlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self {
            session: Uuid::new_v4(),
            next: 1,
            live: HashMap::new(),
        }
    }

    /// Create a URL referring to `file` until released
    pub fn mint(&mut self, file: &SelectedFile) -> String {
        let url = format!("blob:chat-widget/{}/{}", self.session, self.next);
        self.next += 1;
        self.live.insert(url.clone(), file.path.clone());
        tracing::debug!(url = %url, name = %file.name, "Minted object URL");
        url
    }

    /// Returns false if the URL was unknown or already released
    pub fn release(&mut self, url: &str) -> bool {
        match self.live.remove(url) {
            Some(path) => {
                tracing::debug!(url = %url, path = %path.display(), "Released object URL");
                true
            }
            None => false,
        }
    }

    /// Release everything still live, returning how many were released
    pub fn release_all(&mut self) -> usize {
        let count = self.live.len();
        self.live.clear();
        if count > 0 {
            tracing::debug!(count, "Released all object URLs");
        }
        count
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains_key(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
