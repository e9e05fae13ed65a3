//! Media kinds, upload naming and size units

use serde::{Deserialize, Serialize};
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Extensions rewritten to `.jpg` on download, since images are re-encoded as JPEG
const REENCODED_TO_JPEG: &[&str] = &["png", "gif", "bmp", "webp"];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Declared media kind of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Document,
}

impl MediaKind {
    /// Classify by file extension; anything that is not a known image is a document
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Image,
            _ => MediaKind::Document,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Document => "document",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Name of the compressed download for an uploaded file
pub fn output_file_name(name: &str, kind: MediaKind) -> String {
    let path = Path::new(name);
    let renamed = match (kind, extension_of(path)) {
        (MediaKind::Image, Some(ext)) if REENCODED_TO_JPEG.contains(&ext.as_str()) => {
            path.with_extension("jpg").to_string_lossy().into_owned()
        }
        _ => name.to_string(),
    };
    format!("compressed_{renamed}")
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}
