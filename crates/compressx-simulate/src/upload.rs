use compressx_core::MediaKind;
use std::path::{Path, PathBuf};

/// A selected file: its name, location, byte size and declared kind
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub kind: MediaKind,
}

impl Upload {
    /// Describe a file on disk; only its metadata is read
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            size: metadata.len(),
            kind: MediaKind::from_path(path),
        })
    }
}

/// Result of one simulated compression
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedOutput {
    /// Size of the "compressed" result in bytes
    pub output_size: u64,
    /// Where a re-encoded file was written, if one was produced
    pub output_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scan.PDF");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.name, "scan.PDF");
        assert_eq!(upload.size, 2048);
        assert_eq!(upload.kind, MediaKind::Document);
    }

    #[test]
    fn test_from_path_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let err = Upload::from_path(temp.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_from_path_missing() {
        assert!(Upload::from_path(Path::new("/nonexistent/photo.png")).is_err());
    }
}
