//! Path resolution for compressx data files

use std::path::{Path, PathBuf};

/// Resolves standard paths under the compressx home directory
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    /// Resolve `~/.compressx` for the current user
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_root(home.join(".compressx")))
    }

    /// Use an explicit root directory
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get config.json path
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Directory holding one JSON file per stored record
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Get the sqlite database path
    pub fn database(&self) -> PathBuf {
        self.root.join("compressx.db")
    }

    /// Directory where re-encoded outputs are written
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_new() {
        let paths = Paths::new().unwrap();
        assert!(paths.root.ends_with(".compressx"));
    }

    #[test]
    fn test_derived_paths() {
        let paths = Paths::with_root("/tmp/cx");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/cx/config.json"));
        assert_eq!(paths.data_dir(), PathBuf::from("/tmp/cx/data"));
        assert!(paths.database().ends_with("compressx.db"));
        assert!(paths.output_dir().ends_with("output"));
    }
}
