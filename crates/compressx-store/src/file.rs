//! One JSON file per record under a data directory

use std::path::{Path, PathBuf};

use crate::{atomic_write, KeyValueStore, RecordKind, Result, StoreKey, UserId};

const EXTENSION: &str = "json";

/// Stores each `(user, kind)` record as `<root>/<kind>/<user>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn kind_dir(&self, kind: RecordKind) -> PathBuf {
        self.root.join(kind.as_str())
    }

    fn path_for(&self, key: &StoreKey) -> PathBuf {
        self.kind_dir(key.kind)
            .join(format!("{}.{EXTENSION}", encode_user(key.user.as_str())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &StoreKey) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn put(&mut self, key: &StoreKey, value: &str) -> Result<()> {
        let path = self.path_for(key);
        atomic_write(&path, value.as_bytes())?;
        tracing::debug!(path = %path.display(), "stored record");
        Ok(())
    }

    fn remove(&mut self, key: &StoreKey) -> Result<bool> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn users(&self, kind: RecordKind) -> Result<Vec<UserId>> {
        let dir = self.kind_dir(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match decode_user(stem).map(UserId::new) {
                Some(Ok(user)) => users.push(user),
                _ => tracing::warn!(file = %path.display(), "skipping unreadable record file"),
            }
        }
        users.sort();
        Ok(users)
    }
}

fn is_plain(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-' | b'@' | b'+')
}

/// Percent-encode a user id into a file-name-safe stem
fn encode_user(user: &str) -> String {
    let mut out = String::with_capacity(user.len());
    for (i, b) in user.bytes().enumerate() {
        if is_plain(b) && !(i == 0 && b == b'.') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn decode_user(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
