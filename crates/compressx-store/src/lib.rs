//! Persistence boundary: structured keys, key-value backends and file I/O

mod error;
mod file;
mod io;
mod key;
mod kv;
mod memory;
mod paths;
mod sqlite;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use io::{atomic_write, read_json};
pub use key::{RecordKind, StoreKey, UserId};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use paths::Paths;
pub use sqlite::SqliteStore;
