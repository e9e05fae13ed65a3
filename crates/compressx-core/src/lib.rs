//! Compression statistics ledger, per-user sessions and admin analytics

pub mod analytics;
mod config;
mod ledger;
mod media;
mod session;
mod types;

pub use config::{Backend, Config, UploadError};
pub use ledger::{Ledger, LedgerError, LedgerState};
pub use media::{bytes_to_mb, output_file_name, MediaKind};
pub use session::{load_ledger, save_ledger, Session};
pub use types::{CompressionRecord, StatisticsSummary};
