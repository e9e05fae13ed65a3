//! Core record types for compression statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed (simulated) compression event. Sizes are in MB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionRecord {
    pub name: String,
    pub original_size: f64,
    pub compressed_size: f64,
    /// `(1 - compressed/original) * 100`, fixed when the record is created
    pub saved_percent: f64,
    pub timestamp: DateTime<Utc>,
}

impl CompressionRecord {
    /// Space saved by this event, derived from the stored sizes
    pub fn space_saved(&self) -> f64 {
        self.original_size - self.compressed_size
    }

    /// Lower-cased file extension of `name`, if it has one
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// Aggregate snapshot over a ledger's records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub count: usize,
    pub total_space_saved: f64,
    pub average_compression: f64,
}
