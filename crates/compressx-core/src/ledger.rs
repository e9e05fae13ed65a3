//! Statistics ledger over completed compression events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CompressionRecord, StatisticsSummary};

/// Relative tolerance used when checking a restored summary against its records
const RESTORE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("invalid size: original {original_size} MB, compressed {compressed_size} MB")]
    InvalidSize {
        original_size: f64,
        compressed_size: f64,
    },

    #[error("index {index} out of range for ledger of {len} records")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Persisted form of a ledger: the ordered records plus their summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default)]
    pub records: Vec<CompressionRecord>,
    #[serde(default)]
    pub summary: StatisticsSummary,
}

/// Ordered history of compression events and the aggregates derived from it.
///
/// Insertion updates the aggregates incrementally. Removal recomputes them by
/// summing over the remaining records, so repeated insert/delete cycles do not
/// accumulate floating-point error: the total from per-record sizes, the
/// average from the stored `saved_percent` values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "LedgerState")]
pub struct Ledger {
    records: Vec<CompressionRecord>,
    summary: StatisticsSummary,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed compression event.
    ///
    /// Fails with [`LedgerError::InvalidSize`] when `original_size` is not a
    /// positive finite number or `compressed_size` is not finite; the ledger
    /// is left untouched in that case.
    pub fn record(
        &mut self,
        original_size: f64,
        compressed_size: f64,
        name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<&CompressionRecord, LedgerError> {
        if !(original_size.is_finite() && original_size > 0.0) || !compressed_size.is_finite() {
            return Err(LedgerError::InvalidSize {
                original_size,
                compressed_size,
            });
        }

        let saved_percent = (1.0 - compressed_size / original_size) * 100.0;
        let record = CompressionRecord {
            name: name.into(),
            original_size,
            compressed_size,
            saved_percent,
            timestamp,
        };

        let summary = &mut self.summary;
        summary.count += 1;
        summary.total_space_saved += record.space_saved();
        summary.average_compression = (summary.average_compression
            * (summary.count - 1) as f64
            + saved_percent)
            / summary.count as f64;

        tracing::debug!(
            name = %record.name,
            saved_percent,
            count = summary.count,
            "recorded compression"
        );

        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Remove the record at `index` and recompute the aggregates from scratch
    pub fn remove_at(&mut self, index: usize) -> Result<CompressionRecord, LedgerError> {
        if index >= self.records.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }

        let removed = self.records.remove(index);
        self.recompute();

        tracing::debug!(name = %removed.name, index, count = self.summary.count, "removed record");
        Ok(removed)
    }

    /// Drop every record, returning the ledger to its zero state
    pub fn clear(&mut self) {
        self.records.clear();
        self.summary = StatisticsSummary::default();
    }

    /// The last `limit` records, most recent first
    pub fn recent(&self, limit: usize) -> Vec<&CompressionRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    /// Like [`Ledger::recent`], paired with each record's ledger index
    pub fn recent_indexed(&self, limit: usize) -> Vec<(usize, &CompressionRecord)> {
        self.records.iter().enumerate().rev().take(limit).collect()
    }

    pub fn summary(&self) -> StatisticsSummary {
        self.summary
    }

    pub fn records(&self) -> &[CompressionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_state(&self) -> LedgerState {
        LedgerState {
            records: self.records.clone(),
            summary: self.summary,
        }
    }

    fn recompute(&mut self) {
        self.summary = summarize(&self.records);
    }
}

fn summarize(records: &[CompressionRecord]) -> StatisticsSummary {
    let count = records.len();
    if count == 0 {
        return StatisticsSummary::default();
    }
    let total_space_saved = records.iter().map(CompressionRecord::space_saved).sum();
    let total_percent: f64 = records.iter().map(|r| r.saved_percent).sum();
    StatisticsSummary {
        count,
        total_space_saved,
        average_compression: total_percent / count as f64,
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= RESTORE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

impl From<LedgerState> for Ledger {
    /// Restore a persisted ledger, keeping the stored summary unless it
    /// disagrees with the records it claims to describe
    fn from(state: LedgerState) -> Self {
        let expected = summarize(&state.records);
        let stored = state.summary;
        let consistent = stored.count == expected.count
            && approx_eq(stored.total_space_saved, expected.total_space_saved)
            && approx_eq(stored.average_compression, expected.average_compression);

        let summary = if consistent {
            stored
        } else {
            tracing::warn!(
                stored_count = stored.count,
                records = expected.count,
                "stored summary disagrees with records, recomputing"
            );
            expected
        };

        Self {
            records: state.records,
            summary,
        }
    }
}
