//! Admin analytics across every user's ledger

use chrono::{DateTime, NaiveDate, Utc};
use compressx_store::{KeyValueStore, RecordKind, StoreKey, UserId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::{load_ledger, Config, Ledger, StatisticsSummary};

/// Number of most recent days reported by [`daily_stats`]
pub const DAILY_WINDOW: usize = 30;

/// One user's ledger, as loaded for analytics
#[derive(Debug, Clone, Serialize)]
pub struct UserLedger {
    pub user: UserId,
    pub ledger: Ledger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalStats {
    pub total_users: usize,
    pub total_files: usize,
    pub total_space_saved: f64,
    /// Size-weighted: `(Σ original - Σ compressed) / Σ original * 100`
    pub average_compression: f64,
    pub total_original_size: f64,
    pub total_compressed_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub files: usize,
    pub space_saved: f64,
    pub active_users: usize,
}

#[derive(Debug, Serialize)]
pub struct Export<'a> {
    pub users: Vec<ExportedUser<'a>>,
    pub config: &'a Config,
    pub global_stats: GlobalStats,
    pub export_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExportedUser<'a> {
    pub user: &'a UserId,
    pub summary: StatisticsSummary,
    pub ledger: &'a Ledger,
}

/// Load every stored ledger, sorted by user
pub fn load_all(store: &dyn KeyValueStore) -> anyhow::Result<Vec<UserLedger>> {
    store
        .users(RecordKind::Ledger)?
        .into_iter()
        .map(|user| -> anyhow::Result<UserLedger> {
            let ledger = load_ledger(store, &user)?;
            Ok(UserLedger { user, ledger })
        })
        .collect()
}

/// Remove a user's ledger; returns whether anything was stored
pub fn delete_user(store: &mut dyn KeyValueStore, user: &UserId) -> anyhow::Result<bool> {
    let removed = store.remove(&StoreKey::ledger(user))?;
    if removed {
        tracing::info!(user = %user, "deleted user statistics");
    }
    Ok(removed)
}

pub fn global_stats(users: &[UserLedger]) -> GlobalStats {
    let mut stats = GlobalStats {
        total_users: users.len(),
        total_files: 0,
        total_space_saved: 0.0,
        average_compression: 0.0,
        total_original_size: 0.0,
        total_compressed_size: 0.0,
    };

    for entry in users {
        let summary = entry.ledger.summary();
        stats.total_files += summary.count;
        stats.total_space_saved += summary.total_space_saved;
        for record in entry.ledger.records() {
            stats.total_original_size += record.original_size;
            stats.total_compressed_size += record.compressed_size;
        }
    }

    if stats.total_original_size > 0.0 {
        stats.average_compression = (stats.total_original_size - stats.total_compressed_size)
            / stats.total_original_size
            * 100.0;
    }
    stats
}

/// Per-day activity (UTC dates), oldest first, limited to the last [`DAILY_WINDOW`] days with activity
pub fn daily_stats(users: &[UserLedger]) -> Vec<DailyStats> {
    let mut days: BTreeMap<NaiveDate, (usize, f64, BTreeSet<&UserId>)> = BTreeMap::new();

    for entry in users {
        for record in entry.ledger.records() {
            let day = days.entry(record.timestamp.date_naive()).or_default();
            day.0 += 1;
            day.1 += record.space_saved();
            day.2.insert(&entry.user);
        }
    }

    let skip = days.len().saturating_sub(DAILY_WINDOW);
    days.into_iter()
        .skip(skip)
        .map(|(date, (files, space_saved, active))| DailyStats {
            date,
            files,
            space_saved,
            active_users: active.len(),
        })
        .collect()
}

/// Count of compressed files per lower-cased extension
pub fn file_type_stats(users: &[UserLedger]) -> BTreeMap<String, usize> {
    let mut types = BTreeMap::new();
    for record in users.iter().flat_map(|u| u.ledger.records()) {
        let ext = record.extension().unwrap_or_else(|| "unknown".to_string());
        *types.entry(ext).or_default() += 1;
    }
    types
}

/// Most active users by number of compressions
pub fn top_users(users: &[UserLedger], limit: usize) -> Vec<&UserLedger> {
    let mut sorted: Vec<&UserLedger> = users.iter().collect();
    sorted.sort_by(|a, b| {
        b.ledger
            .len()
            .cmp(&a.ledger.len())
            .then_with(|| a.user.cmp(&b.user))
    });
    sorted.truncate(limit);
    sorted
}

/// Users whose id contains `query`, case-insensitively
pub fn search_users<'a>(users: &'a [UserLedger], query: &str) -> Vec<&'a UserLedger> {
    let query = query.to_lowercase();
    users
        .iter()
        .filter(|u| u.user.as_str().to_lowercase().contains(&query))
        .collect()
}

pub fn export<'a>(users: &'a [UserLedger], config: &'a Config) -> Export<'a> {
    Export {
        users: users
            .iter()
            .map(|u| ExportedUser {
                user: &u.user,
                summary: u.ledger.summary(),
                ledger: &u.ledger,
            })
            .collect(),
        config,
        global_stats: global_stats(users),
        export_date: Utc::now(),
    }
}
