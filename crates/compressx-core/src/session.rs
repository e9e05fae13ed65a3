//! Per-user session: the current user and their ledger, backed by a store

use anyhow::Context;
use chrono::{DateTime, Utc};
use compressx_store::{KeyValueStore, StoreKey, UserId};

use crate::{CompressionRecord, Ledger, StatisticsSummary};

/// Load a user's ledger, or an empty one if nothing is stored yet
pub fn load_ledger(store: &dyn KeyValueStore, user: &UserId) -> anyhow::Result<Ledger> {
    match store.get(&StoreKey::ledger(user))? {
        Some(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("corrupt ledger stored for {user}")),
        None => Ok(Ledger::new()),
    }
}

pub fn save_ledger(
    store: &mut dyn KeyValueStore,
    user: &UserId,
    ledger: &Ledger,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(ledger)?;
    store.put(&StoreKey::ledger(user), &json)?;
    Ok(())
}

/// The signed-in user and their ledger.
///
/// Every mutation is persisted before it becomes visible; if persisting
/// fails the in-memory ledger is left as it was.
pub struct Session<'a> {
    user: UserId,
    ledger: Ledger,
    store: &'a mut dyn KeyValueStore,
}

impl<'a> Session<'a> {
    pub fn open(store: &'a mut dyn KeyValueStore, user: UserId) -> anyhow::Result<Self> {
        let ledger = load_ledger(store, &user)?;
        tracing::debug!(user = %user, records = ledger.len(), "opened session");
        Ok(Self {
            user,
            ledger,
            store,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Record a completed compression; fails with [`crate::LedgerError`] on invalid sizes
    pub fn record(
        &mut self,
        original_size: f64,
        compressed_size: f64,
        name: &str,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<CompressionRecord> {
        let mut next = self.ledger.clone();
        let record = next
            .record(original_size, compressed_size, name, timestamp)?
            .clone();
        self.commit(next)?;
        Ok(record)
    }

    /// Remove a history entry; fails with [`crate::LedgerError`] when out of range
    pub fn remove_at(&mut self, index: usize) -> anyhow::Result<CompressionRecord> {
        let mut next = self.ledger.clone();
        let removed = next.remove_at(index)?;
        self.commit(next)?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> anyhow::Result<()> {
        self.commit(Ledger::new())
    }

    pub fn recent(&self, limit: usize) -> Vec<&CompressionRecord> {
        self.ledger.recent(limit)
    }

    pub fn summary(&self) -> StatisticsSummary {
        self.ledger.summary()
    }

    fn commit(&mut self, next: Ledger) -> anyhow::Result<()> {
        save_ledger(&mut *self.store, &self.user, &next)?;
        self.ledger = next;
        Ok(())
    }
}
