use crate::{RecordKind, Result, StoreKey, UserId};

/// A flat key-value store holding serialized records per `(user, kind)`
pub trait KeyValueStore {
    /// Fetch the raw value stored under `key`, if any
    fn get(&self, key: &StoreKey) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &StoreKey, value: &str) -> Result<()>;

    /// Remove the value under `key`; returns whether something was removed
    fn remove(&mut self, key: &StoreKey) -> Result<bool>;

    /// All users having a record of `kind`, sorted
    fn users(&self, kind: RecordKind) -> Result<Vec<UserId>>;
}
