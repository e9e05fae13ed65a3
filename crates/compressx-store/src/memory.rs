//! In-memory store for the lifetime of one process

use std::collections::BTreeMap;

use crate::{KeyValueStore, RecordKind, Result, StoreKey, UserId};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<StoreKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &StoreKey, value: &str) -> Result<()> {
        self.entries.insert(key.clone(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &StoreKey) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn users(&self, kind: RecordKind) -> Result<Vec<UserId>> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.kind == kind)
            .map(|k| k.user.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut store = MemoryStore::new();
        let user = UserId::new("a@example.com").unwrap();
        let key = StoreKey::ledger(&user);

        assert!(store.get(&key).unwrap().is_none());
        store.put(&key, "{}").unwrap();
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("{}"));
        assert_eq!(store.users(RecordKind::Ledger).unwrap(), vec![user]);

        assert!(store.remove(&key).unwrap());
        assert!(!store.remove(&key).unwrap());
        assert!(store.users(RecordKind::Ledger).unwrap().is_empty());
    }
}
