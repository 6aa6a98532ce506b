//! In-memory ledger for tests and embedding.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard};

use super::{LedgerKey, LedgerStore};
use crate::error::StoreError;

/// `BTreeMap`-backed ledger. A commit holds the write lock for the whole batch.
#[derive(Default)]
pub struct MemoryLedger {
    inner: RwLock<BTreeMap<LedgerKey, Vec<u8>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<RwLockReadGuard<'_, BTreeMap<LedgerKey, Vec<u8>>>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("Lock: {}", e)))
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.entries()?.is_empty())
    }

    /// Copy of every stored entry.
    pub fn snapshot(&self) -> Result<BTreeMap<LedgerKey, Vec<u8>>, StoreError> {
        Ok(self.entries()?.clone())
    }
}

impl LedgerStore for MemoryLedger {
    fn read(&self, key: &LedgerKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn commit(&self, writes: Vec<(LedgerKey, Vec<u8>)>) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("Lock: {}", e)))?;
        map.extend(writes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Namespace;

    #[test]
    fn test_commit_then_read() {
        let ledger = MemoryLedger::new();
        assert!(ledger.is_empty().unwrap());

        ledger
            .commit(vec![
                (LedgerKey::State, vec![1]),
                (LedgerKey::Formation(Namespace::Primary, 1), vec![2, 3]),
            ])
            .unwrap();

        assert_eq!(ledger.len().unwrap(), 2);
        assert_eq!(ledger.read(&LedgerKey::State).unwrap(), Some(vec![1]));
        assert_eq!(
            ledger.read(&LedgerKey::Formation(Namespace::Shadow, 1)).unwrap(),
            None
        );
    }

    #[test]
    fn test_poisoned_lock_is_unavailable() {
        let ledger = std::sync::Arc::new(MemoryLedger::new());
        let poisoner = ledger.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the ledger lock");
        })
        .join();

        assert!(matches!(ledger.len(), Err(StoreError::Unavailable(_))));
        assert!(matches!(ledger.snapshot(), Err(StoreError::Unavailable(_))));
        assert!(matches!(
            ledger.read(&LedgerKey::State),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn test_commit_overwrites() {
        let ledger = MemoryLedger::new();
        ledger.commit(vec![(LedgerKey::State, vec![1])]).unwrap();
        ledger.commit(vec![(LedgerKey::State, vec![9])]).unwrap();
        assert_eq!(ledger.read(&LedgerKey::State).unwrap(), Some(vec![9]));
    }
}
