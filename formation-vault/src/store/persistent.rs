//! Persistent ledger on sled.
//!
//! Each commit becomes one `sled::Batch`, which sled applies atomically. The
//! applied batch is the commit point: it is visible to every later read
//! whether or not the follow-up flush reaches disk.

use sled::{Batch, Db};
use std::path::Path;
use tracing::{debug, info, warn};

use super::{LedgerKey, LedgerStore};
use crate::error::StoreError;

pub struct SledLedger {
    db: Db,
}

impl SledLedger {
    /// Open or create the ledger database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Opened ledger database");
        Ok(Self { db })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

impl LedgerStore for SledLedger {
    fn read(&self, key: &LedgerKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key.to_bytes())?.map(|v| v.to_vec()))
    }

    fn commit(&self, writes: Vec<(LedgerKey, Vec<u8>)>) -> Result<(), StoreError> {
        let count = writes.len();
        let mut batch = Batch::default();
        for (key, value) in writes {
            batch.insert(key.to_bytes(), value);
        }
        self.db.apply_batch(batch)?;
        debug!(writes = count, "Committed ledger batch");

        if let Err(e) = self.flush() {
            warn!(error = %e, "Ledger flush failed after commit; sled will retry in the background");
        }
        Ok(())
    }
}
