//! Ledger storage.
//!
//! The vault only ever needs two primitives from its host: read a value by key,
//! and write a set of values by key as one atomic unit. Everything else
//! (ordering, consensus, durability policy) belongs to the backend.

pub mod memory;
pub mod persistent;

pub use memory::MemoryLedger;
pub use persistent::SledLedger;

use formation_integrity::{FormationId, Principal};
use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::{Result, StoreError};

/// Which record space a formation lives in.
///
/// Shadow formations share the id counter with the primary registry but are
/// invisible to primary reads, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Primary,
    Shadow,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Shadow => "shadow",
        }
    }
}

/// Typed key into the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LedgerKey {
    /// The single registry-state row
    State,
    Formation(Namespace, FormationId),
    History(Namespace, FormationId),
    Metadata(Namespace, FormationId),
    Grant(FormationId, Principal),
}

impl LedgerKey {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State => write!(f, "state"),
            Self::Formation(ns, id) => write!(f, "formation/{}/{}", ns.as_str(), id),
            Self::History(ns, id) => write!(f, "history/{}/{}", ns.as_str(), id),
            Self::Metadata(ns, id) => write!(f, "metadata/{}/{}", ns.as_str(), id),
            Self::Grant(id, grantee) => write!(f, "grant/{}/{}", id, grantee),
        }
    }
}

/// Backend the vault reads from and commits to.
pub trait LedgerStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn read(&self, key: &LedgerKey) -> std::result::Result<Option<Vec<u8>>, StoreError>;

    /// Apply a whole write set atomically: either every write lands or none does.
    fn commit(&self, writes: Vec<(LedgerKey, Vec<u8>)>) -> std::result::Result<(), StoreError>;
}

/// Read and decode a committed value.
pub fn fetch<T, S>(store: &S, key: &LedgerKey) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: LedgerStore + ?Sized,
{
    match store.read(key)? {
        Some(bytes) => Ok(Some(rmp_serde::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rendering() {
        assert_eq!(LedgerKey::State.to_string(), "state");
        assert_eq!(
            LedgerKey::Formation(Namespace::Primary, 7).to_string(),
            "formation/primary/7"
        );
        assert_eq!(
            LedgerKey::History(Namespace::Shadow, 7).to_string(),
            "history/shadow/7"
        );
        assert_eq!(
            LedgerKey::Grant(7, Principal::from("alice")).to_string(),
            "grant/7/alice"
        );
    }

    #[test]
    fn test_namespaces_do_not_share_keys() {
        assert_ne!(
            LedgerKey::Formation(Namespace::Primary, 1).to_bytes(),
            LedgerKey::Formation(Namespace::Shadow, 1).to_bytes()
        );
    }
}
