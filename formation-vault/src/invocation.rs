//! Invocation boundary.
//!
//! An [`Invocation`] stages every write of one operation in an overlay. Reads
//! see the overlay first, then the committed ledger. Nothing reaches the store
//! until [`Invocation::finish`] hands the write set to the caller for commit;
//! dropping an invocation discards all of it.

use formation_integrity::validation;
use formation_integrity::{Anomaly, LogicalClock, Principal};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::events::VaultEvent;
use crate::state::RegistryState;
use crate::store::{fetch, LedgerKey, LedgerStore};

/// Implicit inputs every operation receives from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub caller: Principal,
    pub clock: LogicalClock,
}

impl InvocationContext {
    pub fn new(caller: impl Into<Principal>, clock: LogicalClock) -> Self {
        Self {
            caller: caller.into(),
            clock,
        }
    }
}

/// Write set and events produced by a successful invocation.
#[derive(Debug)]
pub struct Staged {
    pub writes: Vec<(LedgerKey, Vec<u8>)>,
    pub events: Vec<VaultEvent>,
    pub state: RegistryState,
}

pub struct Invocation<'s, S: LedgerStore + ?Sized> {
    store: &'s S,
    ctx: InvocationContext,
    state: RegistryState,
    overlay: BTreeMap<LedgerKey, Vec<u8>>,
    events: Vec<VaultEvent>,
}

impl<'s, S: LedgerStore + ?Sized> Invocation<'s, S> {
    /// Load registry state and open an invocation.
    ///
    /// A blank caller is malformed input; a clock behind the last committed
    /// mutation is a temporal violation.
    pub fn begin(store: &'s S, ctx: InvocationContext) -> Result<Self> {
        validation::check_principal(&ctx.caller)?;

        let state: RegistryState = fetch(store, &LedgerKey::State)?.unwrap_or_default();
        if ctx.clock < state.last_calibration {
            return Err(Anomaly::TemporalViolation.into());
        }

        Ok(Self {
            store,
            ctx,
            state,
            overlay: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    pub fn caller(&self) -> &Principal {
        &self.ctx.caller
    }

    pub fn clock(&self) -> LogicalClock {
        self.ctx.clock
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RegistryState {
        &mut self.state
    }

    pub fn get<T: DeserializeOwned>(&self, key: &LedgerKey) -> Result<Option<T>> {
        match self.overlay.get(key) {
            Some(bytes) => Ok(Some(rmp_serde::from_slice(bytes)?)),
            None => fetch(self.store, key),
        }
    }

    pub fn put<T: Serialize>(&mut self, key: LedgerKey, value: &T) -> Result<()> {
        let bytes = rmp_serde::to_vec(value)?;
        self.overlay.insert(key, bytes);
        Ok(())
    }

    pub fn emit(&mut self, event: VaultEvent) {
        self.events.push(event);
    }

    /// Stage the registry state and release the write set.
    pub fn finish(mut self) -> Result<Staged> {
        let state = self.state.clone();
        self.put(LedgerKey::State, &state)?;
        Ok(Staged {
            writes: self.overlay.into_iter().collect(),
            events: self.events,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryLedger, Namespace};

    #[test]
    fn test_overlay_shadows_store() {
        let ledger = MemoryLedger::new();
        let key = LedgerKey::Formation(Namespace::Primary, 1);

        let mut inv = Invocation::begin(&ledger, InvocationContext::new("p", 1)).unwrap();
        inv.put(key.clone(), &"staged".to_string()).unwrap();
        assert_eq!(inv.get::<String>(&key).unwrap().as_deref(), Some("staged"));

        // Nothing reaches the store without a commit
        drop(inv);
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_finish_stages_state() {
        let ledger = MemoryLedger::new();
        let mut inv = Invocation::begin(&ledger, InvocationContext::new("p", 4)).unwrap();
        inv.state_mut().record_operation(4, Some(true));

        let staged = inv.finish().unwrap();
        assert_eq!(staged.state.total_operations, 1);
        ledger.commit(staged.writes).unwrap();

        let state: RegistryState = fetch(&ledger, &LedgerKey::State).unwrap().unwrap();
        assert_eq!(state.last_calibration, 4);
        assert!(state.flux_indicator);
    }

    #[test]
    fn test_clock_regression_rejected() {
        let ledger = MemoryLedger::new();
        let mut inv = Invocation::begin(&ledger, InvocationContext::new("p", 10)).unwrap();
        inv.state_mut().record_operation(10, None);
        ledger.commit(inv.finish().unwrap().writes).unwrap();

        let err = Invocation::begin(&ledger, InvocationContext::new("p", 9))
            .err()
            .unwrap();
        assert_eq!(err.anomaly(), Some(Anomaly::TemporalViolation));
        assert!(Invocation::begin(&ledger, InvocationContext::new("p", 10)).is_ok());
    }

    #[test]
    fn test_blank_caller_rejected() {
        let ledger = MemoryLedger::new();
        for caller in ["", "  ", "p/q"] {
            let err = Invocation::begin(&ledger, InvocationContext::new(caller, 1))
                .err()
                .unwrap();
            assert_eq!(err.anomaly(), Some(Anomaly::MalformedInput));
        }
    }
}
