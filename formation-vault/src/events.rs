//! Events emitted by committed mutations, and the journal that keeps them.
//!
//! Only committed invocations reach the journal; rejected ones are logged and
//! leave no trace here.

use formation_integrity::{Classification, FormationId, LogicalClock, Principal};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Maximum journal entries before pruning.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VaultEvent {
    FormationCreated {
        formation_id: FormationId,
        owner: Principal,
        origin_tag: String,
        clock: LogicalClock,
    },
    FormationUpdated {
        formation_id: FormationId,
        editor: Principal,
        origin_tag: String,
        clock: LogicalClock,
    },
    ShadowFormationCreated {
        formation_id: FormationId,
        owner: Principal,
        clock: LogicalClock,
    },
    AccessGranted {
        formation_id: FormationId,
        grantee: Principal,
        classification: Classification,
        expires_at: LogicalClock,
        clock: LogicalClock,
    },
}

impl VaultEvent {
    pub fn formation_id(&self) -> FormationId {
        match self {
            Self::FormationCreated { formation_id, .. }
            | Self::FormationUpdated { formation_id, .. }
            | Self::ShadowFormationCreated { formation_id, .. }
            | Self::AccessGranted { formation_id, .. } => *formation_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FormationCreated { .. } => "formation_created",
            Self::FormationUpdated { .. } => "formation_updated",
            Self::ShadowFormationCreated { .. } => "shadow_formation_created",
            Self::AccessGranted { .. } => "access_granted",
        }
    }
}

/// A journaled event with the operation count at which it was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub operation: u64,
    pub event: VaultEvent,
}

/// Bounded in-memory event journal (newest first).
#[derive(Clone)]
pub struct EventJournal {
    entries: Arc<RwLock<VecDeque<JournalEntry>>>,
    max_entries: usize,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            max_entries,
        }
    }

    /// Record the events of one committed invocation.
    pub async fn record(&self, operation: u64, events: Vec<VaultEvent>) {
        let mut entries = self.entries.write().await;
        for event in events {
            entries.push_front(JournalEntry { operation, event });
        }

        // Prune if over limit
        while entries.len() > self.max_entries {
            entries.pop_back();
        }
    }

    pub async fn recent(&self, limit: usize) -> Vec<JournalEntry> {
        let entries = self.entries.read().await;
        entries.iter().take(limit).cloned().collect()
    }

    /// Events touching one formation, newest first.
    pub async fn for_formation(&self, formation_id: FormationId) -> Vec<JournalEntry> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|e| e.event.formation_id() == formation_id)
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new()
    }
}
