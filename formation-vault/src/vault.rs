//! Formation vault service.
//!
//! Serializes every mutating call behind a single writer gate, runs it inside
//! an [`Invocation`], and commits the staged write set only on success.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use formation_integrity::{
    AccessGrant, Classification, ExtendedMetadata, Formation, FormationFields, FormationHistory,
    FormationId, FormationPatch, LogicalClock, Principal,
};

use crate::error::Result;
use crate::events::{EventJournal, JournalEntry};
use crate::grants::{self, GrantRequest};
use crate::invocation::{Invocation, InvocationContext};
use crate::profile::MutationProfile;
use crate::registry;
use crate::state::RegistryState;
use crate::store::{fetch, LedgerKey, LedgerStore, Namespace};

pub struct FormationVault<S: LedgerStore + ?Sized = dyn LedgerStore> {
    store: Arc<S>,
    /// Single-writer transaction boundary
    writer: Mutex<()>,
    journal: EventJournal,
}

impl<S: LedgerStore> FormationVault<S> {
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }
}

impl<S: LedgerStore + ?Sized> FormationVault<S> {
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
            journal: EventJournal::new(),
        }
    }

    pub fn with_journal(mut self, journal: EventJournal) -> Self {
        self.journal = journal;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one mutating operation to completion and commit it, or discard it.
    async fn execute<T, F>(&self, operation: &'static str, ctx: InvocationContext, f: F) -> Result<T>
    where
        F: FnOnce(&mut Invocation<'_, S>) -> Result<T>,
    {
        let _guard = self.writer.lock().await;
        let caller = ctx.caller.clone();

        let outcome = Invocation::begin(self.store.as_ref(), ctx).and_then(|mut inv| {
            let value = f(&mut inv)?;
            Ok((value, inv.finish()?))
        });

        let (value, staged) = match outcome {
            Ok(done) => done,
            Err(e) => {
                warn!(
                    operation,
                    caller = %caller,
                    code = ?e.code(),
                    error = %e,
                    "Invocation rejected"
                );
                return Err(e);
            }
        };

        if let Err(e) = self.store.commit(staged.writes) {
            warn!(
                operation,
                caller = %caller,
                error = %e,
                "Ledger commit failed"
            );
            return Err(e.into());
        }
        self.journal
            .record(staged.state.total_operations, staged.events)
            .await;

        info!(
            operation,
            caller = %caller,
            total_operations = staged.state.total_operations,
            "Invocation committed"
        );
        Ok(value)
    }

    // ── Mutations ──

    pub async fn create_formation(
        &self,
        ctx: InvocationContext,
        profile: MutationProfile,
        fields: FormationFields,
    ) -> Result<FormationId> {
        let id = self
            .execute("create", ctx, |inv| {
                registry::create_formation(inv, profile, fields)
            })
            .await?;
        info!(formation_id = id, profile = %profile, "Formation created");
        Ok(id)
    }

    pub async fn update_formation(
        &self,
        ctx: InvocationContext,
        profile: MutationProfile,
        formation_id: FormationId,
        patch: FormationPatch,
    ) -> Result<()> {
        self.execute("update", ctx, |inv| {
            registry::update_formation(inv, profile, formation_id, patch)
        })
        .await?;
        info!(formation_id, profile = %profile, "Formation updated");
        Ok(())
    }

    pub async fn grant_access(
        &self,
        ctx: InvocationContext,
        request: GrantRequest,
    ) -> Result<AccessGrant> {
        let grant = self
            .execute("grant", ctx, |inv| grants::grant_access(inv, request))
            .await?;
        info!(
            formation_id = grant.formation_id,
            grantee = %grant.grantee,
            classification = %grant.classification,
            expires_at = grant.expires_at,
            "Access granted"
        );
        Ok(grant)
    }

    pub async fn create_shadow_formation(
        &self,
        ctx: InvocationContext,
        fields: FormationFields,
    ) -> Result<FormationId> {
        let id = self
            .execute("shadow-create", ctx, |inv| {
                registry::create_shadow_formation(inv, fields)
            })
            .await?;
        info!(formation_id = id, "Shadow formation created");
        Ok(id)
    }

    // ── Reads ──

    pub async fn get_formation(&self, id: FormationId) -> Result<Option<Formation>> {
        fetch(self.store.as_ref(), &LedgerKey::Formation(Namespace::Primary, id))
    }

    pub async fn get_shadow_formation(&self, id: FormationId) -> Result<Option<Formation>> {
        fetch(self.store.as_ref(), &LedgerKey::Formation(Namespace::Shadow, id))
    }

    pub async fn get_history(&self, id: FormationId) -> Result<Option<FormationHistory>> {
        fetch(self.store.as_ref(), &LedgerKey::History(Namespace::Primary, id))
    }

    pub async fn get_shadow_history(&self, id: FormationId) -> Result<Option<FormationHistory>> {
        fetch(self.store.as_ref(), &LedgerKey::History(Namespace::Shadow, id))
    }

    pub async fn get_metadata(&self, id: FormationId) -> Result<Option<ExtendedMetadata>> {
        fetch(self.store.as_ref(), &LedgerKey::Metadata(Namespace::Primary, id))
    }

    pub async fn get_shadow_metadata(&self, id: FormationId) -> Result<Option<ExtendedMetadata>> {
        fetch(self.store.as_ref(), &LedgerKey::Metadata(Namespace::Shadow, id))
    }

    pub async fn get_grant(
        &self,
        id: FormationId,
        grantee: &Principal,
    ) -> Result<Option<AccessGrant>> {
        fetch(self.store.as_ref(), &LedgerKey::Grant(id, grantee.clone()))
    }

    pub async fn registry_state(&self) -> Result<RegistryState> {
        Ok(fetch(self.store.as_ref(), &LedgerKey::State)?.unwrap_or_default())
    }

    pub async fn check_clearance(
        &self,
        id: FormationId,
        grantee: &Principal,
        required: Classification,
        clock: LogicalClock,
    ) -> Result<AccessGrant> {
        grants::check_clearance(self.store.as_ref(), id, grantee, required, clock)
    }

    pub async fn recent_events(&self, limit: usize) -> Vec<JournalEntry> {
        self.journal.recent(limit).await
    }

    pub async fn events_for(&self, id: FormationId) -> Vec<JournalEntry> {
        self.journal.for_formation(id).await
    }
}
