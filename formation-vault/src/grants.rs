//! Access grant ledger.
//!
//! Owners issue classified, expiring grants to other principals. The ledger
//! only records them; [`check_clearance`] is a read-only helper for whoever
//! enforces them.

use formation_integrity::validation;
use formation_integrity::{
    AccessGrant, Anomaly, Classification, Formation, FormationId, LogicalClock, Principal,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::VaultEvent;
use crate::invocation::Invocation;
use crate::profile::GRANT_FLUX;
use crate::store::{fetch, LedgerKey, LedgerStore, Namespace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    pub formation_id: FormationId,
    pub grantee: Principal,
    /// Raw classification string; parsed during validation
    pub classification: String,
    /// Lifetime in logical clock ticks
    pub duration: u64,
    pub can_modify: bool,
}

/// Issue or replace the grant for (formation, grantee).
pub fn grant_access<S: LedgerStore + ?Sized>(
    inv: &mut Invocation<'_, S>,
    request: GrantRequest,
) -> Result<AccessGrant> {
    let formation: Formation = inv
        .get(&LedgerKey::Formation(Namespace::Primary, request.formation_id))?
        .ok_or(Anomaly::FormationNotFound)?;

    if !formation.is_owned_by(inv.caller()) {
        return Err(Anomaly::DimensionalBreach.into());
    }
    validation::check_grantee(&request.grantee, &formation.owner)?;
    let classification = validation::check_classification(&request.classification)?;
    validation::check_duration(request.duration)?;

    let granted_at = inv.clock();
    let expires_at = granted_at
        .checked_add(request.duration)
        .ok_or(Anomaly::TemporalViolation)?;

    let grant = AccessGrant {
        formation_id: request.formation_id,
        grantee: request.grantee,
        classification,
        granted_at,
        expires_at,
        can_modify: request.can_modify,
    };
    inv.put(
        LedgerKey::Grant(grant.formation_id, grant.grantee.clone()),
        &grant,
    )?;
    inv.state_mut().record_operation(granted_at, GRANT_FLUX);

    inv.emit(VaultEvent::AccessGranted {
        formation_id: grant.formation_id,
        grantee: grant.grantee.clone(),
        classification,
        expires_at,
        clock: granted_at,
    });
    Ok(grant)
}

/// Look up a live grant covering `required` at `clock`.
pub fn check_clearance<S: LedgerStore + ?Sized>(
    store: &S,
    formation_id: FormationId,
    grantee: &Principal,
    required: Classification,
    clock: LogicalClock,
) -> Result<AccessGrant> {
    if fetch::<Formation, _>(store, &LedgerKey::Formation(Namespace::Primary, formation_id))?
        .is_none()
    {
        return Err(Anomaly::FormationNotFound.into());
    }

    let grant: AccessGrant = fetch(store, &LedgerKey::Grant(formation_id, grantee.clone()))?
        .ok_or(Anomaly::InsufficientClearance)?;
    if !grant.classification.covers(required) {
        return Err(Anomaly::InsufficientClearance.into());
    }
    if !grant.is_active_at(clock) {
        return Err(Anomaly::TemporalViolation.into());
    }
    Ok(grant)
}
