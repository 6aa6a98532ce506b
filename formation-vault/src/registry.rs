//! Formation registry: creation and owner-gated update.
//!
//! Every entry point validates first, then allocates or loads, then writes the
//! formation together with its history and metric rows. A failure anywhere
//! returns early and the invocation is discarded, so the sequence never
//! advances on a rejected call.

use formation_integrity::validation;
use formation_integrity::{Anomaly, Formation, FormationFields, FormationId, FormationPatch};

use crate::error::Result;
use crate::events::VaultEvent;
use crate::history;
use crate::invocation::Invocation;
use crate::profile::{MutationProfile, ProfileSpec, SHADOW_GENESIS};
use crate::store::{LedgerKey, LedgerStore, Namespace};

/// Create a formation in the primary registry under `profile`.
pub fn create_formation<S: LedgerStore + ?Sized>(
    inv: &mut Invocation<'_, S>,
    profile: MutationProfile,
    fields: FormationFields,
) -> Result<FormationId> {
    let id = create_in(inv, Namespace::Primary, profile.genesis(), fields)?;
    let event = VaultEvent::FormationCreated {
        formation_id: id,
        owner: inv.caller().clone(),
        origin_tag: profile.genesis().origin_tag.to_string(),
        clock: inv.clock(),
    };
    inv.emit(event);
    Ok(id)
}

/// Create a formation in the shadow namespace.
///
/// Draws from the same sequence as the primary registry.
pub fn create_shadow_formation<S: LedgerStore + ?Sized>(
    inv: &mut Invocation<'_, S>,
    fields: FormationFields,
) -> Result<FormationId> {
    let id = create_in(inv, Namespace::Shadow, &SHADOW_GENESIS, fields)?;
    let event = VaultEvent::ShadowFormationCreated {
        formation_id: id,
        owner: inv.caller().clone(),
        clock: inv.clock(),
    };
    inv.emit(event);
    Ok(id)
}

fn create_in<S: LedgerStore + ?Sized>(
    inv: &mut Invocation<'_, S>,
    namespace: Namespace,
    spec: &ProfileSpec,
    fields: FormationFields,
) -> Result<FormationId> {
    validation::check_fields(&fields)?;

    let id = inv.state_mut().next_id();
    let key = LedgerKey::Formation(namespace, id);
    if inv.get::<Formation>(&key)?.is_some() {
        return Err(Anomaly::Collision.into());
    }

    let clock = inv.clock();
    let formation = Formation::genesis(id, inv.caller().clone(), fields, clock);
    inv.put(key, &formation)?;
    history::record_mutation(inv, namespace, id, spec)?;
    inv.state_mut().record_operation(clock, spec.flux);

    Ok(id)
}

/// Merge a patch into a primary formation owned by the caller.
pub fn update_formation<S: LedgerStore + ?Sized>(
    inv: &mut Invocation<'_, S>,
    profile: MutationProfile,
    formation_id: FormationId,
    patch: FormationPatch,
) -> Result<Formation> {
    let key = LedgerKey::Formation(Namespace::Primary, formation_id);
    let mut formation: Formation = inv.get(&key)?.ok_or(Anomaly::FormationNotFound)?;

    if !formation.is_owned_by(inv.caller()) {
        return Err(Anomaly::DimensionalBreach.into());
    }
    validation::check_patch(&patch)?;

    let clock = inv.clock();
    let spec = profile.revision();
    formation.apply(patch, clock);
    inv.put(key, &formation)?;
    history::record_mutation(inv, Namespace::Primary, formation_id, spec)?;
    inv.state_mut().record_operation(clock, spec.flux);

    let event = VaultEvent::FormationUpdated {
        formation_id,
        editor: inv.caller().clone(),
        origin_tag: spec.origin_tag.to_string(),
        clock,
    };
    inv.emit(event);
    Ok(formation)
}
