//! Per-formation history and metrics bookkeeping.

use formation_integrity::validation;
use formation_integrity::{FormationHistory, FormationId};

use crate::error::Result;
use crate::invocation::Invocation;
use crate::profile::ProfileSpec;
use crate::store::{LedgerKey, LedgerStore, Namespace};

/// Bump the formation count, stamp editor and origin, and overwrite the
/// metric row with the profile's fixed triple.
pub fn record_mutation<S: LedgerStore + ?Sized>(
    inv: &mut Invocation<'_, S>,
    namespace: Namespace,
    formation_id: FormationId,
    spec: &ProfileSpec,
) -> Result<FormationHistory> {
    let key = LedgerKey::History(namespace, formation_id);
    let previous = inv
        .get::<FormationHistory>(&key)?
        .map(|h| h.formation_count)
        .unwrap_or(0);

    let history = FormationHistory {
        formation_count: previous + 1,
        last_editor: inv.caller().clone(),
        origin_tag: spec.origin_tag.to_string(),
    };
    inv.put(key, &history)?;

    let row = spec.metadata_row();
    debug_assert!(
        validation::check_metadata_row(&row).is_ok(),
        "profile {} writes an out-of-range metric row",
        spec.origin_tag
    );
    inv.put(LedgerKey::Metadata(namespace, formation_id), &row)?;

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::InvocationContext;
    use crate::profile::MutationProfile;
    use crate::store::MemoryLedger;
    use formation_integrity::ExtendedMetadata;

    #[test]
    fn test_counts_accumulate() {
        let ledger = MemoryLedger::new();
        let mut inv = Invocation::begin(&ledger, InvocationContext::new("p", 1)).unwrap();

        let first = record_mutation(
            &mut inv,
            Namespace::Primary,
            1,
            MutationProfile::Standard.genesis(),
        )
        .unwrap();
        assert_eq!(first.formation_count, 1);
        assert_eq!(first.origin_tag, "genesis");

        let second = record_mutation(
            &mut inv,
            Namespace::Primary,
            1,
            MutationProfile::Fortified.revision(),
        )
        .unwrap();
        assert_eq!(second.formation_count, 2);
        assert_eq!(second.origin_tag, "fortified-revision");

        let row: ExtendedMetadata = inv
            .get(&LedgerKey::Metadata(Namespace::Primary, 1))
            .unwrap()
            .unwrap();
        assert_eq!(row.stability, 300);
        assert_eq!(row.pattern, "reinforced");
    }

    #[test]
    #[should_panic(expected = "out-of-range metric row")]
    #[cfg(debug_assertions)]
    fn test_out_of_range_row_trips_assertion() {
        let ledger = MemoryLedger::new();
        let mut inv = Invocation::begin(&ledger, InvocationContext::new("p", 1)).unwrap();
        let broken = ProfileSpec {
            complexity: 0,
            ..*MutationProfile::Standard.genesis()
        };
        let _ = record_mutation(&mut inv, Namespace::Primary, 1, &broken);
    }

    #[test]
    fn test_namespaces_counted_apart() {
        let ledger = MemoryLedger::new();
        let mut inv = Invocation::begin(&ledger, InvocationContext::new("p", 1)).unwrap();
        let spec = MutationProfile::Standard.genesis();

        record_mutation(&mut inv, Namespace::Primary, 1, spec).unwrap();
        let shadow = record_mutation(&mut inv, Namespace::Shadow, 1, spec).unwrap();
        assert_eq!(shadow.formation_count, 1);
    }
}
