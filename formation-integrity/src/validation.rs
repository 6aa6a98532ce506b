//! Validation rules.
//!
//! One pure predicate per field, then `check_*` helpers that turn a failing
//! predicate into its anomaly. Lengths are counted in characters.
//!
//! There is no predicate for a grant's `can_modify` flag: both values of a
//! boolean are admissible.

use crate::anomaly::Anomaly;
use crate::types::*;

fn len_within(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

// =============================================================================
// Predicates
// =============================================================================

pub fn is_valid_signature(signature: &str) -> bool {
    len_within(signature, 1, SIGNATURE_MAX_LEN)
}

pub fn is_valid_content_hash(hash: &str) -> bool {
    hash.chars().count() == CONTENT_HASH_LEN
}

pub fn is_valid_metadata(metadata: &str) -> bool {
    len_within(metadata, 1, METADATA_MAX_LEN)
}

pub fn is_valid_cluster(cluster: &str) -> bool {
    len_within(cluster, 1, CLUSTER_MAX_LEN)
}

/// 1-5 tags, each 1-30 characters. Duplicates are allowed.
pub fn is_valid_resonance(tags: &[String]) -> bool {
    !tags.is_empty()
        && tags.len() <= RESONANCE_MAX_TAGS
        && tags.iter().all(|t| len_within(t, 1, RESONANCE_TAG_MAX_LEN))
}

pub fn is_valid_classification(classification: &str) -> bool {
    CLASSIFICATIONS.contains(&classification)
}

pub fn is_valid_duration(duration: u64) -> bool {
    (1..=GRANT_MAX_DURATION).contains(&duration)
}

/// Non-blank, and free of the `/` ledger key separator.
pub fn is_valid_principal(principal: &Principal) -> bool {
    let id = principal.as_str();
    !id.trim().is_empty() && !id.contains('/')
}

/// A grant must name a well-formed principal other than the one issuing it.
pub fn is_valid_grantee(grantee: &Principal, caller: &Principal) -> bool {
    is_valid_principal(grantee) && grantee != caller
}

pub fn is_valid_stability(stability: u16) -> bool {
    stability <= STABILITY_MAX
}

pub fn is_valid_complexity(complexity: u8) -> bool {
    (1..=COMPLEXITY_MAX).contains(&complexity)
}

// =============================================================================
// Checks
// =============================================================================

fn ensure(ok: bool, anomaly: Anomaly) -> Result<(), Anomaly> {
    if ok {
        Ok(())
    } else {
        Err(anomaly)
    }
}

pub fn check_signature(signature: &str) -> Result<(), Anomaly> {
    ensure(is_valid_signature(signature), Anomaly::MalformedInput)
}

pub fn check_content_hash(hash: &str) -> Result<(), Anomaly> {
    ensure(is_valid_content_hash(hash), Anomaly::MalformedInput)
}

pub fn check_metadata(metadata: &str) -> Result<(), Anomaly> {
    ensure(is_valid_metadata(metadata), Anomaly::InvalidMetadata)
}

pub fn check_cluster(cluster: &str) -> Result<(), Anomaly> {
    ensure(is_valid_cluster(cluster), Anomaly::InvalidCluster)
}

pub fn check_resonance(tags: &[String]) -> Result<(), Anomaly> {
    ensure(is_valid_resonance(tags), Anomaly::InvalidResonance)
}

pub fn check_classification(classification: &str) -> Result<Classification, Anomaly> {
    classification.parse()
}

pub fn check_duration(duration: u64) -> Result<(), Anomaly> {
    ensure(is_valid_duration(duration), Anomaly::TemporalViolation)
}

pub fn check_principal(principal: &Principal) -> Result<(), Anomaly> {
    ensure(is_valid_principal(principal), Anomaly::MalformedInput)
}

pub fn check_grantee(grantee: &Principal, caller: &Principal) -> Result<(), Anomaly> {
    ensure(is_valid_grantee(grantee, caller), Anomaly::MalformedInput)
}

/// Validate creation input in order: signature, hash, metadata, cluster, tags.
pub fn check_fields(fields: &FormationFields) -> Result<(), Anomaly> {
    check_signature(&fields.signature)?;
    check_content_hash(&fields.content_hash)?;
    check_metadata(&fields.metadata)?;
    check_cluster(&fields.cluster)?;
    check_resonance(&fields.resonance_tags)
}

/// Validate update input with the same rules creation applies.
pub fn check_patch(patch: &FormationPatch) -> Result<(), Anomaly> {
    check_signature(&patch.signature)?;
    check_content_hash(&patch.content_hash)?;
    check_metadata(&patch.metadata)?;
    check_resonance(&patch.resonance_tags)
}

/// Metric triples are compile-time data; this guards the profile table.
pub fn check_metadata_row(row: &ExtendedMetadata) -> Result<(), Anomaly> {
    ensure(
        is_valid_stability(row.stability) && is_valid_complexity(row.complexity),
        Anomaly::InvalidMetadata,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    fn fields() -> FormationFields {
        FormationFields {
            signature: "sig1".to_string(),
            content_hash: "a".repeat(64),
            metadata: "m".to_string(),
            cluster: "c1".to_string(),
            resonance_tags: tags(1),
        }
    }

    #[test]
    fn test_signature_bounds() {
        assert!(!is_valid_signature(""));
        assert!(is_valid_signature("s"));
        assert!(is_valid_signature(&"s".repeat(50)));
        assert!(!is_valid_signature(&"s".repeat(51)));
    }

    #[test]
    fn test_content_hash_exact_length() {
        assert!(is_valid_content_hash(&"a".repeat(64)));
        assert!(!is_valid_content_hash(&"a".repeat(63)));
        assert!(!is_valid_content_hash(&"a".repeat(65)));
    }

    #[test]
    fn test_metadata_and_cluster_bounds() {
        assert!(!is_valid_metadata(""));
        assert!(is_valid_metadata(&"m".repeat(200)));
        assert!(!is_valid_metadata(&"m".repeat(201)));
        assert!(!is_valid_cluster(""));
        assert!(is_valid_cluster(&"c".repeat(20)));
        assert!(!is_valid_cluster(&"c".repeat(21)));
    }

    #[test]
    fn test_resonance_bounds() {
        assert!(!is_valid_resonance(&tags(0)));
        assert!(is_valid_resonance(&tags(1)));
        assert!(is_valid_resonance(&tags(5)));
        assert!(!is_valid_resonance(&tags(6)));
        assert!(is_valid_resonance(&["dup".to_string(), "dup".to_string()]));
        assert!(!is_valid_resonance(&["ok".to_string(), String::new()]));
        assert!(!is_valid_resonance(&["t".repeat(31)]));
    }

    #[test]
    fn test_duration_bounds() {
        assert!(!is_valid_duration(0));
        assert!(is_valid_duration(1));
        assert!(is_valid_duration(52_560));
        assert!(!is_valid_duration(52_561));
        assert_eq!(check_duration(0), Err(Anomaly::TemporalViolation));
    }

    #[test]
    fn test_grantee_not_self() {
        let p = Principal::from("p");
        assert!(!is_valid_grantee(&p, &p));
        assert!(is_valid_grantee(&Principal::from("r"), &p));
        assert_eq!(check_grantee(&p, &p), Err(Anomaly::MalformedInput));
    }

    #[test]
    fn test_principal_shape() {
        assert!(is_valid_principal(&Principal::from("alice")));
        assert!(is_valid_principal(&Principal::from("node 7")));
        for bad in ["", "   ", "\t", "a/b", "/"] {
            assert!(!is_valid_principal(&Principal::from(bad)), "{:?}", bad);
        }
        assert_eq!(check_principal(&Principal::from("")), Err(Anomaly::MalformedInput));

        let owner = Principal::from("p");
        for bad in ["", "   ", "r/1"] {
            assert_eq!(
                check_grantee(&Principal::from(bad), &owner),
                Err(Anomaly::MalformedInput)
            );
        }
    }

    #[test]
    fn test_check_fields_maps_each_failure() {
        assert_eq!(check_fields(&fields()), Ok(()));

        let cases = [
            (FormationFields { signature: String::new(), ..fields() }, Anomaly::MalformedInput),
            (FormationFields { content_hash: "abc".to_string(), ..fields() }, Anomaly::MalformedInput),
            (FormationFields { metadata: String::new(), ..fields() }, Anomaly::InvalidMetadata),
            (FormationFields { cluster: "c".repeat(21), ..fields() }, Anomaly::InvalidCluster),
            (FormationFields { resonance_tags: tags(6), ..fields() }, Anomaly::InvalidResonance),
        ];
        for (input, expected) in cases {
            assert_eq!(check_fields(&input), Err(expected));
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let input = FormationFields {
            metadata: String::new(),
            cluster: String::new(),
            ..fields()
        };
        assert_eq!(check_fields(&input), Err(Anomaly::InvalidMetadata));
    }

    #[test]
    fn test_metadata_row_bounds() {
        let row = ExtendedMetadata {
            stability: 1000,
            complexity: 100,
            pattern: "p".to_string(),
        };
        assert!(check_metadata_row(&row).is_ok());
        assert!(check_metadata_row(&ExtendedMetadata { complexity: 0, ..row.clone() }).is_err());
        assert!(check_metadata_row(&ExtendedMetadata { stability: 1001, ..row }).is_err());
    }
}
