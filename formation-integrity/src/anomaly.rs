//! Anomaly taxonomy.
//!
//! Every rejected operation reports exactly one anomaly. Codes are stable and
//! one-to-one with kinds so external callers can match on the number alone.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Tagged failure value returned by any operation whose validation or
/// authorization check does not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    /// Duration out of range, clock regression, or an expired grant
    #[error("temporal violation")]
    TemporalViolation,

    /// Classification outside observer/manipulator/sovereign
    #[error("authorization failure")]
    AuthorizationFailure,

    /// Cluster length out of range
    #[error("invalid cluster")]
    InvalidCluster,

    /// Caller is not the owner of the formation
    #[error("dimensional breach: caller does not own the formation")]
    DimensionalBreach,

    /// Signature, content hash or grantee is malformed
    #[error("malformed input")]
    MalformedInput,

    /// No formation at the requested id
    #[error("formation not found")]
    FormationNotFound,

    /// A formation already occupies the allocated id
    #[error("formation id collision")]
    Collision,

    /// Metadata length out of range
    #[error("invalid metadata")]
    InvalidMetadata,

    /// Grant missing or below the required classification
    #[error("insufficient clearance")]
    InsufficientClearance,

    /// Resonance tag set has a bad length or contains a bad tag
    #[error("invalid resonance set")]
    InvalidResonance,
}

impl Anomaly {
    /// Every anomaly kind, ordered by code.
    pub const ALL: [Anomaly; 10] = [
        Self::TemporalViolation,
        Self::AuthorizationFailure,
        Self::InvalidCluster,
        Self::DimensionalBreach,
        Self::MalformedInput,
        Self::FormationNotFound,
        Self::Collision,
        Self::InvalidMetadata,
        Self::InsufficientClearance,
        Self::InvalidResonance,
    ];

    /// Stable numeric code for external callers.
    pub fn code(&self) -> u32 {
        match self {
            Self::TemporalViolation => 100,
            Self::AuthorizationFailure => 101,
            Self::InvalidCluster => 102,
            Self::DimensionalBreach => 103,
            Self::MalformedInput => 104,
            Self::FormationNotFound => 105,
            Self::Collision => 106,
            Self::InvalidMetadata => 107,
            Self::InsufficientClearance => 108,
            Self::InvalidResonance => 109,
        }
    }

    /// Inverse of [`Anomaly::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_distinct() {
        let codes: HashSet<u32> = Anomaly::ALL.iter().map(|a| a.code()).collect();
        assert_eq!(codes.len(), 10);
    }

    #[test]
    fn test_from_code() {
        for anomaly in Anomaly::ALL {
            assert_eq!(Anomaly::from_code(anomaly.code()), Some(anomaly));
        }
        assert_eq!(Anomaly::from_code(99), None);
        assert_eq!(Anomaly::from_code(110), None);
    }

    #[test]
    fn test_breach_code() {
        assert_eq!(Anomaly::DimensionalBreach.code(), 103);
        assert!(Anomaly::DimensionalBreach.to_string().contains("breach"));
    }
}
