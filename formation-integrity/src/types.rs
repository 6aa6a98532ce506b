//! Core types for the formation vault.
//!
//! With the `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::anomaly::Anomaly;

/// Strictly increasing formation identifier. Never reused.
pub type FormationId = u64;

/// Monotonic counter supplied by the host ledger.
pub type LogicalClock = u64;

// =============================================================================
// Constants
// =============================================================================

/// Accepted classification strings, lowest tier first
pub const CLASSIFICATIONS: [&str; 3] = [
    "observer",    // read
    "manipulator", // write
    "sovereign",   // admin
];

pub const SIGNATURE_MAX_LEN: usize = 50;
pub const CONTENT_HASH_LEN: usize = 64;
pub const METADATA_MAX_LEN: usize = 200;
pub const CLUSTER_MAX_LEN: usize = 20;
pub const RESONANCE_MAX_TAGS: usize = 5;
pub const RESONANCE_TAG_MAX_LEN: usize = 30;

/// Longest grant a formation owner may issue, in logical clock ticks
pub const GRANT_MAX_DURATION: u64 = 52_560;

pub const STABILITY_MAX: u16 = 1000;
pub const COMPLEXITY_MAX: u8 = 100;

// =============================================================================
// Principal
// =============================================================================

/// A caller, owner or grantee identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// Formation
// =============================================================================

/// An owned data record in the vault.
///
/// `owner` and `created_at` are fixed at creation; `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Formation {
    pub id: FormationId,
    pub signature: String,
    pub owner: Principal,
    pub content_hash: String,
    pub metadata: String,
    pub cluster: String,
    pub resonance_tags: Vec<String>,
    pub created_at: LogicalClock,
    pub updated_at: LogicalClock,
}

impl Formation {
    /// Build a new formation owned by `owner` at `clock`.
    pub fn genesis(
        id: FormationId,
        owner: Principal,
        fields: FormationFields,
        clock: LogicalClock,
    ) -> Self {
        Self {
            id,
            signature: fields.signature,
            owner,
            content_hash: fields.content_hash,
            metadata: fields.metadata,
            cluster: fields.cluster,
            resonance_tags: fields.resonance_tags,
            created_at: clock,
            updated_at: clock,
        }
    }

    /// Merge the mutable fields of a patch. Owner, cluster and created_at stay.
    pub fn apply(&mut self, patch: FormationPatch, clock: LogicalClock) {
        self.signature = patch.signature;
        self.content_hash = patch.content_hash;
        self.metadata = patch.metadata;
        self.resonance_tags = patch.resonance_tags;
        self.updated_at = clock;
    }

    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.owner == principal
    }
}

/// Creation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct FormationFields {
    pub signature: String,
    pub content_hash: String,
    pub metadata: String,
    pub cluster: String,
    pub resonance_tags: Vec<String>,
}

/// Update input: the mutable subset of a formation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct FormationPatch {
    pub signature: String,
    pub content_hash: String,
    pub metadata: String,
    pub resonance_tags: Vec<String>,
}

// =============================================================================
// Access grants
// =============================================================================

/// Permission tier recorded on a grant.
///
/// Ordered by tier, so `Sovereign > Manipulator > Observer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Read
    Observer = 1,
    /// Write
    Manipulator = 2,
    /// Admin
    Sovereign = 3,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observer => "observer",
            Self::Manipulator => "manipulator",
            Self::Sovereign => "sovereign",
        }
    }

    /// Whether a grant at this tier covers `required`.
    pub fn covers(&self, required: Classification) -> bool {
        *self >= required
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = Anomaly;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "observer" => Ok(Self::Observer),
            "manipulator" => Ok(Self::Manipulator),
            "sovereign" => Ok(Self::Sovereign),
            _ => Err(Anomaly::AuthorizationFailure),
        }
    }
}

/// Capability entry keyed by (formation, grantee). Replaced wholesale on re-grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AccessGrant {
    pub formation_id: FormationId,
    pub grantee: Principal,
    pub classification: Classification,
    pub granted_at: LogicalClock,
    pub expires_at: LogicalClock,
    pub can_modify: bool,
}

impl AccessGrant {
    /// A grant is live strictly before its expiry tick.
    pub fn is_active_at(&self, clock: LogicalClock) -> bool {
        clock < self.expires_at
    }
}

// =============================================================================
// Bookkeeping rows
// =============================================================================

/// Per-formation mutation counter and provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct FormationHistory {
    /// Successful mutations, creation included
    pub formation_count: u64,
    pub last_editor: Principal,
    /// Tag of the entry point that last touched the formation
    pub origin_tag: String,
}

/// Per-formation stability/complexity attributes.
///
/// Written verbatim from the mutation profile; never derived from content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ExtendedMetadata {
    /// 0 - 1000
    pub stability: u16,
    /// 1 - 100
    pub complexity: u8,
    pub pattern: String,
}
