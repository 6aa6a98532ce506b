//! Mutation profiles.
//!
//! Creation and update each come in three flavours that differ only in the
//! provenance tag, the metric triple written to `ExtendedMetadata`, and what
//! they do to the flux flag. The differences live in these tables; the
//! operations themselves are written once.

use formation_integrity::ExtendedMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which entry-point flavour a create or update runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationProfile {
    #[default]
    Standard,
    Fortified,
    Harmonic,
}

/// Fixed bookkeeping written by one entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSpec {
    pub origin_tag: &'static str,
    pub stability: u16,
    pub complexity: u8,
    pub pattern: &'static str,
    /// `None` leaves the flux flag untouched
    pub flux: Option<bool>,
}

impl ProfileSpec {
    pub fn metadata_row(&self) -> ExtendedMetadata {
        ExtendedMetadata {
            stability: self.stability,
            complexity: self.complexity,
            pattern: self.pattern.to_string(),
        }
    }
}

const GENESIS: [ProfileSpec; 3] = [
    ProfileSpec {
        origin_tag: "genesis",
        stability: 100,
        complexity: 1,
        pattern: "nascent",
        flux: Some(true),
    },
    ProfileSpec {
        origin_tag: "fortified-genesis",
        stability: 250,
        complexity: 3,
        pattern: "fortified",
        flux: Some(true),
    },
    ProfileSpec {
        origin_tag: "harmonic-genesis",
        stability: 175,
        complexity: 2,
        pattern: "harmonic",
        flux: Some(false),
    },
];

const REVISION: [ProfileSpec; 3] = [
    ProfileSpec {
        origin_tag: "revision",
        stability: 150,
        complexity: 2,
        pattern: "evolving",
        flux: Some(false),
    },
    ProfileSpec {
        origin_tag: "fortified-revision",
        stability: 300,
        complexity: 4,
        pattern: "reinforced",
        flux: Some(false),
    },
    ProfileSpec {
        origin_tag: "harmonic-revision",
        stability: 200,
        complexity: 3,
        pattern: "resonant",
        flux: Some(true),
    },
];

/// Creation into the shadow namespace.
pub const SHADOW_GENESIS: ProfileSpec = ProfileSpec {
    origin_tag: "shadow-genesis",
    stability: 100,
    complexity: 1,
    pattern: "shadow",
    flux: Some(false),
};

/// Grants count as operations but never touch the flux flag.
pub const GRANT_FLUX: Option<bool> = None;

impl MutationProfile {
    pub const ALL: [MutationProfile; 3] = [Self::Standard, Self::Fortified, Self::Harmonic];

    fn index(self) -> usize {
        match self {
            Self::Standard => 0,
            Self::Fortified => 1,
            Self::Harmonic => 2,
        }
    }

    /// Bookkeeping for a creation under this profile.
    pub fn genesis(self) -> &'static ProfileSpec {
        &GENESIS[self.index()]
    }

    /// Bookkeeping for an update under this profile.
    pub fn revision(self) -> &'static ProfileSpec {
        &REVISION[self.index()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Fortified => "fortified",
            Self::Harmonic => "harmonic",
        }
    }
}

impl fmt::Display for MutationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MutationProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "fortified" => Ok(Self::Fortified),
            "harmonic" => Ok(Self::Harmonic),
            other => Err(format!(
                "Invalid profile '{}'. Must be one of: standard, fortified, harmonic",
                other
            )),
        }
    }
}
