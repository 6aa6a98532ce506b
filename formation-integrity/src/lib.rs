//! Formation Integrity - types and validation rules for the formation vault
//!
//! This crate is the leaf of the vault, in the same role an integrity zome plays
//! for a DNA: it defines what a formation, an access grant and their bookkeeping
//! rows look like, and which inputs are admissible. It never touches storage.
//!
//! - **Types**: [`Formation`], [`AccessGrant`], [`FormationHistory`], [`ExtendedMetadata`]
//! - **Anomalies**: [`Anomaly`] - the ten failure kinds with stable numeric codes
//! - **Validation**: one pure predicate per field, plus `check_*` helpers that
//!   map a failing predicate to its anomaly
//!
//! # Example
//!
//! ```
//! use formation_integrity::{validation, Anomaly, FormationFields};
//!
//! let fields = FormationFields {
//!     signature: "sig1".into(),
//!     content_hash: "a".repeat(64),
//!     metadata: "m".into(),
//!     cluster: "c1".into(),
//!     resonance_tags: vec!["f1".into()],
//! };
//! assert!(validation::check_fields(&fields).is_ok());
//!
//! let bad = FormationFields { cluster: String::new(), ..fields };
//! assert_eq!(validation::check_fields(&bad), Err(Anomaly::InvalidCluster));
//! ```

pub mod anomaly;
pub mod types;
pub mod validation;

pub use anomaly::Anomaly;
pub use types::*;
