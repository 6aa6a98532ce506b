//! Formation Vault - owned records with delegated access
//!
//! Keeps a registry of formations, each mutable only by the principal that
//! created it, plus a ledger of classified, expiring access grants the owner
//! can issue to others.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    FormationVault                        │
//! │            (single writer gate per invocation)           │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!                     ┌────────▼────────┐
//!                     │   Invocation    │  staged writes + RegistryState
//!                     └────────┬────────┘
//!        ┌─────────────┬───────┴──────┬──────────────┐
//!        ▼             ▼              ▼              ▼
//!   ┌─────────┐  ┌──────────┐  ┌────────────┐  ┌──────────┐
//!   │Validate │  │ Registry │  │  History & │  │  Grants  │
//!   │(integr.)│  │          │  │  Metrics   │  │          │
//!   └─────────┘  └──────────┘  └────────────┘  └──────────┘
//!                              │
//!                     ┌────────▼────────┐
//!                     │   LedgerStore   │  memory | sled
//!                     └─────────────────┘
//! ```
//!
//! An invocation either commits every write it staged or none of them.

pub mod config;
pub mod error;
pub mod events;
pub mod grants;
pub mod history;
pub mod invocation;
pub mod profile;
pub mod registry;
pub mod state;
pub mod store;
pub mod vault;

pub use config::VaultConfig;
pub use error::{Result, StoreError, VaultError};
pub use events::{EventJournal, JournalEntry, VaultEvent};
pub use grants::GrantRequest;
pub use invocation::{Invocation, InvocationContext};
pub use profile::MutationProfile;
pub use state::RegistryState;
pub use store::{LedgerKey, LedgerStore, MemoryLedger, Namespace, SledLedger};
pub use vault::FormationVault;

pub use formation_integrity::*;
