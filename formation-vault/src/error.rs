//! Error types for formation-vault

use formation_integrity::Anomaly;
use thiserror::Error;

/// Failures of the ledger store itself. These sit outside the anomaly taxonomy.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
}

#[derive(Error, Debug)]
pub enum VaultError {
    /// The invocation was rejected by validation or authorization
    #[error("anomaly {code}: {0}", code = .0.code())]
    Anomaly(#[from] Anomaly),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Codec error: {0}")]
    Codec(String),
}

impl VaultError {
    /// The anomaly behind this error, if it is one.
    pub fn anomaly(&self) -> Option<Anomaly> {
        match self {
            Self::Anomaly(a) => Some(*a),
            _ => None,
        }
    }

    /// Numeric anomaly code, if this is an anomaly.
    pub fn code(&self) -> Option<u32> {
        self.anomaly().map(|a| a.code())
    }
}

impl From<rmp_serde::encode::Error> for VaultError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Codec(format!("Serialization error: {}", e))
    }
}

impl From<rmp_serde::decode::Error> for VaultError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Self::Codec(format!("Deserialization error: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
