//! Configuration for formation-vault

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::StoreError;
use crate::events::{EventJournal, DEFAULT_JOURNAL_CAPACITY};
use crate::store::{LedgerStore, MemoryLedger, SledLedger};
use crate::vault::FormationVault;

/// Default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formation-vault")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    #[default]
    Sled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding the sled ledger
    #[serde(default = "default_data_dir")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Maximum events kept in memory
    #[serde(default = "default_journal_capacity")]
    pub capacity: usize,
}

fn default_journal_capacity() -> usize {
    DEFAULT_JOURNAL_CAPACITY
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            capacity: default_journal_capacity(),
        }
    }
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    /// Log level for the formation_vault target
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            journal: JournalConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl VaultConfig {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Open the configured ledger backend
    pub fn open_store(&self) -> Result<Arc<dyn LedgerStore>, StoreError> {
        let store: Arc<dyn LedgerStore> = match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryLedger::new()) as Arc<dyn LedgerStore>,
            StorageBackend::Sled => Arc::new(SledLedger::open(self.ledger_path())?),
        };
        Ok(store)
    }

    /// Open a vault over the configured backend
    pub fn open_vault(&self) -> Result<FormationVault, StoreError> {
        let journal = EventJournal::with_capacity(self.journal.capacity);
        Ok(FormationVault::from_arc(self.open_store()?).with_journal(journal))
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.storage.path.join("ledger.sled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::Sled);
        assert_eq!(config.journal.capacity, 10_000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: VaultConfig = toml::from_str(
            r#"
log_level = "debug"

[storage]
backend = "memory"
"#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.journal.capacity, 10_000);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.toml");

        let mut config = VaultConfig::default();
        config.storage.path = dir.path().join("data");
        config.journal.capacity = 42;
        config.save(&path).unwrap();

        let loaded = VaultConfig::load(&path).unwrap();
        assert_eq!(loaded.storage.path, dir.path().join("data"));
        assert_eq!(loaded.journal.capacity, 42);
    }

    #[tokio::test]
    async fn test_open_memory_vault() {
        let mut config = VaultConfig::default();
        config.storage.backend = StorageBackend::Memory;
        let vault = config.open_vault().unwrap();
        assert_eq!(vault.registry_state().await.unwrap().sequence_tracker, 0);
    }
}
