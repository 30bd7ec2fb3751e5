//! Store - durable copy of the ledger
//!
//! Every save replaces the whole document. The file store writes to a
//! sibling temporary file and renames it over the target so a crash never
//! leaves a half-written strike file.

use crate::error::{Error, Result};
use crate::ledger::Ledger;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

/// Default strike file name
pub const DEFAULT_STRIKES_FILE: &str = "strikes.json";

/// Durable ledger storage
#[async_trait]
pub trait StrikeStore: Send + Sync {
    /// Load the ledger; a missing document yields an empty ledger
    async fn load(&self) -> Result<Ledger>;

    /// Replace the stored ledger
    async fn save(&self, ledger: &Ledger) -> Result<()>;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create store for `path`
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Return the strike file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_STRIKES_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STRIKES_FILE)
    }
}

#[async_trait]
impl StrikeStore for JsonFileStore {
    async fn load(&self) -> Result<Ledger> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = ?self.path, "No strike file found, starting with an empty ledger");
                return Ok(Ledger::new());
            }
            Err(e) => return Err(Error::persistence(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Ledger::new());
        }

        let ledger: Ledger = serde_json::from_str(&content)?;
        info!(
            path = ?self.path,
            members = ledger.member_count(),
            strikes = ledger.total_strikes(),
            "Strike ledger loaded"
        );
        Ok(ledger)
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let content = serde_json::to_string_pretty(ledger)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::persistence(parent, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, content)
            .await
            .map_err(|e| Error::persistence(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| Error::persistence(&self.path, e))?;

        debug!(path = ?self.path, members = ledger.member_count(), "Strike ledger saved");
        Ok(())
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Ledger>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `ledger`
    #[must_use]
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            snapshot: Mutex::new(Some(ledger)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Last saved ledger
    #[must_use]
    pub fn snapshot(&self) -> Option<Ledger> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl StrikeStore for MemoryStore {
    async fn load(&self) -> Result<Ledger> {
        Ok(self.snapshot().unwrap_or_default())
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::persistence("<memory>", "save rejected"));
        }
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        *guard = Some(ledger.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
