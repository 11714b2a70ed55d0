use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use lingo_core::model::Language;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrefsError {
    #[error("prefs io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prefs serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("prefs state error: {0}")]
    State(String),
}

//
// ─── PREFS ─────────────────────────────────────────────────────────────────────
//

/// Client-local keys that survive a reload: the selected course language and
/// the absolute heart-regeneration deadline.
///
/// Both are advisory; the server value wins whenever the two disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub regen_deadline: Option<DateTime<Utc>>,
}

/// Storage contract for client-local preferences.
pub trait PrefsStore: Send + Sync {
    /// Load the persisted preferences; missing storage yields defaults.
    ///
    /// # Errors
    ///
    /// Returns `PrefsError` if present storage cannot be read or decoded.
    fn load(&self) -> Result<Prefs, PrefsError>;

    /// Persist the preferences.
    ///
    /// # Errors
    ///
    /// Returns `PrefsError` if the preferences cannot be written.
    fn save(&self, prefs: &Prefs) -> Result<(), PrefsError>;
}

//
// ─── FILE STORE ────────────────────────────────────────────────────────────────
//

/// JSON-file preferences, the desktop analog of browser local storage.
pub struct FilePrefs {
    path: PathBuf,
}

impl FilePrefs {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PrefsStore for FilePrefs {
    fn load(&self) -> Result<Prefs, PrefsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Prefs::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, prefs: &Prefs) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

/// In-memory preferences for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryPrefs {
    prefs: Arc<Mutex<Prefs>>,
}

impl InMemoryPrefs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing preferences.
    #[must_use]
    pub fn with_prefs(prefs: Prefs) -> Self {
        Self {
            prefs: Arc::new(Mutex::new(prefs)),
        }
    }
}

impl PrefsStore for InMemoryPrefs {
    fn load(&self) -> Result<Prefs, PrefsError> {
        let guard = self
            .prefs
            .lock()
            .map_err(|e| PrefsError::State(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, prefs: &Prefs) -> Result<(), PrefsError> {
        let mut guard = self
            .prefs
            .lock()
            .map_err(|e| PrefsError::State(e.to_string()))?;
        *guard = prefs.clone();
        Ok(())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
