//! Settings, session, and preset persistence.
//!
//! This module handles all file I/O for application state: the selected
//! config path (`settings.json`), the last session snapshot
//! (`last-state.json`) restored on startup, and named user presets
//! (`presets.json`). Everything is stored as JSON under a single app
//! directory in the user's Documents folder.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::TargetPathProvider;
use crate::types::AudioSnapshot;

/// Directory name under Documents holding all persistent state.
const APP_DIR_NAME: &str = "Equalizer Master";

const SETTINGS_FILE: &str = "settings.json";
const LAST_STATE_FILE: &str = "last-state.json";
const PRESETS_FILE: &str = "presets.json";

// =============================================================================
// Records
// =============================================================================

/// Persistent application settings saved to `settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Path of the Equalizer APO config file the pipeline writes to
    #[serde(default)]
    pub config_path: Option<String>,
}

/// A named user preset: a full parameter snapshot plus its display name.
///
/// Stored inline in `presets.json` as one array, matching the original
/// record shape (`{"name": ..., "bands": ..., "bassBoost": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreset {
    pub name: String,
    #[serde(flatten)]
    pub state: AudioSnapshot,
}

// =============================================================================
// Storage
// =============================================================================

/// File-backed store rooted at one app directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Opens the default store at `Documents/Equalizer Master/`.
    pub fn open_default() -> Result<Self> {
        let docs = dirs::document_dir().ok_or(Error::DocumentsDirUnavailable)?;
        Ok(Self {
            root: docs.join(APP_DIR_NAME),
        })
    }

    /// Opens a store rooted at an explicit directory (used by tests).
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The app directory this store reads and writes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        self.ensure_root()?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.root.join(file), json)?;
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Loads settings, falling back to defaults.
    ///
    /// A missing or corrupt file yields `Settings::default()`; this never
    /// fails so startup cannot be blocked by a bad settings file.
    pub fn load_settings(&self) -> Settings {
        fs::read_to_string(self.root.join(SETTINGS_FILE))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Persists settings as pretty-printed JSON.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write_json(SETTINGS_FILE, settings)
    }

    // =========================================================================
    // Last Session State
    // =========================================================================

    /// Loads the snapshot persisted by the previous session, if any.
    pub fn load_last_state(&self) -> Option<AudioSnapshot> {
        fs::read_to_string(self.root.join(LAST_STATE_FILE))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
    }

    /// Persists the current snapshot for session restore.
    ///
    /// Called by the UI layer on the same cadence as live-sync submissions.
    pub fn save_last_state(&self, snapshot: &AudioSnapshot) -> Result<()> {
        self.write_json(LAST_STATE_FILE, snapshot)
    }

    // =========================================================================
    // User Presets
    // =========================================================================

    /// Returns all saved presets; an absent file is an empty list.
    pub fn list_presets(&self) -> Result<Vec<UserPreset>> {
        let path = self.root.join(PRESETS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Saves a preset, replacing any existing preset with the same name.
    pub fn save_preset(&self, preset: UserPreset) -> Result<()> {
        let mut presets = self.list_presets()?;
        match presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => presets.push(preset),
        }
        self.write_json(PRESETS_FILE, &presets)
    }

    /// Deletes a preset by name.
    pub fn delete_preset(&self, name: &str) -> Result<()> {
        let mut presets = self.list_presets()?;
        let before = presets.len();
        presets.retain(|p| p.name != name);
        if presets.len() == before {
            return Err(Error::PresetNotFound(name.to_string()));
        }
        self.write_json(PRESETS_FILE, &presets)
    }
}

// =============================================================================
// Settings Store
// =============================================================================

/// In-memory settings guarded by a mutex and persisted on every mutation.
///
/// The sync pipeline reads the target path through this store's
/// [`TargetPathProvider`] impl at write-dispatch time, so a path picked in
/// the settings dialog takes effect for the next dispatched write even while
/// an earlier write is in flight.
pub struct SettingsStore {
    storage: Storage,
    settings: Mutex<Settings>,
}

impl SettingsStore {
    /// Loads settings from the given storage.
    pub fn load(storage: Storage) -> Self {
        let settings = storage.load_settings();
        Self {
            storage,
            settings: Mutex::new(settings),
        }
    }

    /// Returns a copy of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.lock().clone()
    }

    /// Updates the target config path and persists the change.
    pub fn set_config_path(&self, path: Option<String>) -> Result<()> {
        let mut settings = self.settings.lock();
        settings.config_path = path;
        self.storage.save_settings(&settings)
    }
}

impl TargetPathProvider for SettingsStore {
    fn config_path(&self) -> Option<PathBuf> {
        self.settings.lock().config_path.as_ref().map(PathBuf::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
