//! Persistence seam for the per-sensor display selection
//!
//! The host decides which sensors appear on the external display; that choice
//! survives restarts through a [`SelectionStore`]. The core only reads and
//! writes a boolean per sensor id.

use crate::sensor::SensorId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Boolean-per-sensor storage backing the display selection.
pub trait SelectionStore: Send {
    /// Whether this sensor is enabled for the display.
    fn is_selected(&self, id: &SensorId) -> bool;

    fn set_selected(&mut self, id: &SensorId, selected: bool);

    /// Drop the persisted entry entirely (user deselection).
    fn remove(&mut self, id: &SensorId);
}

/// In-memory selection store for tests and hosts without persistence.
#[derive(Debug, Default)]
pub struct MemorySelectionStore {
    selected: HashSet<SensorId>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemorySelectionStore {
    fn is_selected(&self, id: &SensorId) -> bool {
        self.selected.contains(id)
    }

    fn set_selected(&mut self, id: &SensorId, selected: bool) {
        if selected {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(id);
        }
    }

    fn remove(&mut self, id: &SensorId) {
        self.selected.remove(id);
    }
}

/// On-disk selection file format.
#[derive(Debug, Serialize, Deserialize)]
struct SelectionFile {
    version: u32,
    sensors: BTreeSet<SensorId>,
}

/// JSON-file-backed selection store.
///
/// Mutations save eagerly; a failed save is logged and the in-memory state
/// kept, so a read-only config directory degrades to session-only selection.
#[derive(Debug)]
pub struct FileSelectionStore {
    path: PathBuf,
    selected: BTreeSet<SensorId>,
}

impl FileSelectionStore {
    /// Load from the default per-user config location.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::config_path()?)
    }

    /// Load from an explicit file path; a missing file is an empty selection.
    pub fn load_from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                selected: BTreeSet::new(),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        let file: SelectionFile = serde_json::from_str(&content)?;
        Ok(Self {
            path,
            selected: file.sensors,
        })
    }

    /// Save the current selection to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = SelectionFile {
            version: 1,
            sensors: self.selected.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "github.hilgardt_collab", "vfd-sens")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("selection.json"))
    }

    fn save_logged(&self) {
        if let Err(e) = self.save() {
            log::warn!("failed to save display selection to {:?}: {e}", self.path);
        }
    }
}

impl SelectionStore for FileSelectionStore {
    fn is_selected(&self, id: &SensorId) -> bool {
        self.selected.contains(id)
    }

    fn set_selected(&mut self, id: &SensorId, selected: bool) {
        let changed = if selected {
            self.selected.insert(id.clone())
        } else {
            self.selected.remove(id)
        };
        if changed {
            self.save_logged();
        }
    }

    fn remove(&mut self, id: &SensorId) {
        if self.selected.remove(id) {
            self.save_logged();
        }
    }
}
