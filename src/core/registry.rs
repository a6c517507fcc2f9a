//! Game System Registry
//!
//! Loads game system packs (JSON files) into an immutable in-memory
//! snapshot. Each system owns a compendium: per content type, a mapping
//! from entry id to entry record. Lookups hand out `Arc` snapshots, so a
//! reload never disturbs queries already in flight.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::types::ContentType;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while loading system packs
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read pack {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed pack {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Pack {path} has an empty system id")]
    MissingId { path: String },
}

// ============================================================================
// Data Model
// ============================================================================

/// One compendium entry: an opaque JSON object. Fields vary by content
/// type; only the `id` field is guaranteed (the loader injects it from
/// the collection key when a pack omits it).
pub type CompendiumEntry = Value;

/// Entry collection for one (system, type) pair, keyed by entry id.
pub type EntryCollection = IndexMap<String, CompendiumEntry>;

/// A loaded game system and its compendium content.
#[derive(Debug, Clone, Default)]
pub struct GameSystem {
    pub id: String,
    pub name: String,
    compendium: HashMap<ContentType, EntryCollection>,
}

impl GameSystem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            compendium: HashMap::new(),
        }
    }

    /// The entry collection for `content_type`, if the system has one.
    /// An absent collection and an empty one are equivalent for callers.
    pub fn collection(&self, content_type: ContentType) -> Option<&EntryCollection> {
        self.compendium.get(&content_type)
    }

    /// Insert a single entry, creating the collection on first use.
    /// The entry object gains an `id` field if it does not carry one.
    pub fn insert_entry(
        &mut self,
        content_type: ContentType,
        entry_id: impl Into<String>,
        mut entry: CompendiumEntry,
    ) {
        let entry_id = entry_id.into();
        if let Some(map) = entry.as_object_mut() {
            map.entry("id")
                .or_insert_with(|| Value::String(entry_id.clone()));
        }
        self.compendium
            .entry(content_type)
            .or_default()
            .insert(entry_id, entry);
    }

    /// Total entry count across all collections.
    pub fn entry_count(&self) -> usize {
        self.compendium.values().map(IndexMap::len).sum()
    }
}

// ============================================================================
// Pack File Format
// ============================================================================

/// On-disk shape of one system pack.
#[derive(Debug, Deserialize)]
struct PackFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    compendium: IndexMap<String, IndexMap<String, Value>>,
}

// ============================================================================
// Registry
// ============================================================================

/// Shared-read registry of loaded game systems.
///
/// The inner map is replaced wholesale on reload; `get_system` clones
/// the current `Arc`, so each query operates on one consistent snapshot
/// even if a reload lands mid-call.
#[derive(Debug, Default)]
pub struct SystemRegistry {
    systems: RwLock<Arc<HashMap<String, Arc<GameSystem>>>>,
}

impl SystemRegistry {
    /// An empty registry (no systems loaded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already-constructed systems.
    pub fn from_systems(systems: impl IntoIterator<Item = GameSystem>) -> Self {
        let registry = Self::new();
        registry.swap(
            systems
                .into_iter()
                .map(|s| (s.id.clone(), Arc::new(s)))
                .collect(),
        );
        registry
    }

    /// Load every `*.json` pack under `dir` into a fresh registry.
    pub fn load_from_dir(dir: &Path) -> Result<Self, RegistryError> {
        let registry = Self::new();
        registry.reload_from_dir(dir)?;
        Ok(registry)
    }

    /// Rebuild the snapshot from `dir` and swap it in atomically.
    /// Returns the number of systems loaded.
    pub fn reload_from_dir(&self, dir: &Path) -> Result<usize, RegistryError> {
        let mut systems: HashMap<String, Arc<GameSystem>> = HashMap::new();

        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(|e| RegistryError::Io {
                path: dir.display().to_string(),
                source: e,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // Deterministic load order so "last pack wins" is reproducible.
        paths.sort();

        for path in paths {
            let system = load_pack(&path)?;
            if let Some(previous) = systems.insert(system.id.clone(), Arc::new(system)) {
                log::warn!(
                    "System '{}' redefined by {}; earlier pack discarded",
                    previous.id,
                    path.display()
                );
            }
        }

        let count = systems.len();
        log::info!("System registry loaded: {} system(s) from {}", count, dir.display());
        self.swap(systems);
        Ok(count)
    }

    /// Resolve a system id to its current snapshot. `None` means the
    /// system is unknown.
    pub fn get_system(&self, system_id: &str) -> Option<Arc<GameSystem>> {
        self.snapshot().get(system_id).cloned()
    }

    /// Ids of all loaded systems (unordered).
    pub fn system_ids(&self) -> Vec<String> {
        self.snapshot().keys().cloned().collect()
    }

    fn snapshot(&self) -> Arc<HashMap<String, Arc<GameSystem>>> {
        match self.systems.read() {
            Ok(guard) => Arc::clone(&guard),
            // A poisoned lock only means a reader panicked while holding
            // it; the map itself is still intact.
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn swap(&self, systems: HashMap<String, Arc<GameSystem>>) {
        let next = Arc::new(systems);
        match self.systems.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

/// Parse one pack file into a `GameSystem`.
///
/// Content-type keys outside the catalog are logged and skipped: a pack
/// written for a newer server version still loads its known types.
fn load_pack(path: &Path) -> Result<GameSystem, RegistryError> {
    let raw = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let pack: PackFile = serde_json::from_str(&raw).map_err(|e| RegistryError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    if pack.id.trim().is_empty() {
        return Err(RegistryError::MissingId {
            path: path.display().to_string(),
        });
    }

    let name = if pack.name.is_empty() {
        pack.id.clone()
    } else {
        pack.name
    };
    let mut system = GameSystem::new(pack.id, name);

    for (type_tag, entries) in pack.compendium {
        let Some(content_type) = ContentType::parse(&type_tag) else {
            log::warn!(
                "Pack {}: unknown content type '{}' skipped ({} entries)",
                path.display(),
                type_tag,
                entries.len()
            );
            continue;
        };
        for (entry_id, entry) in entries {
            system.insert_entry(content_type, entry_id, entry);
        }
    }

    log::debug!(
        "Loaded system '{}' ({} entries) from {}",
        system.id,
        system.entry_count(),
        path.display()
    );
    Ok(system)
}
