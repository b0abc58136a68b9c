// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File-based registry snapshots.
//!
//! A snapshot is a cache of the startup registration pass, not a source
//! of truth: descriptors are plain data, so a saved registry reloads
//! exactly.  Layout:
//!
//!   `{directory}/{discriminator}.json`            (single registry)
//!   `{directory}/{root}/{discriminator}.json`     (registry group)

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::descriptor::TypeDescriptor;
use crate::namespace::RegistryGroup;
use crate::registry::TypeRegistry;

// ---------------------------------------------------------------------------
// SnapshotError
// ---------------------------------------------------------------------------

/// Errors produced by snapshot save/load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Filesystem failure.
    Io(String),
    /// A snapshot file exists but does not deserialize.
    Corrupt(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(msg) => write!(f, "I/O error: {}", msg),
            SnapshotError::Corrupt(msg) => write!(f, "corrupt snapshot: {}", msg),
        }
    }
}

impl std::error::Error for SnapshotError {}

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// File-based snapshot store for registries.
pub struct SnapshotStore {
    directory: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(directory: PathBuf) -> Result<Self, SnapshotError> {
        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| {
                SnapshotError::Io(format!(
                    "failed to create directory {}: {}",
                    directory.display(),
                    e
                ))
            })?;
        }
        Ok(SnapshotStore { directory })
    }

    /// Persist a registry: one JSON file per descriptor.  Existing files
    /// are overwritten.
    pub fn save(&self, registry: &TypeRegistry) -> Result<(), SnapshotError> {
        write_registry(&self.directory, registry)
    }

    /// Load a registry from the store root.
    ///
    /// Files that are not `*.json` are skipped; a `*.json` file that does
    /// not deserialize fails the load.
    pub fn load(&self) -> Result<TypeRegistry, SnapshotError> {
        if !self.directory.exists() {
            return Ok(TypeRegistry::new());
        }
        read_registry(&self.directory)
    }

    /// Persist a registry group: one subdirectory per namespace root.
    pub fn save_group(&self, group: &RegistryGroup) -> Result<(), SnapshotError> {
        for root in group.roots() {
            let registry = match group.registry_for_root(&root) {
                Some(reg) => reg,
                None => continue,
            };
            let root_dir = self.directory.join(sanitize_name(&root));
            if !root_dir.exists() {
                fs::create_dir_all(&root_dir).map_err(|e| {
                    SnapshotError::Io(format!(
                        "failed to create root dir {}: {}",
                        root_dir.display(),
                        e
                    ))
                })?;
            }
            write_registry(&root_dir, registry)?;
        }
        Ok(())
    }

    /// Load a registry group.  Each subdirectory of the store root becomes
    /// a namespace root (dots survive sanitisation, so the directory name
    /// is the root).
    pub fn load_group(&self) -> Result<RegistryGroup, SnapshotError> {
        let mut group = RegistryGroup::new();
        if !self.directory.exists() {
            return Ok(group);
        }

        let entries = fs::read_dir(&self.directory).map_err(|e| {
            SnapshotError::Io(format!(
                "failed to read directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let mut roots: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| SnapshotError::Io(format!("directory entry error: {}", e)))?;
            let path = entry.path();
            if path.is_dir() {
                roots.push(path);
            }
        }
        // Deterministic group population order.
        roots.sort();

        for path in roots {
            let root = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            let registry = read_registry(&path)?;
            group.insert_root(root, registry);
        }
        Ok(group)
    }
}

fn write_registry(directory: &Path, registry: &TypeRegistry) -> Result<(), SnapshotError> {
    for descriptor in registry.iter() {
        let filename = format!("{}.json", sanitize_name(&descriptor.discriminator));
        let path = directory.join(filename);
        let json = serde_json::to_string_pretty(descriptor.as_ref())
            .map_err(|e| SnapshotError::Io(format!("serialization error: {}", e)))?;
        fs::write(&path, json).map_err(|e| {
            SnapshotError::Io(format!("failed to write {}: {}", path.display(), e))
        })?;
    }
    Ok(())
}

fn read_registry(directory: &Path) -> Result<TypeRegistry, SnapshotError> {
    let mut registry = TypeRegistry::new();

    let entries = fs::read_dir(directory).map_err(|e| {
        SnapshotError::Io(format!(
            "failed to read directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| SnapshotError::Io(format!("directory entry error: {}", e)))?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    // Register in filename order so replays are deterministic.
    files.sort();

    for path in files {
        let json = fs::read_to_string(&path).map_err(|e| {
            SnapshotError::Io(format!("failed to read {}: {}", path.display(), e))
        })?;
        let descriptor: TypeDescriptor = serde_json::from_str(&json).map_err(|e| {
            SnapshotError::Corrupt(format!("failed to deserialize {}: {}", path.display(), e))
        })?;
        registry.register(descriptor);
    }

    Ok(registry)
}

/// Sanitize a discriminator for use as a file name.
///
/// Replaces characters that are problematic in filesystem paths with
/// underscores.  Dots are legal and kept.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
