// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One registry per namespace root.
//!
//! The wire carries parallel type families under different dotted roots
//! (the application server emits `as.dto.*`, the data-store server
//! `dss.dto.*`).  Each root is an independent API surface, so each gets
//! its own [`TypeRegistry`]; nothing is shared or deduplicated across
//! roots.

use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::registry::{TypeRegistry, TypeResolver};

/// Routes discriminators to per-namespace-root registries.
///
/// Routing picks the longest registered root that prefixes the
/// discriminator on a dot boundary (`as.dto` matches `as.dto.space.*`
/// but not `as.dtox.*`).
#[derive(Debug, Default)]
pub struct RegistryGroup {
    roots: Vec<(String, TypeRegistry)>,
}

impl RegistryGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a registry under a namespace root.
    ///
    /// Re-inserting a root replaces its registry (last write wins, like
    /// registration itself).
    pub fn insert_root(&mut self, root: impl Into<String>, registry: TypeRegistry) {
        let root = root.into();
        match self.roots.iter().position(|(r, _)| *r == root) {
            Some(idx) => {
                log::debug!("[namespace] replacing registry for root {}", root);
                self.roots[idx].1 = registry;
            }
            None => self.roots.push((root, registry)),
        }
    }

    /// The registry owning a discriminator, by longest matching root.
    pub fn registry_for(&self, discriminator: &str) -> Option<&TypeRegistry> {
        self.roots
            .iter()
            .filter(|(root, _)| root_matches(root, discriminator))
            .max_by_key(|(root, _)| root.len())
            .map(|(_, reg)| reg)
    }

    /// The registry attached to an exact root.
    pub fn registry_for_root(&self, root: &str) -> Option<&TypeRegistry> {
        self.roots
            .iter()
            .find(|(r, _)| r == root)
            .map(|(_, reg)| reg)
    }

    /// Mutable access to a root's registry (startup phase only).
    pub fn registry_for_root_mut(&mut self, root: &str) -> Option<&mut TypeRegistry> {
        self.roots
            .iter_mut()
            .find(|(r, _)| r == root)
            .map(|(_, reg)| reg)
    }

    /// All roots (sorted for determinism).
    pub fn roots(&self) -> Vec<String> {
        let mut roots: Vec<String> = self.roots.iter().map(|(r, _)| r.clone()).collect();
        roots.sort();
        roots
    }

    /// Total registered types across all roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.iter().map(|(_, reg)| reg.len()).sum()
    }

    /// Returns `true` if no root holds any type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `root` prefixes `discriminator` on a dot boundary.
fn root_matches(root: &str, discriminator: &str) -> bool {
    discriminator.len() > root.len()
        && discriminator.starts_with(root)
        && discriminator.as_bytes()[root.len()] == b'.'
}

impl TypeResolver for RegistryGroup {
    fn lookup(&self, discriminator: &str) -> Option<Arc<TypeDescriptor>> {
        self.registry_for(discriminator)?.lookup(discriminator)
    }
}
