// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discriminator-to-descriptor registry.
//!
//! A [`TypeRegistry`] is an injectable value, not a process-global: callers
//! construct one per namespace root (see [`crate::namespace`]), populate it
//! during single-threaded startup, and treat it as read-only afterwards.
//! Lookups are pure reads, so no locking lives here.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Errors produced by the type registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No descriptor is registered under the discriminator.  At decode
    /// time this is a protocol-version mismatch and is surfaced to the
    /// caller; it is never retried or swallowed.
    UnregisteredType(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnregisteredType(disc) => {
                write!(f, "type not registered: {}", disc)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// TypeResolver
// ---------------------------------------------------------------------------

/// Resolves discriminator strings to descriptors.
///
/// Implemented by [`TypeRegistry`] and by
/// [`RegistryGroup`](crate::namespace::RegistryGroup); the envelope codec
/// is generic over this trait so both work as decode sources.
pub trait TypeResolver {
    /// Look up a descriptor by discriminator.  Returns `None` if unknown.
    fn lookup(&self, discriminator: &str) -> Option<Arc<TypeDescriptor>>;

    /// Resolve a descriptor, failing hard on unknown discriminators.
    fn resolve(&self, discriminator: &str) -> Result<Arc<TypeDescriptor>, RegistryError> {
        self.lookup(discriminator)
            .ok_or_else(|| RegistryError::UnregisteredType(discriminator.to_string()))
    }

    /// Capability ("is-a") query.
    ///
    /// Walks the superclass chain and capability-tag lists transitively
    /// (capability tags may extend other tags).  A broken or unregistered
    /// link stops that branch of the walk; the answer for anything not
    /// reachable is `false`, never an error.
    fn is_capable_of(&self, descriptor: &TypeDescriptor, tag: &str) -> bool {
        if descriptor.discriminator == tag {
            return true;
        }
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(descriptor.discriminator.clone());

        let mut pending: Vec<String> = Vec::new();
        pending.extend(descriptor.superclass.iter().cloned());
        pending.extend(descriptor.capabilities.iter().cloned());

        while let Some(link) = pending.pop() {
            if link == tag {
                return true;
            }
            if !visited.insert(link.clone()) {
                continue;
            }
            if let Some(next) = self.lookup(&link) {
                pending.extend(next.superclass.iter().cloned());
                pending.extend(next.capabilities.iter().cloned());
            }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// TypeRegistry
// ---------------------------------------------------------------------------

/// In-memory map from wire discriminator to type descriptor.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its discriminator.
    ///
    /// Last write wins: re-registering a discriminator silently replaces
    /// the previous entry (a debug log line is the only trace).  Returns
    /// the shared handle for convenience.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        let key = descriptor.discriminator.clone();
        if let Some(previous) = self.types.insert(key, descriptor.clone()) {
            log::debug!(
                "[registry] replacing registration for {}",
                previous.discriminator
            );
        }
        descriptor
    }

    /// `true` if the discriminator is registered.
    pub fn contains(&self, discriminator: &str) -> bool {
        self.types.contains_key(discriminator)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered discriminators (sorted for determinism).
    pub fn discriminators(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    /// Iterate all registered descriptors (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }
}

impl TypeResolver for TypeRegistry {
    fn lookup(&self, discriminator: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(discriminator).cloned()
    }
}
