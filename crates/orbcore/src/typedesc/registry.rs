// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide registry of type descriptors.
//!
//! Descriptors are constructed lazily on first reference to a repository
//! id and published exactly once; all subsequent lookups take a lock-free
//! read path. Construction is pure: a registered builder only assembles
//! structural metadata.

use crate::typedesc::TypeDescriptor;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Errors for registry lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No builder registered for the requested repository id.
    UnknownType(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(id) => write!(f, "Unknown type id: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Pure construction function for one type's descriptor.
///
/// Builders may resolve nested ids through the registry they are handed;
/// cyclic type graphs are unsupported.
pub type DescriptorBuilderFn = Arc<dyn Fn(&TypeRegistry) -> TypeDescriptor + Send + Sync>;

/// Registry mapping repository ids to lazily constructed descriptors.
///
/// The slow path (first construction of a given id) is serialized by a
/// compute-once cell; the fast path reads a published `Arc` without
/// taking any lock.
pub struct TypeRegistry {
    /// Registered construction functions, written at startup.
    builders: RwLock<HashMap<String, DescriptorBuilderFn>>,
    /// Published descriptors, one compute-once slot per id.
    published: DashMap<String, Arc<OnceLock<Arc<TypeDescriptor>>>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            builders: RwLock::new(HashMap::new()),
            published: DashMap::new(),
        }
    }

    /// Register a builder for a repository id.
    ///
    /// Later registrations for an id that already has a builder are
    /// ignored; the first registration wins, matching the immutability
    /// of anything already published under that id.
    pub fn register<F>(&self, type_id: impl Into<String>, builder: F)
    where
        F: Fn(&TypeRegistry) -> TypeDescriptor + Send + Sync + 'static,
    {
        let type_id = type_id.into();
        let mut builders = self.builders.write();
        if builders.contains_key(&type_id) {
            log::warn!("type registry: duplicate builder for '{}' ignored", type_id);
            return;
        }
        builders.insert(type_id, Arc::new(builder));
    }

    /// True if a builder is registered for `type_id`.
    pub fn is_registered(&self, type_id: &str) -> bool {
        self.builders.read().contains_key(type_id)
    }

    /// Return the published descriptor for `type_id`, constructing it on
    /// first call.
    ///
    /// Concurrent first callers never race to construct divergent
    /// descriptors: exactly one construction occurs and every caller
    /// observes the same published instance.
    pub fn descriptor_for(&self, type_id: &str) -> Result<Arc<TypeDescriptor>, RegistryError> {
        let slot = self
            .published
            .entry(type_id.to_string())
            .or_insert_with(|| Arc::new(OnceLock::new()))
            .clone();

        // Fast path: already published.
        if let Some(desc) = slot.get() {
            return Ok(desc.clone());
        }

        let builder = self
            .builders
            .read()
            .get(type_id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(type_id.to_string()))?;

        let desc = slot.get_or_init(|| {
            log::debug!("type registry: constructing descriptor for '{}'", type_id);
            Arc::new(builder(self))
        });
        Ok(desc.clone())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("registered", &self.builders.read().len())
            .field("published", &self.published.len())
            .finish()
    }
}
