// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide runtime context.
//!
//! Owns the shared [`TypeRegistry`] and hands it to codec users and
//! dispatcher builders at construction, so descriptor caching stays an
//! explicit object instead of hidden global state.

use crate::typedesc::{RegistryError, TypeDescriptor, TypeRegistry};
use std::sync::Arc;

/// Runtime context hosting the shared type descriptor registry.
///
/// Constructed once at startup; passed by `Arc` to every component that
/// encodes, decodes, or dispatches.
#[derive(Debug)]
pub struct Runtime {
    registry: Arc<TypeRegistry>,
}

impl Runtime {
    /// Create a runtime with an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            registry: Arc::new(TypeRegistry::new()),
        })
    }

    /// The shared type descriptor registry.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Shorthand for [`TypeRegistry::descriptor_for`].
    pub fn descriptor_for(&self, type_id: &str) -> Result<Arc<TypeDescriptor>, RegistryError> {
        self.registry.descriptor_for(type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typedesc::{PrimitiveKind, TypeDescriptorBuilder};

    #[test]
    fn runtime_shares_one_registry() {
        let runtime = Runtime::new();
        runtime.registry().register("IDL:Test/T:1.0", |_reg| {
            TypeDescriptorBuilder::new("IDL:Test/T:1.0", "T")
                .field("v", PrimitiveKind::U32)
                .build()
        });

        let a = runtime.descriptor_for("IDL:Test/T:1.0").unwrap();
        let b = runtime.registry().descriptor_for("IDL:Test/T:1.0").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
