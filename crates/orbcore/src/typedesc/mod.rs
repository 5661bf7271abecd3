// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors and their process-wide registry.
//!
//! A [`TypeDescriptor`] is an immutable description of a structured
//! type's shape (member names, kinds, nested descriptors) used to drive
//! generic encode/decode. Descriptors for registered repository ids are
//! constructed lazily, exactly once, by the [`TypeRegistry`].
//!
//! # Example
//!
//! ```rust
//! use orbcore::typedesc::{PrimitiveKind, TypeDescriptorBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! registry.register("IDL:Demo/Reading:1.0", |_reg| {
//!     TypeDescriptorBuilder::new("IDL:Demo/Reading:1.0", "Reading")
//!         .field("sensor_id", PrimitiveKind::U32)
//!         .field("value", PrimitiveKind::F64)
//!         .build()
//! });
//!
//! let desc = registry.descriptor_for("IDL:Demo/Reading:1.0").unwrap();
//! assert_eq!(desc.name, "Reading");
//! ```

mod builder;
mod descriptor;
mod registry;

pub use builder::TypeDescriptorBuilder;
pub use descriptor::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
pub use registry::{DescriptorBuilderFn, RegistryError, TypeRegistry};
