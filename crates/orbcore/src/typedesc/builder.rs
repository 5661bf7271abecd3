// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::typedesc::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
use std::sync::Arc;

/// Builder for struct and exception type descriptors.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    id: String,
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for the given repository id and type name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a primitive field.
    pub fn field(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        let type_desc = Arc::new(TypeDescriptor::primitive(kind));
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add a field with an existing type descriptor (nested struct, enum, ...).
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a sequence field over an element type.
    pub fn sequence_field(
        mut self,
        name: impl Into<String>,
        element_type: Arc<TypeDescriptor>,
    ) -> Self {
        let type_desc = Arc::new(TypeDescriptor::new(
            "",
            "",
            TypeKind::Sequence(element_type),
        ));
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Build a struct TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::struct_type(self.id, self.name, self.fields)
    }

    /// Build an exception TypeDescriptor (struct fields behind an id prefix).
    pub fn build_exception(self) -> TypeDescriptor {
        TypeDescriptor::exception(self.id, self.name, self.fields)
    }
}
