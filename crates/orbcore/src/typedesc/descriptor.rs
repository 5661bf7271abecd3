// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
}

impl PrimitiveKind {
    /// Get the size in bytes (None for strings, which are length-prefixed).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 | Self::I8 | Self::Char => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 => Some(4),
            Self::U64 | Self::I64 | Self::F64 => Some(8),
            Self::String => None,
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Struct with named fields, in declared order.
    Struct(Vec<FieldDescriptor>),
    /// Sequence (dynamic length) of a single element type.
    Sequence(Arc<TypeDescriptor>),
    /// Enumeration; ordinal = position in the declared label list.
    Enum(Vec<String>),
    /// Declared exception: struct fields behind a repository-id prefix.
    Exception(Vec<FieldDescriptor>),
}

/// A complete type descriptor.
///
/// Immutable once published into a [`TypeRegistry`](crate::TypeRegistry);
/// shared across the process as `Arc<TypeDescriptor>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Repository id (globally unique, e.g. `"IDL:FleetManagement/VehicleInfo:1.0"`).
    /// Empty for anonymous types such as bare primitives.
    pub id: String,
    /// Local type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Create an anonymous primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new("", "", TypeKind::Primitive(kind))
    }

    /// Create a struct type descriptor.
    pub fn struct_type(
        id: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self::new(id, name, TypeKind::Struct(fields))
    }

    /// Create an enum type descriptor from its declared label list.
    pub fn enum_type(
        id: impl Into<String>,
        name: impl Into<String>,
        labels: Vec<String>,
    ) -> Self {
        Self::new(id, name, TypeKind::Enum(labels))
    }

    /// Create a sequence type descriptor.
    pub fn sequence(
        id: impl Into<String>,
        name: impl Into<String>,
        element_type: Arc<TypeDescriptor>,
    ) -> Self {
        Self::new(id, name, TypeKind::Sequence(element_type))
    }

    /// Create an exception type descriptor.
    pub fn exception(
        id: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self::new(id, name, TypeKind::Exception(fields))
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Check if this is an exception type.
    pub fn is_exception(&self) -> bool {
        matches!(self.kind, TypeKind::Exception(_))
    }

    /// Get fields if this is a struct or exception.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) | TypeKind::Exception(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get enum labels if this is an enum.
    pub fn labels(&self) -> Option<&[String]> {
        match &self.kind {
            TypeKind::Enum(labels) => Some(labels),
            _ => None,
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            TypeKind::Primitive(_) => "primitive",
            TypeKind::Struct(_) => "struct",
            TypeKind::Sequence(_) => "sequence",
            TypeKind::Enum(_) => "enum",
            TypeKind::Exception(_) => "exception",
        }
    }
}

/// Field descriptor for struct and exception members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name (not on the wire; declared order is).
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Bool.size(), Some(1));
        assert_eq!(PrimitiveKind::I16.size(), Some(2));
        assert_eq!(PrimitiveKind::U32.size(), Some(4));
        assert_eq!(PrimitiveKind::F64.size(), Some(8));
        assert_eq!(PrimitiveKind::String.size(), None);
    }

    #[test]
    fn test_type_descriptor_struct() {
        let f64_type = Arc::new(TypeDescriptor::primitive(PrimitiveKind::F64));
        let i16_type = Arc::new(TypeDescriptor::primitive(PrimitiveKind::I16));

        let fields = vec![
            FieldDescriptor::new("latitude", f64_type.clone()),
            FieldDescriptor::new("heading", i16_type),
        ];

        let desc = TypeDescriptor::struct_type("IDL:Geo:1.0", "Geo", fields);
        assert!(desc.is_struct());
        assert_eq!(desc.fields().map(<[FieldDescriptor]>::len), Some(2));
        assert!(desc.field("latitude").is_some());
        assert!(desc.field("altitude").is_none());
    }

    #[test]
    fn test_enum_descriptor() {
        let desc = TypeDescriptor::enum_type(
            "IDL:Color:1.0",
            "Color",
            vec!["RED".into(), "GREEN".into(), "BLUE".into()],
        );
        assert_eq!(desc.labels().map(<[String]>::len), Some(3));
        assert_eq!(desc.labels().and_then(|l| l.get(1)).map(String::as_str), Some("GREEN"));
        assert_eq!(desc.kind_name(), "enum");
    }

    #[test]
    fn test_exception_descriptor() {
        let string_type = Arc::new(TypeDescriptor::primitive(PrimitiveKind::String));
        let desc = TypeDescriptor::exception(
            "IDL:NotFound:1.0",
            "NotFound",
            vec![FieldDescriptor::new("message", string_type)],
        );
        assert!(desc.is_exception());
        assert!(!desc.is_struct());
        assert!(desc.field("message").is_some());
    }
}
