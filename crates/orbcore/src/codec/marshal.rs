// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire codec for structured values.
//!
//! Fixed little-endian layout, no padding between fields, no field names
//! on the wire. Strings are a u32 byte-length prefix followed by raw
//! UTF-8; sequences are a u32 element count followed by the elements;
//! enums are a u32 ordinal in declaration order; struct fields are
//! written strictly in declared order.

use crate::codec::Value;
use crate::typedesc::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
use std::fmt;

/// Errors for marshal/unmarshal operations.
#[derive(Debug)]
pub enum MarshalError {
    /// Input ended before a value was complete.
    UnexpectedEof { need: usize, have: usize },
    /// A sequence declared more elements than bytes remain in the input.
    SequenceBound { declared: usize, remaining: usize },
    /// An enum ordinal fell outside its declared domain.
    EnumOrdinal { ordinal: u32, domain: usize },
    /// String bytes were not valid UTF-8.
    Utf8(std::string::FromUtf8Error),
    /// The value did not match the descriptor's kind.
    TypeMismatch { expected: String, found: String },
    /// A struct value was missing a declared field.
    MissingField(String),
    /// A char outside the single-byte wire range.
    CharRange { value: char },
    /// A string or sequence longer than the u32 length prefix can carry.
    LengthOverflow { length: usize },
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { need, have } => {
                write!(f, "Truncated input: need {} bytes, have {}", need, have)
            }
            Self::SequenceBound { declared, remaining } => write!(
                f,
                "Sequence count too large: {} declared, only {} bytes remaining",
                declared, remaining
            ),
            Self::EnumOrdinal { ordinal, domain } => write!(
                f,
                "Enum ordinal {} outside declared domain of {} labels",
                ordinal, domain
            ),
            Self::Utf8(e) => write!(f, "UTF-8 error: {}", e),
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Self::MissingField(name) => write!(f, "Missing field: {}", name),
            Self::CharRange { value } => write!(
                f,
                "Char U+{:04X} outside the single-byte wire range",
                *value as u32
            ),
            Self::LengthOverflow { length } => {
                write!(f, "Length {} exceeds the u32 prefix range", length)
            }
        }
    }
}

impl std::error::Error for MarshalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::string::FromUtf8Error> for MarshalError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}

/// Encode a single value against its descriptor.
pub fn encode_value(value: &Value, descriptor: &TypeDescriptor) -> Result<Vec<u8>, MarshalError> {
    let mut encoder = Encoder::new();
    encoder.encode_value(value, descriptor)?;
    Ok(encoder.into_bytes())
}

/// Decode a single value against its descriptor.
pub fn decode_value(bytes: &[u8], descriptor: &TypeDescriptor) -> Result<Value, MarshalError> {
    let mut decoder = Decoder::new(bytes);
    decoder.decode_value(descriptor)
}

/// Streaming encoder; values appended in call order.
///
/// Public so callers can marshal an operation's argument list into one
/// contiguous stream, the caller side of the request data flow.
#[derive(Debug, Default)]
pub struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Consume the encoder and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if nothing was written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Encode one value against its descriptor, appending to the stream.
    pub fn encode_value(
        &mut self,
        value: &Value,
        descriptor: &TypeDescriptor,
    ) -> Result<(), MarshalError> {
        match &descriptor.kind {
            TypeKind::Primitive(p) => self.encode_primitive(value, *p),
            TypeKind::Struct(fields) => {
                if let Value::Struct(pairs) = value {
                    self.encode_fields(pairs, fields)
                } else {
                    Err(MarshalError::TypeMismatch {
                        expected: "struct".into(),
                        found: value.kind_name().into(),
                    })
                }
            }
            TypeKind::Sequence(element_type) => {
                if let Value::Sequence(elems) = value {
                    let count = u32::try_from(elems.len())
                        .map_err(|_| MarshalError::LengthOverflow { length: elems.len() })?;
                    self.write_u32(count);
                    for elem in elems {
                        self.encode_value(elem, element_type)?;
                    }
                    Ok(())
                } else {
                    Err(MarshalError::TypeMismatch {
                        expected: "sequence".into(),
                        found: value.kind_name().into(),
                    })
                }
            }
            TypeKind::Enum(labels) => {
                if let Value::Enum(ordinal, _) = value {
                    if *ordinal as usize >= labels.len() {
                        return Err(MarshalError::EnumOrdinal {
                            ordinal: *ordinal,
                            domain: labels.len(),
                        });
                    }
                    self.write_u32(*ordinal);
                    Ok(())
                } else {
                    Err(MarshalError::TypeMismatch {
                        expected: "enum".into(),
                        found: value.kind_name().into(),
                    })
                }
            }
            // Exceptions carry an identity prefix; the exception codec owns that layout.
            TypeKind::Exception(_) => Err(MarshalError::TypeMismatch {
                expected: "non-exception type".into(),
                found: "exception descriptor".into(),
            }),
        }
    }

    /// Encode struct fields in declared order, looking each up by name.
    pub(crate) fn encode_fields(
        &mut self,
        pairs: &[(String, Value)],
        fields: &[FieldDescriptor],
    ) -> Result<(), MarshalError> {
        for field in fields {
            let field_value = pairs
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, v)| v)
                .ok_or_else(|| MarshalError::MissingField(field.name.clone()))?;
            self.encode_value(field_value, &field.type_desc)?;
        }
        Ok(())
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub(crate) fn write_string(&mut self, s: &str) -> Result<(), MarshalError> {
        let bytes = s.as_bytes();
        let len = u32::try_from(bytes.len())
            .map_err(|_| MarshalError::LengthOverflow { length: bytes.len() })?;
        self.write_u32(len);
        self.buffer.extend(bytes);
        Ok(())
    }

    fn encode_primitive(&mut self, value: &Value, kind: PrimitiveKind) -> Result<(), MarshalError> {
        match (value, kind) {
            (Value::Bool(v), PrimitiveKind::Bool) => {
                self.buffer.push(u8::from(*v));
            }
            (Value::U8(v), PrimitiveKind::U8) => {
                self.buffer.push(*v);
            }
            (Value::U16(v), PrimitiveKind::U16) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::U32(v), PrimitiveKind::U32) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::U64(v), PrimitiveKind::U64) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::I8(v), PrimitiveKind::I8) => {
                self.buffer.push(*v as u8);
            }
            (Value::I16(v), PrimitiveKind::I16) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::I32(v), PrimitiveKind::I32) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::I64(v), PrimitiveKind::I64) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::F32(v), PrimitiveKind::F32) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::F64(v), PrimitiveKind::F64) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::Char(v), PrimitiveKind::Char) => {
                // One byte on the wire; anything past U+00FF cannot
                // round-trip and must fail instead of truncating.
                let code = u8::try_from(*v as u32)
                    .map_err(|_| MarshalError::CharRange { value: *v })?;
                self.buffer.push(code);
            }
            (Value::String(s), PrimitiveKind::String) => {
                self.write_string(s)?;
            }
            _ => {
                return Err(MarshalError::TypeMismatch {
                    expected: format!("{:?}", kind),
                    found: value.kind_name().into(),
                });
            }
        }
        Ok(())
    }
}

/// Streaming decoder over a borrowed input buffer.
#[derive(Debug)]
pub struct Decoder<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder over `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], MarshalError> {
        if self.offset + count > self.buffer.len() {
            return Err(MarshalError::UnexpectedEof {
                need: count,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, MarshalError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_string(&mut self) -> Result<String, MarshalError> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Decode one value against its descriptor, advancing the stream.
    pub fn decode_value(&mut self, descriptor: &TypeDescriptor) -> Result<Value, MarshalError> {
        match &descriptor.kind {
            TypeKind::Primitive(p) => self.decode_primitive(*p),
            TypeKind::Struct(fields) => Ok(Value::Struct(self.decode_fields(fields)?)),
            TypeKind::Sequence(element_type) => {
                let declared = self.read_u32()? as usize;
                // Every element costs at least one byte; a count beyond the
                // remaining input is malformed or hostile, and must fail
                // before any element allocation.
                if declared > self.remaining() {
                    return Err(MarshalError::SequenceBound {
                        declared,
                        remaining: self.remaining(),
                    });
                }
                let mut elems = Vec::with_capacity(declared);
                for _ in 0..declared {
                    elems.push(self.decode_value(element_type)?);
                }
                Ok(Value::Sequence(elems))
            }
            TypeKind::Enum(labels) => {
                let ordinal = self.read_u32()?;
                let label = labels
                    .get(ordinal as usize)
                    .ok_or(MarshalError::EnumOrdinal {
                        ordinal,
                        domain: labels.len(),
                    })?;
                Ok(Value::Enum(ordinal, label.clone()))
            }
            TypeKind::Exception(_) => Err(MarshalError::TypeMismatch {
                expected: "non-exception type".into(),
                found: "exception descriptor".into(),
            }),
        }
    }

    /// Decode struct fields strictly in declared order.
    pub(crate) fn decode_fields(
        &mut self,
        fields: &[FieldDescriptor],
    ) -> Result<Vec<(String, Value)>, MarshalError> {
        let mut pairs = Vec::with_capacity(fields.len());
        for field in fields {
            let value = self.decode_value(&field.type_desc)?;
            pairs.push((field.name.clone(), value));
        }
        Ok(pairs)
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> Result<Value, MarshalError> {
        match kind {
            PrimitiveKind::Bool => {
                let bytes = self.read_bytes(1)?;
                Ok(Value::Bool(bytes[0] != 0))
            }
            PrimitiveKind::U8 => {
                let bytes = self.read_bytes(1)?;
                Ok(Value::U8(bytes[0]))
            }
            PrimitiveKind::U16 => {
                let bytes = self.read_bytes(2)?;
                Ok(Value::U16(u16::from_le_bytes([bytes[0], bytes[1]])))
            }
            PrimitiveKind::U32 => Ok(Value::U32(self.read_u32()?)),
            PrimitiveKind::U64 => {
                let bytes = self.read_bytes(8)?;
                Ok(Value::U64(u64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ])))
            }
            PrimitiveKind::I8 => {
                let bytes = self.read_bytes(1)?;
                Ok(Value::I8(bytes[0] as i8))
            }
            PrimitiveKind::I16 => {
                let bytes = self.read_bytes(2)?;
                Ok(Value::I16(i16::from_le_bytes([bytes[0], bytes[1]])))
            }
            PrimitiveKind::I32 => {
                let bytes = self.read_bytes(4)?;
                Ok(Value::I32(i32::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3],
                ])))
            }
            PrimitiveKind::I64 => {
                let bytes = self.read_bytes(8)?;
                Ok(Value::I64(i64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ])))
            }
            PrimitiveKind::F32 => {
                let bytes = self.read_bytes(4)?;
                Ok(Value::F32(f32::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3],
                ])))
            }
            PrimitiveKind::F64 => {
                let bytes = self.read_bytes(8)?;
                Ok(Value::F64(f64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ])))
            }
            PrimitiveKind::Char => {
                let bytes = self.read_bytes(1)?;
                Ok(Value::Char(bytes[0] as char))
            }
            PrimitiveKind::String => Ok(Value::String(self.read_string()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typedesc::TypeDescriptorBuilder;
    use std::sync::Arc;

    fn reading_desc() -> TypeDescriptor {
        TypeDescriptorBuilder::new("IDL:Test/Reading:1.0", "Reading")
            .field("flag", PrimitiveKind::Bool)
            .field("raw", PrimitiveKind::U8)
            .field("count", PrimitiveKind::U32)
            .field("value", PrimitiveKind::F64)
            .build()
    }

    #[test]
    fn roundtrip_primitives() {
        let desc = reading_desc();
        let value = Value::structure(vec![
            ("flag", Value::from(true)),
            ("raw", Value::from(42u8)),
            ("count", Value::from(12345u32)),
            ("value", Value::from(std::f64::consts::E)),
        ]);

        let encoded = encode_value(&value, &desc).expect("encode");
        // 1 + 1 + 4 + 8, no padding
        assert_eq!(encoded.len(), 14);
        let decoded = decode_value(&encoded, &desc).expect("decode");
        assert_eq!(decoded, value);
    }

    #[test]
    fn char_outside_single_byte_range_fails_on_encode() {
        let desc = TypeDescriptor::primitive(PrimitiveKind::Char);

        let err = encode_value(&Value::from('\u{20AC}'), &desc).unwrap_err();
        assert!(matches!(err, MarshalError::CharRange { value: '\u{20AC}' }));

        // The whole single-byte range still round-trips.
        let encoded = encode_value(&Value::from('\u{E9}'), &desc).expect("encode");
        assert_eq!(encoded, [0xE9]);
        assert_eq!(
            decode_value(&encoded, &desc).expect("decode"),
            Value::from('\u{E9}')
        );
    }

    #[test]
    fn string_layout_is_length_prefix_plus_raw_bytes() {
        let desc = TypeDescriptor::primitive(PrimitiveKind::String);
        let encoded = encode_value(&Value::from("V-42"), &desc).expect("encode");
        assert_eq!(encoded, [4, 0, 0, 0, b'V', b'-', b'4', b'2']);
        assert_eq!(
            decode_value(&encoded, &desc).expect("decode"),
            Value::from("V-42")
        );
    }

    #[test]
    fn struct_fields_written_in_declared_order_not_value_order() {
        let desc = TypeDescriptorBuilder::new("IDL:Test/Pair:1.0", "Pair")
            .field("a", PrimitiveKind::U8)
            .field("b", PrimitiveKind::U8)
            .build();
        // Value lists b first; the wire must still carry a then b.
        let value = Value::structure(vec![
            ("b", Value::from(2u8)),
            ("a", Value::from(1u8)),
        ]);
        let encoded = encode_value(&value, &desc).expect("encode");
        assert_eq!(encoded, [1, 2]);
    }

    #[test]
    fn missing_struct_field_fails() {
        let desc = reading_desc();
        let value = Value::structure(vec![("flag", Value::from(true))]);
        let err = encode_value(&value, &desc).unwrap_err();
        assert!(matches!(err, MarshalError::MissingField(name) if name == "raw"));
    }

    #[test]
    fn roundtrip_sequence() {
        let elem = Arc::new(TypeDescriptor::primitive(PrimitiveKind::U16));
        let desc = TypeDescriptor::sequence("", "", elem);
        let value = Value::from(vec![7u16, 8, 9]);

        let encoded = encode_value(&value, &desc).expect("encode");
        assert_eq!(encoded.len(), 4 + 3 * 2);
        assert_eq!(&encoded[..4], [3, 0, 0, 0]);
        assert_eq!(decode_value(&encoded, &desc).expect("decode"), value);
    }

    #[test]
    fn sequence_count_beyond_remaining_bytes_fails() {
        let elem = Arc::new(TypeDescriptor::primitive(PrimitiveKind::U8));
        let desc = TypeDescriptor::sequence("", "", elem);
        // Declares 1,000,000 elements with 4 bytes remaining.
        let mut bytes = 1_000_000u32.to_le_bytes().to_vec();
        bytes.extend([0xAA, 0xBB, 0xCC, 0xDD]);

        let err = decode_value(&bytes, &desc).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::SequenceBound {
                declared: 1_000_000,
                remaining: 4
            }
        ));
    }

    #[test]
    fn enum_roundtrip_and_domain_check() {
        let desc = TypeDescriptor::enum_type(
            "IDL:Test/Status:1.0",
            "Status",
            vec!["MOVING".into(), "IDLE".into(), "PARKED".into(), "MAINTENANCE".into()],
        );

        let encoded = encode_value(&Value::Enum(2, "PARKED".into()), &desc).expect("encode");
        assert_eq!(encoded, [2, 0, 0, 0]);
        assert_eq!(
            decode_value(&encoded, &desc).expect("decode"),
            Value::Enum(2, "PARKED".into())
        );

        let err = decode_value(&99u32.to_le_bytes(), &desc).unwrap_err();
        assert!(matches!(err, MarshalError::EnumOrdinal { ordinal: 99, domain: 4 }));

        let err = encode_value(&Value::Enum(7, "BOGUS".into()), &desc).unwrap_err();
        assert!(matches!(err, MarshalError::EnumOrdinal { ordinal: 7, domain: 4 }));
    }

    #[test]
    fn truncated_input_fails() {
        let desc = TypeDescriptor::primitive(PrimitiveKind::U32);
        let err = decode_value(&[1, 2], &desc).unwrap_err();
        assert!(matches!(err, MarshalError::UnexpectedEof { need: 4, have: 2 }));
    }

    #[test]
    fn nested_struct_roundtrip() {
        let point = Arc::new(
            TypeDescriptorBuilder::new("IDL:Test/Point:1.0", "Point")
                .field("x", PrimitiveKind::I32)
                .field("y", PrimitiveKind::I32)
                .build(),
        );
        let rect = TypeDescriptorBuilder::new("IDL:Test/Rect:1.0", "Rect")
            .field_with_type("origin", point)
            .field("width", PrimitiveKind::U32)
            .field("height", PrimitiveKind::U32)
            .build();

        let value = Value::structure(vec![
            (
                "origin",
                Value::structure(vec![("x", Value::from(10i32)), ("y", Value::from(20i32))]),
            ),
            ("width", Value::from(100u32)),
            ("height", Value::from(50u32)),
        ]);

        let encoded = encode_value(&value, &rect).expect("encode");
        assert_eq!(encoded.len(), 16);
        assert_eq!(decode_value(&encoded, &rect).expect("decode"), value);
    }

    #[test]
    fn type_mismatch_reports_kinds() {
        let desc = TypeDescriptor::primitive(PrimitiveKind::U32);
        let err = encode_value(&Value::from("oops"), &desc).unwrap_err();
        match err {
            MarshalError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "U32");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn randomized_roundtrip() {
        let desc = TypeDescriptorBuilder::new("IDL:Test/Blob:1.0", "Blob")
            .string_field("tag")
            .field("id", PrimitiveKind::U64)
            .sequence_field(
                "data",
                Arc::new(TypeDescriptor::primitive(PrimitiveKind::U8)),
            )
            .build();

        fastrand::seed(0x5EED);
        for _ in 0..64 {
            let tag: String = (0..fastrand::usize(0..24))
                .map(|_| fastrand::alphanumeric())
                .collect();
            let data: Vec<u8> = (0..fastrand::usize(0..128)).map(|_| fastrand::u8(..)).collect();
            let value = Value::structure(vec![
                ("tag", Value::from(tag)),
                ("id", Value::from(fastrand::u64(..))),
                ("data", Value::from(data)),
            ]);

            let encoded = encode_value(&value, &desc).expect("encode");
            assert_eq!(decode_value(&encoded, &desc).expect("decode"), value);
        }
    }
}
