// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec for declared application exceptions.
//!
//! On the wire an exception is its canonical repository-id string
//! followed by its fields encoded as a struct. The id doubles as the
//! identity discriminator: decode compares it byte-for-byte against the
//! expected constant before interpreting a single field byte, and a
//! mismatch is never coerced into a different exception type.

use crate::codec::marshal::{Decoder, Encoder, MarshalError};
use crate::codec::Value;
use crate::typedesc::{TypeDescriptor, TypeKind};
use std::fmt;

/// A declared application exception: repository id plus ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionValue {
    /// Repository id, e.g. `"IDL:FleetManagement/VehicleNotFound:1.0"`.
    pub id: String,
    /// Fields in declared order.
    pub fields: Vec<(String, Value)>,
}

impl ExceptionValue {
    /// Create an exception value.
    pub fn new<N: Into<String>>(id: impl Into<String>, fields: Vec<(N, Value)>) -> Self {
        Self {
            id: id.into(),
            fields: fields.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl fmt::Display for ExceptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Errors for exception encode/decode.
#[derive(Debug)]
pub enum ExceptionCodecError {
    /// The leading repository id did not exactly match the expected constant.
    Identity { expected: String, found: String },
    /// The descriptor was not an exception descriptor.
    NotAnException(String),
    /// Field marshaling failed.
    Marshal(MarshalError),
}

impl fmt::Display for ExceptionCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity { expected, found } => write!(
                f,
                "Exception identity mismatch: expected '{}', found '{}'",
                expected, found
            ),
            Self::NotAnException(kind) => {
                write!(f, "Descriptor is not an exception (kind: {})", kind)
            }
            Self::Marshal(e) => write!(f, "Exception marshaling failed: {}", e),
        }
    }
}

impl std::error::Error for ExceptionCodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Marshal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MarshalError> for ExceptionCodecError {
    fn from(e: MarshalError) -> Self {
        Self::Marshal(e)
    }
}

/// Encode a declared exception: canonical id string, then fields in
/// declared order.
pub fn encode_exception(
    exception: &ExceptionValue,
    descriptor: &TypeDescriptor,
) -> Result<Vec<u8>, ExceptionCodecError> {
    let fields = match &descriptor.kind {
        TypeKind::Exception(fields) => fields,
        _ => return Err(ExceptionCodecError::NotAnException(descriptor.kind_name().into())),
    };
    if exception.id != descriptor.id {
        return Err(ExceptionCodecError::Identity {
            expected: descriptor.id.clone(),
            found: exception.id.clone(),
        });
    }

    let mut encoder = Encoder::new();
    encoder.write_string(&exception.id)?;
    encoder.encode_fields(&exception.fields, fields)?;
    Ok(encoder.into_bytes())
}

/// Decode a declared exception, verifying the leading id against the
/// descriptor's expected constant.
pub fn decode_exception(
    bytes: &[u8],
    descriptor: &TypeDescriptor,
) -> Result<ExceptionValue, ExceptionCodecError> {
    let fields = match &descriptor.kind {
        TypeKind::Exception(fields) => fields,
        _ => return Err(ExceptionCodecError::NotAnException(descriptor.kind_name().into())),
    };

    let mut decoder = Decoder::new(bytes);
    let found = decoder.read_string().map_err(ExceptionCodecError::Marshal)?;
    if found != descriptor.id {
        return Err(ExceptionCodecError::Identity {
            expected: descriptor.id.clone(),
            found,
        });
    }

    let pairs = decoder.decode_fields(fields)?;
    Ok(ExceptionValue {
        id: found,
        fields: pairs,
    })
}
