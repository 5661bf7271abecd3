// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary codec for structured values and declared exceptions.
//!
//! Encoding is driven entirely by [`TypeDescriptor`](crate::TypeDescriptor)s:
//! the same generic encoder/decoder handles every registered type, so no
//! per-type generated code is needed.
//!
//! # Wire layout
//!
//! - fixed little-endian primitives, no padding between fields
//! - strings: u32 byte-length prefix + raw UTF-8 bytes
//! - sequences: u32 element count + recursively encoded elements
//! - enums: u32 ordinal matching declared label order
//! - structs: fields in declared order, names never on the wire
//! - exceptions: length-prefixed repository id, then fields as a struct
//!
//! `decode(encode(v)) == v` for every well-formed value; malformed
//! counts, out-of-domain ordinals, and truncated input fail with
//! [`MarshalError`] instead of best-effort truncation.

mod exception;
mod marshal;
mod value;

pub use exception::{decode_exception, encode_exception, ExceptionCodecError, ExceptionValue};
pub use marshal::{decode_value, encode_value, Decoder, Encoder, MarshalError};
pub use value::Value;
