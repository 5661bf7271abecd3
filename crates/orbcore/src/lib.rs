// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # orbcore - Remote-Object Invocation Core
//!
//! The invocation core underlying generated remote-object bindings: a
//! descriptor-driven binary codec for structured values, a server-side
//! operation dispatcher with exactly-once reply semantics, and
//! interface narrowing for remote references.
//!
//! Transport, endpoint directory, and business logic stay outside this
//! crate; they plug in through the [`ReplySink`] and [`ObjectDelegate`]
//! seams.
//!
//! ## Quick Start
//!
//! ```rust
//! use orbcore::codec::{decode_value, encode_value, Value};
//! use orbcore::context::Runtime;
//! use orbcore::typedesc::{PrimitiveKind, TypeDescriptorBuilder};
//!
//! // The runtime hosts the process-wide type registry.
//! let runtime = Runtime::new();
//! runtime.registry().register("IDL:Demo/Reading:1.0", |_reg| {
//!     TypeDescriptorBuilder::new("IDL:Demo/Reading:1.0", "Reading")
//!         .field("sensor_id", PrimitiveKind::U32)
//!         .field("value", PrimitiveKind::F64)
//!         .build()
//! });
//!
//! let desc = runtime.descriptor_for("IDL:Demo/Reading:1.0").unwrap();
//! let reading = Value::structure(vec![
//!     ("sensor_id", Value::from(42u32)),
//!     ("value", Value::from(23.5f64)),
//! ]);
//!
//! let bytes = encode_value(&reading, &desc).unwrap();
//! assert_eq!(decode_value(&bytes, &desc).unwrap(), reading);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                    Transport (external)                      |
//! |        delivers (method, input), accepts reply writers       |
//! +--------------------------------------------------------------+
//! |                        Dispatcher                            |
//! |   name -> handler table | decode args -> invoke -> encode    |
//! +--------------------------------------------------------------+
//! |                       Value Codec                            |
//! |   structs | enums | sequences | strings | exceptions         |
//! +--------------------------------------------------------------+
//! |                  Type Descriptor Registry                    |
//! |   lazy, once-only construction | lock-free published reads   |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`typedesc`] - runtime type descriptors and their registry
//! - [`codec`] - value and exception wire codec
//! - [`dispatch`] - server-side operation routing
//! - [`object`] - remote references and narrowing
//! - [`context`] - process-wide runtime context

/// Binary codec for structured values and declared exceptions.
pub mod codec;
/// Process-wide runtime context hosting the shared type registry.
pub mod context;
/// Server-side operation dispatch.
pub mod dispatch;
/// Remote object references and interface narrowing.
pub mod object;
/// Runtime type descriptors and their registry.
pub mod typedesc;

pub use codec::{
    decode_exception, decode_value, encode_exception, encode_value, Decoder, Encoder,
    ExceptionCodecError, ExceptionValue, MarshalError, Value,
};
pub use context::Runtime;
pub use dispatch::{
    BufferedReply, DispatchError, DispatchResult, Dispatcher, HandlerError, OperationDef,
    OperationHandler, ReplyPayload, ReplySink,
};
pub use object::{NarrowError, ObjectDelegate, ObjectRef};
pub use typedesc::{
    FieldDescriptor, PrimitiveKind, RegistryError, TypeDescriptor, TypeDescriptorBuilder,
    TypeKind, TypeRegistry,
};
