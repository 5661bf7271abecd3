// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operation dispatch: the server-side router from method names to
//! decode -> invoke -> encode pipelines.
//!
//! # Reply contract
//!
//! Every dispatched call resolves to exactly one of:
//! - a success payload through [`ReplySink::success`] (empty for void),
//! - a declared-exception payload through [`ReplySink::exception`],
//! - a returned [`DispatchError`] (the transport-level fault; no reply
//!   was emitted).
//!
//! Never two replies, never a silent drop.
//!
//! # Example
//!
//! ```rust
//! use orbcore::codec::Value;
//! use orbcore::dispatch::{BufferedReply, Dispatcher, OperationDef, ReplyPayload};
//! use orbcore::typedesc::{PrimitiveKind, TypeDescriptor};
//! use std::sync::Arc;
//!
//! let string_desc = Arc::new(TypeDescriptor::primitive(PrimitiveKind::String));
//! let ping = OperationDef::new("ping", |_args: Vec<Value>| Ok(Some(Value::from("pong"))))
//!     .returns(string_desc);
//!
//! let dispatcher = Dispatcher::new(vec![ping]).unwrap();
//! let mut reply = BufferedReply::new();
//! dispatcher.dispatch("ping", &[], &mut reply).unwrap();
//! assert!(matches!(reply.payload(), Some(ReplyPayload::Success(_))));
//! ```

mod error;
mod server;

pub use error::{DispatchError, DispatchResult};
pub use server::{
    BufferedReply, Dispatcher, HandlerError, OperationDef, OperationHandler, ReplyPayload,
    ReplySink,
};
