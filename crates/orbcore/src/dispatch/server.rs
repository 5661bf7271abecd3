// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Server-side operation dispatcher.
//!
//! The dispatcher maps an inbound method name to a decode -> invoke ->
//! encode pipeline and emits exactly one reply per call: a success
//! payload, a declared-exception payload, or (as a returned error) a
//! fatal transport-level fault. Dispatch is synchronous; the
//! surrounding transport assigns one worker per in-flight request.

use crate::codec::{encode_exception, Decoder, Encoder, ExceptionValue, Value};
use crate::dispatch::error::{DispatchError, DispatchResult};
use crate::typedesc::TypeDescriptor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Failure channel for operation handlers.
#[derive(Debug)]
pub enum HandlerError {
    /// An exception that is part of the operation's declared contract.
    /// Encoded and emitted as a structured, non-fatal exception reply.
    Declared(ExceptionValue),
    /// Anything else. Not recovered at this layer; propagated as a
    /// fatal transport-level fault.
    Fatal(String),
}

/// Handler trait for processing decoded invocations.
///
/// Implement this trait (or use a closure) to bind business logic to an
/// operation.
pub trait OperationHandler: Send + Sync {
    /// Handle one invocation.
    ///
    /// # Arguments
    /// * `args` - Decoded arguments, in the operation's declared order
    ///
    /// # Returns
    /// `Ok(Some(value))` for a value-returning operation, `Ok(None)`
    /// for void, or a [`HandlerError`].
    fn invoke(&self, args: Vec<Value>) -> Result<Option<Value>, HandlerError>;
}

/// A function-based operation handler.
impl<F> OperationHandler for F
where
    F: Fn(Vec<Value>) -> Result<Option<Value>, HandlerError> + Send + Sync,
{
    fn invoke(&self, args: Vec<Value>) -> Result<Option<Value>, HandlerError> {
        self(args)
    }
}

/// One operation's declared signature plus its bound handler.
pub struct OperationDef {
    name: String,
    params: Vec<Arc<TypeDescriptor>>,
    result: Option<Arc<TypeDescriptor>>,
    raises: Vec<Arc<TypeDescriptor>>,
    handler: Box<dyn OperationHandler>,
}

impl OperationDef {
    /// Define an operation bound to `handler`. Parameters, result and
    /// declared exceptions are added fluently.
    pub fn new(name: impl Into<String>, handler: impl OperationHandler + 'static) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            result: None,
            raises: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Append a parameter (declared order).
    pub fn param(mut self, desc: Arc<TypeDescriptor>) -> Self {
        self.params.push(desc);
        self
    }

    /// Set the result type. Absent means void.
    pub fn returns(mut self, desc: Arc<TypeDescriptor>) -> Self {
        self.result = Some(desc);
        self
    }

    /// Declare an exception as part of this operation's contract.
    pub fn raises(mut self, desc: Arc<TypeDescriptor>) -> Self {
        self.raises.push(desc);
        self
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for OperationDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDef")
            .field("name", &self.name)
            .field("params", &self.params.len())
            .field("returns", &self.result.is_some())
            .field("raises", &self.raises.len())
            .finish()
    }
}

/// Reply channel handed in by the transport for one call.
///
/// The dispatcher calls exactly one of these methods at most once per
/// dispatched call.
pub trait ReplySink {
    /// Emit a success reply. The payload is the encoded return value,
    /// empty for a void operation.
    fn success(&mut self, payload: &[u8]);

    /// Emit a declared-exception reply (identity prefix + fields).
    fn exception(&mut self, payload: &[u8]);
}

/// A captured reply payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPayload {
    Success(Vec<u8>),
    Exception(Vec<u8>),
}

/// In-memory [`ReplySink`] for tests and simple transports.
///
/// The first reply wins; any later reply for the same call is dropped
/// with a warning, so a misbehaving caller cannot overwrite an already
/// captured payload.
#[derive(Debug, Default)]
pub struct BufferedReply {
    payload: Option<ReplyPayload>,
}

impl BufferedReply {
    /// Create an empty buffered reply.
    pub fn new() -> Self {
        Self::default()
    }

    /// The captured reply, if one was emitted.
    pub fn payload(&self) -> Option<&ReplyPayload> {
        self.payload.as_ref()
    }

    /// Take the captured reply out.
    pub fn take(&mut self) -> Option<ReplyPayload> {
        self.payload.take()
    }
}

impl ReplySink for BufferedReply {
    fn success(&mut self, payload: &[u8]) {
        if self.payload.is_some() {
            log::warn!("buffered reply: dropping second reply for one call");
            return;
        }
        self.payload = Some(ReplyPayload::Success(payload.to_vec()));
    }

    fn exception(&mut self, payload: &[u8]) {
        if self.payload.is_some() {
            log::warn!("buffered reply: dropping second reply for one call");
            return;
        }
        self.payload = Some(ReplyPayload::Exception(payload.to_vec()));
    }
}

/// Server-side router from method names to handlers.
///
/// The operation table is built once at construction and never mutated;
/// dispatch takes no locks.
pub struct Dispatcher {
    ops: Vec<OperationDef>,
    table: HashMap<String, usize>,
}

impl Dispatcher {
    /// Build a dispatcher from the declared interface.
    ///
    /// Duplicate operation names are rejected: regenerated copies of an
    /// interface must agree on one canonical contract, and a silent
    /// pick between divergent orderings would hide the divergence.
    pub fn new(ops: Vec<OperationDef>) -> DispatchResult<Self> {
        let mut table = HashMap::with_capacity(ops.len());
        for (index, op) in ops.iter().enumerate() {
            if table.insert(op.name.clone(), index).is_some() {
                log::warn!("dispatcher: duplicate operation '{}' rejected", op.name);
                return Err(DispatchError::DuplicateOperation(op.name.clone()));
            }
        }
        Ok(Self { ops, table })
    }

    /// Names in the operation table.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().map(OperationDef::name)
    }

    /// Dispatch one inbound call.
    ///
    /// Emits exactly one reply through `reply` on `Ok`; on `Err` no
    /// reply was emitted and the error is the transport-level fault for
    /// this call. Unknown names are rejected before any argument is
    /// decoded and before any handler side effect.
    pub fn dispatch(
        &self,
        method: &str,
        input: &[u8],
        reply: &mut dyn ReplySink,
    ) -> DispatchResult<()> {
        let index = match self.table.get(method) {
            Some(index) => *index,
            None => {
                log::warn!("dispatcher: unknown operation '{}'", method);
                return Err(DispatchError::UnknownOperation(method.to_string()));
            }
        };
        let op = &self.ops[index];

        // Decoding: arguments strictly in declared parameter order.
        let mut decoder = Decoder::new(input);
        let mut args = Vec::with_capacity(op.params.len());
        for param in &op.params {
            args.push(decoder.decode_value(param)?);
        }

        // Invoking.
        log::debug!("dispatcher: invoking '{}'", op.name);
        match op.handler.invoke(args) {
            Ok(result) => {
                let payload = match (&op.result, result) {
                    (Some(desc), Some(value)) => {
                        let mut encoder = Encoder::new();
                        encoder.encode_value(&value, desc)?;
                        encoder.into_bytes()
                    }
                    (None, None) => Vec::new(),
                    (Some(_), None) => {
                        return Err(DispatchError::HandlerFault(format!(
                            "operation '{}' returned no value",
                            op.name
                        )));
                    }
                    (None, Some(_)) => {
                        return Err(DispatchError::HandlerFault(format!(
                            "void operation '{}' returned a value",
                            op.name
                        )));
                    }
                };
                reply.success(&payload);
                Ok(())
            }
            Err(HandlerError::Declared(exc)) => {
                let desc = op
                    .raises
                    .iter()
                    .find(|d| d.id == exc.id)
                    .ok_or_else(|| DispatchError::UndeclaredException {
                        operation: op.name.clone(),
                        exception_id: exc.id.clone(),
                    })?;
                let payload = encode_exception(&exc, desc)?;
                reply.exception(&payload);
                Ok(())
            }
            Err(HandlerError::Fatal(msg)) => {
                log::warn!("dispatcher: '{}' aborted: {}", op.name, msg);
                Err(DispatchError::HandlerFault(msg))
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("operations", &self.ops.len())
            .finish()
    }
}
