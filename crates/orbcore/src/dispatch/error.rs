// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for operation dispatch.

use crate::codec::{ExceptionCodecError, MarshalError};
use std::fmt;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors that abort a dispatched call without a reply.
///
/// Everything here is a transport-level fault from the caller's point
/// of view; only declared exceptions travel as structured replies, and
/// those never surface as a `DispatchError`.
#[derive(Debug)]
pub enum DispatchError {
    /// The method name is absent from the operation table. Rejected
    /// before any decode or handler invocation.
    UnknownOperation(String),

    /// Two operations with the same name at construction time.
    DuplicateOperation(String),

    /// Argument decoding or result encoding failed.
    Marshal(MarshalError),

    /// Encoding a declared exception reply failed.
    ExceptionCodec(ExceptionCodecError),

    /// A handler raised an exception not in the operation's contract.
    UndeclaredException {
        operation: String,
        exception_id: String,
    },

    /// A handler failed in a way its contract does not cover.
    HandlerFault(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOperation(name) => write!(f, "Unknown operation: {}", name),
            Self::DuplicateOperation(name) => {
                write!(f, "Duplicate operation in table: {}", name)
            }
            Self::Marshal(e) => write!(f, "Dispatch marshaling failed: {}", e),
            Self::ExceptionCodec(e) => write!(f, "Exception reply encoding failed: {}", e),
            Self::UndeclaredException {
                operation,
                exception_id,
            } => write!(
                f,
                "Operation '{}' raised undeclared exception '{}'",
                operation, exception_id
            ),
            Self::HandlerFault(msg) => write!(f, "Handler fault: {}", msg),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Marshal(e) => Some(e),
            Self::ExceptionCodec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MarshalError> for DispatchError {
    fn from(e: MarshalError) -> Self {
        Self::Marshal(e)
    }
}

impl From<ExceptionCodecError> for DispatchError {
    fn from(e: ExceptionCodecError) -> Self {
        Self::ExceptionCodec(e)
    }
}
