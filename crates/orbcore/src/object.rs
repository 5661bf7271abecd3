// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Remote object references and interface narrowing.
//!
//! An [`ObjectRef`] pairs an opaque transport-level delegate with an
//! interface identity. [`ObjectRef::narrow`] converts a generic
//! reference into one typed for a target interface, verified by a
//! remote identity query when the local identity does not already
//! satisfy it; [`ObjectRef::unchecked_narrow`] skips the query and
//! places the burden of correctness on the caller.

use std::fmt;
use std::sync::Arc;

/// Opaque endpoint handle supplied by the transport/directory layer.
///
/// The only capability this layer needs from it is the remote identity
/// query: "does this endpoint implement `interface_id`?".
pub trait ObjectDelegate: Send + Sync {
    /// Remote identity check. One round trip.
    fn is_a(&self, interface_id: &str) -> bool;
}

/// Errors for narrowing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrowError {
    /// The endpoint answered the identity query negatively.
    TypeMismatch { requested: String, actual: String },
}

impl fmt::Display for NarrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { requested, actual } => write!(
                f,
                "Narrow failed: endpoint with identity '{}' does not implement '{}'",
                actual, requested
            ),
        }
    }
}

impl std::error::Error for NarrowError {}

/// A remote object reference: opaque delegate plus interface identity.
#[derive(Clone)]
pub struct ObjectRef {
    delegate: Arc<dyn ObjectDelegate>,
    interface_id: String,
}

impl ObjectRef {
    /// Wrap a delegate under the given interface identity.
    pub fn new(delegate: Arc<dyn ObjectDelegate>, interface_id: impl Into<String>) -> Self {
        Self {
            delegate,
            interface_id: interface_id.into(),
        }
    }

    /// The interface identity this reference is currently typed for.
    pub fn interface_id(&self) -> &str {
        &self.interface_id
    }

    /// True if this reference already satisfies `interface_id` locally.
    pub fn satisfies(&self, interface_id: &str) -> bool {
        self.interface_id == interface_id
    }

    /// Narrow this reference to `target_id`.
    ///
    /// If the reference already satisfies the target interface it is
    /// returned unchanged with no remote traffic. Otherwise one remote
    /// identity query is made: an affirmative answer yields a new proxy
    /// over the same delegate, a negative one fails with
    /// [`NarrowError::TypeMismatch`].
    pub fn narrow(&self, target_id: &str) -> Result<ObjectRef, NarrowError> {
        if self.satisfies(target_id) {
            return Ok(self.clone());
        }
        if self.delegate.is_a(target_id) {
            log::debug!(
                "narrow: '{}' verified as '{}' via remote identity check",
                self.interface_id,
                target_id
            );
            Ok(ObjectRef {
                delegate: Arc::clone(&self.delegate),
                interface_id: target_id.to_string(),
            })
        } else {
            log::warn!(
                "narrow: endpoint '{}' rejected identity '{}'",
                self.interface_id,
                target_id
            );
            Err(NarrowError::TypeMismatch {
                requested: target_id.to_string(),
                actual: self.interface_id.clone(),
            })
        }
    }

    /// Narrow without the remote identity query.
    ///
    /// No round trip, no verification. The caller asserts the endpoint
    /// implements `target_id`; misuse surfaces at call time, not here.
    pub fn unchecked_narrow(&self, target_id: &str) -> ObjectRef {
        if self.satisfies(target_id) {
            return self.clone();
        }
        ObjectRef {
            delegate: Arc::clone(&self.delegate),
            interface_id: target_id.to_string(),
        }
    }
}

impl PartialEq for ObjectRef {
    /// Two references are equal when they wrap the same delegate under
    /// the same interface identity.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.delegate, &other.delegate) && self.interface_id == other.interface_id
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("interface_id", &self.interface_id)
            .field("delegate", &Arc::as_ptr(&self.delegate))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TRACKER_ID: &str = "IDL:Test/Tracker:1.0";

    struct CountingDelegate {
        implements: Vec<String>,
        queries: AtomicUsize,
    }

    impl CountingDelegate {
        fn new(implements: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                implements: implements.iter().map(ToString::to_string).collect(),
                queries: AtomicUsize::new(0),
            })
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl ObjectDelegate for CountingDelegate {
        fn is_a(&self, interface_id: &str) -> bool {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.implements.iter().any(|id| id == interface_id)
        }
    }

    #[test]
    fn narrow_identity_path_skips_remote_check() {
        let delegate = CountingDelegate::new(&[TRACKER_ID]);
        let r = ObjectRef::new(delegate.clone(), TRACKER_ID);

        let narrowed = r.narrow(TRACKER_ID).expect("narrow");
        assert_eq!(narrowed, r);
        assert_eq!(delegate.queries(), 0);
    }

    #[test]
    fn narrow_verifies_then_rewraps_same_delegate() {
        let delegate = CountingDelegate::new(&[TRACKER_ID]);
        let generic = ObjectRef::new(delegate.clone(), "IDL:Test/Object:1.0");

        let narrowed = generic.narrow(TRACKER_ID).expect("narrow");
        assert_eq!(narrowed.interface_id(), TRACKER_ID);
        assert_eq!(delegate.queries(), 1);

        // Idempotence: narrowing the result again is the identity path.
        let again = narrowed.narrow(TRACKER_ID).expect("narrow");
        assert_eq!(again, narrowed);
        assert_eq!(delegate.queries(), 1);
    }

    #[test]
    fn narrow_negative_answer_is_type_mismatch() {
        let delegate = CountingDelegate::new(&[]);
        let generic = ObjectRef::new(delegate, "IDL:Test/Object:1.0");

        let err = generic.narrow(TRACKER_ID).unwrap_err();
        assert_eq!(
            err,
            NarrowError::TypeMismatch {
                requested: TRACKER_ID.to_string(),
                actual: "IDL:Test/Object:1.0".to_string(),
            }
        );
    }

    #[test]
    fn unchecked_narrow_never_queries() {
        // Delegate that does not implement the target; unchecked_narrow
        // must neither ask nor care.
        let delegate = CountingDelegate::new(&[]);
        let generic = ObjectRef::new(delegate.clone(), "IDL:Test/Object:1.0");

        let narrowed = generic.unchecked_narrow(TRACKER_ID);
        assert_eq!(narrowed.interface_id(), TRACKER_ID);
        assert_eq!(delegate.queries(), 0);
    }
}
