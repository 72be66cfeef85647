//! Cancellation handles for scheduled work.
//!
//! Every `schedule*` call returns a [`Disposable`]. Disposing it before the
//! entry runs guarantees the entry is skipped; disposing it afterwards is a
//! no-op. Cancellation is best effort: an invocation that already passed its
//! pre-invoke check still completes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::sync::lock;

/// Shared cancellation flag for one scheduled entry.
///
/// Clones observe the same flag. Dropping a handle does not cancel anything.
#[derive(Clone, Default)]
pub struct Disposable {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    disposed: AtomicBool,
    /// Latest handle returned by the action this handle guards.
    continuation: Mutex<Option<Disposable>>,
    /// Handle whose continuation slot holds this one, if any.
    parent: Mutex<Weak<Inner>>,
}

impl Disposable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    ///
    /// Also disposes the continuation attached by a self-rescheduling action.
    pub fn dispose(&self) {
        let mut current = Some(self.clone());
        while let Some(handle) = current.take() {
            if handle.inner.disposed.swap(true, Ordering::AcqRel) {
                break;
            }
            current = lock(&handle.inner.continuation).take();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Attaches the handle returned by this entry's action.
    ///
    /// `self` always keeps `next`, so disposing any link cancels everything
    /// after it. When the parent's slot still points at `self`, the parent is
    /// re-pointed at `next` as well; an action that reschedules itself forever
    /// then leaves only the newest link reachable from the first handle.
    pub(crate) fn chain(&self, next: Disposable) {
        if Arc::ptr_eq(&self.inner, &next.inner) {
            return;
        }

        *lock(&next.inner.parent) = Arc::downgrade(&self.inner);

        {
            let mut slot = lock(&self.inner.continuation);
            if self.is_disposed() {
                drop(slot);
                next.dispose();
                return;
            }
            *slot = Some(next.clone());
        }

        let Some(parent) = lock(&self.inner.parent).upgrade() else {
            return;
        };

        let spliced = {
            let mut slot = lock(&parent.continuation);
            let holds_self = slot
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(&current.inner, &self.inner));
            if holds_self {
                *slot = Some(next.clone());
            }
            holds_self
        };

        if spliced {
            *lock(&next.inner.parent) = Arc::downgrade(&parent);
        }
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
