//! Atomic model snapshot slots.
//!
//! A trained model is an immutable value behind an `Arc`. Queries clone
//! the `Arc` out of the slot and run against that snapshot, so a rebuild
//! can swap in a new model while reads are in flight without any query
//! ever seeing a half-written matrix.
//!
//! Builds are serialized through a dedicated gate mutex: a build request
//! arriving while another build is running waits, then adopts the result
//! it finds installed instead of training a second time.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use models::Result;

pub(crate) struct ModelSlot<T> {
    current: RwLock<Option<Arc<T>>>,
    build_gate: Mutex<()>,
}

impl<T> ModelSlot<T> {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            build_gate: Mutex::new(()),
        }
    }

    /// The currently installed model, if any.
    ///
    /// The read lock is held only long enough to clone the `Arc`; the
    /// returned snapshot stays valid across later rebuilds.
    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the installed model, building it first if the slot is empty.
    ///
    /// Concurrent callers coalesce: whoever reaches the gate first builds,
    /// the rest pick up that result after the gate opens.
    pub fn ensure<F>(&self, build: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(model) = self.snapshot() {
            return Ok(model);
        }

        let _gate = self
            .build_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = self.snapshot() {
            return Ok(model);
        }
        self.install(build)
    }

    /// Build unconditionally and swap the result in.
    ///
    /// On failure the previous snapshot stays installed.
    pub fn rebuild<F>(&self, build: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let _gate = self
            .build_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.install(build)
    }

    fn install<F>(&self, build: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let model = Arc::new(build()?);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&model));
        Ok(model)
    }
}
