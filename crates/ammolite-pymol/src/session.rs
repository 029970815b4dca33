//! Session lifecycle
//!
//! The engine is process-wide mutable state with exactly one logical live
//! instance per process. The session owns the shared engine handle, applies
//! the parameters the bridge depends on, and enforces the one-instance rule
//! with a fail-fast guard; nothing here locks, the engine is assumed
//! single-threaded from the caller's perspective.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::engine::EngineLike;
use crate::error::{BridgeError, BridgeResult};

/// Whether a session is currently live in this process
static SESSION_LIVE: AtomicBool = AtomicBool::new(false);

/// Check whether a session is already running
pub fn is_launched() -> bool {
    SESSION_LIVE.load(Ordering::Acquire)
}

/// A live engine session
///
/// Holds the shared engine handle that wrapped objects clone. Dropping the
/// session releases the process-wide guard; the engine itself is dropped
/// with the last handle.
pub struct PymolSession<E: EngineLike> {
    engine: Arc<RwLock<E>>,
}

impl<E: EngineLike> PymolSession<E> {
    /// Launch a session over the given engine
    ///
    /// Fails with a duplicate-instance error, before any engine call, if a
    /// session is already live in this process. On success the parameters
    /// the bridge requires are applied (atom order must be retained, or
    /// compiled index selections would not line up).
    pub fn launch(engine: E) -> BridgeResult<Self> {
        if SESSION_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BridgeError::DuplicateSession);
        }
        let session = PymolSession {
            engine: Arc::new(RwLock::new(engine)),
        };
        session.setup_parameters()?;
        Ok(session)
    }

    /// Delete all objects and re-apply the bridge parameters
    pub fn reset(&self) -> BridgeResult<()> {
        self.engine.write().reinitialize()?;
        self.setup_parameters()
    }

    /// Apply the engine parameters the bridge depends on
    fn setup_parameters(&self) -> BridgeResult<()> {
        self.engine
            .write()
            .set_parameter("retain_order", "1")
            .map_err(Into::into)
    }

    /// Clone the shared engine handle
    pub fn engine(&self) -> Arc<RwLock<E>> {
        self.engine.clone()
    }
}

impl<E: EngineLike> Drop for PymolSession<E> {
    fn drop(&mut self) {
        SESSION_LIVE.store(false, Ordering::Release);
    }
}
