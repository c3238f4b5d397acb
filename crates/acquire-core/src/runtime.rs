//! Process-wide tokio runtime shared by backends that need real async I/O.
//!
//! The runtime is built by the first backend that asks for it and shut down
//! when the last [`SharedRuntime`] guard is dropped, so its lifetime nests
//! inside the lifetimes of the handles using it.

use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

static SHARED: Lazy<Mutex<Weak<Runtime>>> = Lazy::new(|| Mutex::new(Weak::new()));

/// Reference-counted guard over the shared current-thread runtime.
///
/// The runtime has no worker threads: spawned tasks only make progress while
/// some caller is inside [`SharedRuntime::block_on`].
#[derive(Clone)]
pub struct SharedRuntime(Arc<Runtime>);

impl SharedRuntime {
    /// Join the shared runtime, building it if no one holds it.
    pub fn acquire() -> io::Result<Self> {
        let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(runtime) = slot.upgrade() {
            return Ok(Self(runtime));
        }

        let runtime = Arc::new(Builder::new_current_thread().enable_all().build()?);
        *slot = Arc::downgrade(&runtime);
        debug!("shared runtime started");
        Ok(Self(runtime))
    }

    /// Number of live guards across the process.
    pub fn users() -> usize {
        SHARED
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .strong_count()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Drop for SharedRuntime {
    fn drop(&mut self) {
        if Arc::strong_count(&self.0) == 1 {
            debug!("shared runtime shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_share_one_runtime_and_tear_down_with_the_last() {
        let first = SharedRuntime::acquire().unwrap();
        let second = SharedRuntime::acquire().unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(SharedRuntime::users(), 2);

        assert_eq!(first.block_on(async { 40 + 2 }), 42);

        drop(first);
        assert_eq!(SharedRuntime::users(), 1);
        drop(second);
        assert_eq!(SharedRuntime::users(), 0);

        let third = SharedRuntime::acquire().unwrap();
        assert_eq!(SharedRuntime::users(), 1);
        drop(third);
    }
}
