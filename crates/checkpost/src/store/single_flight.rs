//! At most one in-flight run of an async operation.

use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};

type SharedRun = Shared<BoxFuture<'static, ()>>;

/// A nullable handle to the current run of an operation.
///
/// Callers that arrive while a run is in flight await the same future instead
/// of starting another. The run clears the handle when it finishes, so the
/// next call starts fresh.
#[derive(Clone, Default)]
pub(crate) struct SingleFlight {
    current: Arc<Mutex<Option<SharedRun>>>,
}

impl SingleFlight {
    /// Returns the in-flight run, or starts `operation` if there is none.
    pub(crate) fn run<F>(&self, operation: F) -> SharedRun
    where
        F: FnOnce() -> BoxFuture<'static, ()>,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(run) = current.as_ref() {
            return run.clone();
        }

        let slot = Arc::clone(&self.current);
        let work = operation();
        let run = async move {
            work.await;
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        }
        .boxed()
        .shared();

        *current = Some(run.clone());
        run
    }

    pub(crate) fn is_running(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
