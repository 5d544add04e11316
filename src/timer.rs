/// Single-slot delayed task
///
/// Arming the slot aborts whatever was pending in it, and dropping the slot
/// aborts the pending task, so a session never leaves timers running after
/// teardown.
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
pub struct TimerSlot {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Run `task` after `delay`, superseding any pending task in this slot
    ///
    /// Returns `false` without scheduling anything when called outside a
    /// Tokio runtime; the previous task is still cancelled.
    pub fn arm<F>(&mut self, delay: Duration, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            debug!("No runtime for {} timer, not scheduling", self.name);
            return false;
        };

        debug!("Arming {} timer for {:?}", self.name, delay);
        self.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
        true
    }

    /// Abort the pending task, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending {} timer", self.name);
            }
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
