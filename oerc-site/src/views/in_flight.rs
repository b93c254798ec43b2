//! Cancellation-safe in-flight markers
//!
//! A flow marks its view busy, releases the lock and awaits an external call.
//! If the flow's future is dropped (client disconnect) or panics before it
//! completes, [`InFlight`] runs the reset on drop so the view never stays busy.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::debug;

type Reset<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Armed until [`InFlight::disarm`]; resets the view when dropped armed
pub struct InFlight<T: Send + 'static> {
    view: Arc<Mutex<T>>,
    reset: Option<Reset<T>>,
}

impl<T: Send + 'static> InFlight<T> {
    pub fn new(view: &Arc<Mutex<T>>, reset: impl FnOnce(&mut T) + Send + 'static) -> Self {
        Self {
            view: Arc::clone(view),
            reset: Some(Box::new(reset)),
        }
    }

    /// The flow finished normally and cleared its own state
    ///
    /// Call while holding the view lock, before releasing it.
    pub fn disarm(mut self) {
        self.reset = None;
    }
}

impl<T: Send + 'static> Drop for InFlight<T> {
    fn drop(&mut self) {
        let Some(reset) = self.reset.take() else {
            return;
        };
        debug!("Flow abandoned before completion, resetting view");
        match self.view.try_lock() {
            Ok(mut view) => reset(&mut view),
            Err(_) => {
                // Lock briefly held elsewhere; finish the reset on the runtime
                let view = Arc::clone(&self.view);
                if let Ok(handle) = Handle::try_current() {
                    handle.spawn(async move {
                        reset(&mut *view.lock().await);
                    });
                }
            }
        }
    }
}
