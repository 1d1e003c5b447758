//! Delays a callback until input has been idle for a while.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::SuggestionConfig;

/// Calls `callback` with the last value passed to [`trigger`](Self::trigger)
/// once no new value arrived for `delay`.
///
/// Dropping the debouncer cancels the pending call.
pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    pub fn from_config(
        config: &SuggestionConfig,
        callback: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self::new(config.debounce(), callback)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending call with one for `value`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn trigger(&mut self, value: T) {
        self.cancel();
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            (*callback)(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
