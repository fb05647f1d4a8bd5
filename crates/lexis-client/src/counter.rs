use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Remote call counter owned by a client.
///
/// Clones share the same count. Reading is only allowed when counting was
/// switched on, which keeps the instrumentation out of production reads.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    enabled: bool,
    calls: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("call counting is disabled; enable `count_calls` to read it")]
pub struct CounterDisabled;

impl CallCounter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn enabled() -> Self {
        Self::new(true)
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&self) {
        if self.enabled {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn calls(&self) -> Result<usize, CounterDisabled> {
        if !self.enabled {
            return Err(CounterDisabled);
        }

        Ok(self.calls.load(Ordering::SeqCst))
    }
}
