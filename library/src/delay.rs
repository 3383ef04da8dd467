use crate::{Error, Result};
use signal_hook::SigId;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity at which a pending interrupt is noticed.
const SLICE: Duration = Duration::from_millis(10);

/// Termination requests that interrupt a sleep.
const SIGNALS: [i32; 2] = [SIGINT, SIGTERM];

/// How a sleep ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wake {
    Elapsed,
    Interrupted,
}

/// A blocking wait that may be cut short.
pub trait Sleep {
    fn sleep(&mut self, period: Duration) -> Wake;
}

/// Sleep that ends early once a termination request has been received.
///
/// Built with [`InterruptibleDelay::new`], SIGINT and SIGTERM raise the
/// shared flag instead of killing the process. Once raised the flag stays
/// raised, so every later sleep returns [`Wake::Interrupted`] immediately.
pub struct InterruptibleDelay {
    flag: Arc<AtomicBool>,
    handlers: Vec<SigId>,
}

impl InterruptibleDelay {
    /// Install SIGINT and SIGTERM handlers feeding a fresh flag.
    pub fn new() -> Result<Self> {
        let mut delay = Self::from_flag(Arc::new(AtomicBool::new(false)));

        for signal in SIGNALS {
            let id = signal_hook::flag::register(signal, delay.flag.clone())
                .map_err(Error::Signal)?;
            delay.handlers.push(id);
        }

        Ok(delay)
    }

    /// Wait on an existing flag; no signal handlers are installed.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            flag,
            handlers: Vec::new(),
        }
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }

    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Sleep for InterruptibleDelay {
    fn sleep(&mut self, period: Duration) -> Wake {
        let deadline = Instant::now() + period;

        loop {
            if self.is_interrupted() {
                return Wake::Interrupted;
            }

            let now = Instant::now();
            if now >= deadline {
                return Wake::Elapsed;
            }

            thread::sleep(SLICE.min(deadline - now));
        }
    }
}

impl Drop for InterruptibleDelay {
    fn drop(&mut self) {
        if self.handlers.is_empty() {
            return;
        }

        for id in self.handlers.drain(..) {
            signal_hook::low_level::unregister(id);
        }

        // A second request after the first one terminates right away.
        for signal in SIGNALS {
            let flag = self.flag.clone();
            if let Err(e) = signal_hook::flag::register_conditional_default(signal, flag) {
                tracing::debug!(signal, "unable to restore default signal action: {e}");
            }
        }
    }
}
