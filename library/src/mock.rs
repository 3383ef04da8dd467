//! In-memory backend that records every write.

use crate::{Backend, Error, Level, Result};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// A single recorded write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Write {
    pub line: u32,
    pub level: Level,
    pub at: Instant,
}

/// Shared, clonable view of the writes made through a [`Mock`].
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    writes: Arc<Mutex<Vec<Write>>>,
}

impl Recorder {
    fn lock(&self) -> MutexGuard<'_, Vec<Write>> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, write: Write) {
        self.lock().push(write);
    }

    pub fn writes(&self) -> Vec<Write> {
        self.lock().clone()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.lock().iter().map(|w| w.level).collect()
    }

    pub fn lines(&self) -> Vec<u32> {
        self.lock().iter().map(|w| w.line).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Mock {
    configured: BTreeSet<u32>,
    recorder: Recorder,
    attempts: usize,
    fail_at: Option<usize>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the write that follows the first `writes` ones. Later writes
    /// succeed again.
    pub fn fail_after(mut self, writes: usize) -> Self {
        self.fail_at = Some(writes);
        self
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    pub fn is_configured(&self, line: u32) -> bool {
        self.configured.contains(&line)
    }
}

impl Backend for Mock {
    fn configure_output(&mut self, line: u32, initial: Level) -> Result<()> {
        if self.configured.insert(line) {
            tracing::info!(line, %initial, "mock line configured");
        }
        Ok(())
    }

    fn write(&mut self, line: u32, level: Level) -> Result<()> {
        if !self.is_configured(line) {
            return Err(Error::LineNotConfigured(line));
        }

        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(Error::Injected(line));
        }

        tracing::info!(line, %level, "mock write");
        self.recorder.push(Write {
            line,
            level,
            at: Instant::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_needs_configured_line() {
        let mut mock = Mock::new();
        assert!(matches!(mock.write(3, Level::High), Err(Error::LineNotConfigured(3))));
    }

    #[test]
    fn recorder_sees_writes_after_move() {
        let mut mock = Mock::new();
        let recorder = mock.recorder();

        mock.configure_output(7, Level::Low).unwrap();
        mock.write(7, Level::High).unwrap();
        drop(mock);

        assert_eq!(recorder.levels(), vec![Level::High]);
        assert_eq!(recorder.lines(), vec![7]);
    }

    #[test]
    fn fail_after_injects_errors() {
        let mut mock = Mock::new().fail_after(1);
        mock.configure_output(7, Level::Low).unwrap();

        mock.write(7, Level::High).unwrap();
        assert!(matches!(mock.write(7, Level::Low), Err(Error::Injected(7))));
        mock.write(7, Level::Low).unwrap();
        assert_eq!(mock.recorder().levels(), vec![Level::High, Level::Low]);
    }
}
