//! Linux GPIO character device backend.

use crate::{Backend, DEFAULT_CHIP, Error, Level, Result};
use gpiocdev::Request;
use gpiocdev::line::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Consumer label attached to every line request.
pub const CONSUMER: &str = "blinkenpin";

/// Lines requested from one GPIO chip, one request per line.
pub struct Cdev {
    chip: PathBuf,
    requests: BTreeMap<u32, Request>,
}

impl Cdev {
    pub fn new(chip: impl AsRef<Path>) -> Self {
        Self {
            chip: chip.as_ref().to_path_buf(),
            requests: BTreeMap::new(),
        }
    }
}

impl Default for Cdev {
    fn default() -> Self {
        Self::new(DEFAULT_CHIP)
    }
}

fn value(level: Level) -> Value {
    match level {
        Level::Low => Value::Inactive,
        Level::High => Value::Active,
    }
}

impl Backend for Cdev {
    fn configure_output(&mut self, line: u32, initial: Level) -> Result<()> {
        if self.requests.contains_key(&line) {
            return Ok(());
        }

        let request = Request::builder()
            .on_chip(self.chip.as_path())
            .with_consumer(CONSUMER)
            .with_line(line)
            .as_output(value(initial))
            .request()?;

        tracing::debug!(chip = %self.chip.display(), line, "line requested");
        self.requests.insert(line, request);
        Ok(())
    }

    fn write(&mut self, line: u32, level: Level) -> Result<()> {
        let request = self.requests.get(&line).ok_or(Error::LineNotConfigured(line))?;
        request.set_value(line, value(level))?;
        Ok(())
    }
}
