use crate::{Backend, Gpio, Level, Result, Sleep, Wake};
use std::time::Duration;

/// Two-state toggle loop for a single output channel.
///
/// The channel starts low. Every `half_period` the level flips and is
/// written out; an interrupted sleep ends the loop before the next write.
#[derive(Debug)]
pub struct Blinker {
    channel: u8,
    half_period: Duration,
    level: Level,
}

impl Blinker {
    pub fn new(channel: u8, half_period: Duration) -> Self {
        Self {
            channel,
            half_period,
            level: Level::Low,
        }
    }

    /// Level most recently written by the loop.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Toggle until `delay` reports an interrupt. Returns the number of
    /// writes made.
    pub fn run<B: Backend, S: Sleep>(&mut self, gpio: &mut Gpio<B>, delay: &mut S) -> Result<u64> {
        let mut writes = 0;

        loop {
            if delay.sleep(self.half_period) == Wake::Interrupted {
                tracing::info!(channel = self.channel, writes, "interrupted, leaving blink loop");
                return Ok(writes);
            }

            self.level = !self.level;
            gpio.output(self.channel, self.level)?;
            writes += 1;

            tracing::debug!(channel = self.channel, level = %self.level, "toggled");
        }
    }
}
