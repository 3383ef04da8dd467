use crate::{Backend, Error, Gpio, Level, Result};
use std::ops::{Deref, DerefMut};

/// Drives an output channel low when it leaves scope.
///
/// The low write happens exactly once, either through [`ExitGuard::release`],
/// which reports failures, or on drop, which can only log them. Drop covers
/// early returns through `?` and panics alike.
pub struct ExitGuard<'a, B: Backend> {
    gpio: &'a mut Gpio<B>,
    channel: u8,
    armed: bool,
}

impl<'a, B: Backend> ExitGuard<'a, B> {
    pub(crate) fn new(gpio: &'a mut Gpio<B>, channel: u8) -> Self {
        tracing::debug!(channel, "exit guard armed");
        Self {
            gpio,
            channel,
            armed: true,
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Drive the channel low now and disarm.
    pub fn release(mut self) -> Result<()> {
        self.drive_low()
    }

    fn drive_low(&mut self) -> Result<()> {
        self.armed = false;
        self.gpio.output(self.channel, Level::Low)?;
        tracing::info!(channel = self.channel, "pin driven low");
        Ok(())
    }
}

impl<B: Backend> Gpio<B> {
    /// Arm an [`ExitGuard`] for a channel already set up as an output.
    pub fn guard(&mut self, channel: u8) -> Result<ExitGuard<'_, B>> {
        if !self.is_output(channel) {
            return Err(Error::NotAnOutput(channel));
        }

        Ok(ExitGuard::new(self, channel))
    }
}

impl<B: Backend> Deref for ExitGuard<'_, B> {
    type Target = Gpio<B>;

    fn deref(&self) -> &Gpio<B> {
        self.gpio
    }
}

impl<B: Backend> DerefMut for ExitGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut Gpio<B> {
        self.gpio
    }
}

impl<B: Backend> Drop for ExitGuard<'_, B> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        if let Err(e) = self.drive_low() {
            tracing::error!(channel = self.channel, "unable to drive pin low: {e}");
        }
    }
}
