use crate::{Backend, Blinker, ExitGuard, Gpio, Level, Numbering, Result, Sleep};
use std::time::Duration;

/// Board pin toggled by the controller.
pub const BLINK_PIN: u8 = 12;

/// Time between level changes.
pub const HALF_PERIOD: Duration = Duration::from_millis(500);

/// Owns the GPIO used to blink [`BLINK_PIN`].
pub struct PinController<B: Backend> {
    gpio: Gpio<B>,
}

impl<B: Backend> PinController<B> {
    pub fn new(backend: B) -> Self {
        Self { gpio: Gpio::new(backend) }
    }

    /// Select board numbering, silence channel-in-use warnings and configure
    /// [`BLINK_PIN`] as an output.
    ///
    /// The returned guard drives the pin low when dropped. It is armed as
    /// soon as the pin is configured, so any later failure still leaves the
    /// pin low.
    pub fn initialize(&mut self) -> Result<ExitGuard<'_, B>> {
        self.gpio.set_mode(Numbering::Board)?;
        self.gpio.set_warnings(false);
        self.gpio.setup_output(BLINK_PIN)?;

        Ok(ExitGuard::new(&mut self.gpio, BLINK_PIN))
    }

    pub fn write(&mut self, pin: u8, level: Level) -> Result<()> {
        self.gpio.output(pin, level)
    }

    /// Blink until `delay` is interrupted, then drive the pin low.
    pub fn run<S: Sleep>(&mut self, delay: &mut S) -> Result<u64> {
        let mut guard = self.initialize()?;

        tracing::info!(pin = BLINK_PIN, period = ?(HALF_PERIOD * 2), "blinking");
        let writes = Blinker::new(BLINK_PIN, HALF_PERIOD).run(&mut *guard, delay)?;
        guard.release()?;

        Ok(writes)
    }

    pub fn gpio(&self) -> &Gpio<B> {
        &self.gpio
    }
}
