use crate::{Error, Level, Numbering, Result, line_for};
use embedded_hal::digital;
use std::collections::BTreeMap;

/// Hardware access used by [`Gpio`].
///
/// Lines are SoC line offsets; channel numbering is resolved before a backend
/// ever sees a request.
pub trait Backend {
    /// Claim `line` as an output driven to `initial`. Claiming a line twice
    /// must succeed and keep the existing claim.
    fn configure_output(&mut self, line: u32, initial: Level) -> Result<()>;

    /// Drive a previously configured line.
    fn write(&mut self, line: u32, level: Level) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn configure_output(&mut self, line: u32, initial: Level) -> Result<()> {
        (**self).configure_output(line, initial)
    }

    fn write(&mut self, line: u32, level: Level) -> Result<()> {
        (**self).write(line, level)
    }
}

/// Pin-numbering aware front-end over a [`Backend`].
pub struct Gpio<B> {
    backend: B,
    numbering: Option<Numbering>,
    warnings: bool,
    outputs: BTreeMap<u8, u32>,
}

impl<B: Backend> Gpio<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            numbering: None,
            warnings: true,
            outputs: BTreeMap::new(),
        }
    }

    /// Select the numbering scheme used for channel arguments.
    pub fn set_mode(&mut self, numbering: Numbering) -> Result<()> {
        match self.numbering {
            None => {
                tracing::debug!(%numbering, "numbering mode selected");
                self.numbering = Some(numbering);
                Ok(())
            }
            Some(current) if current == numbering => Ok(()),
            Some(current) => Err(Error::ModeConflict {
                current,
                requested: numbering,
            }),
        }
    }

    pub fn mode(&self) -> Option<Numbering> {
        self.numbering
    }

    /// Enable or disable warnings about channels that are already in use.
    pub fn set_warnings(&mut self, enabled: bool) {
        self.warnings = enabled;
    }

    /// Configure `channel` as an output, initially low.
    ///
    /// Setting up a channel again is allowed; it only warns, and only when
    /// warnings are enabled.
    pub fn setup_output(&mut self, channel: u8) -> Result<()> {
        let numbering = self.numbering.ok_or(Error::ModeNotSet)?;
        let line =
            line_for(numbering, channel).ok_or(Error::InvalidChannel { channel, numbering })?;

        if self.outputs.contains_key(&channel) && self.warnings {
            tracing::warn!(channel, line, "channel already in use, continuing anyway");
        }

        self.backend.configure_output(line, Level::Low)?;
        self.outputs.insert(channel, line);

        tracing::debug!(channel, line, %numbering, "configured as output");
        Ok(())
    }

    pub fn is_output(&self, channel: u8) -> bool {
        self.outputs.contains_key(&channel)
    }

    /// Drive `channel` to `level`.
    pub fn output(&mut self, channel: u8, level: Level) -> Result<()> {
        let line = *self.outputs.get(&channel).ok_or(Error::NotAnOutput(channel))?;

        tracing::trace!(channel, line, %level, "write");
        self.backend.write(line, level)
    }

    /// Borrow a configured channel as an embedded-hal output pin.
    pub fn pin(&mut self, channel: u8) -> Result<Pin<'_, B>> {
        if !self.is_output(channel) {
            return Err(Error::NotAnOutput(channel));
        }

        Ok(Pin { channel, gpio: self })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// A configured output channel.
pub struct Pin<'a, B> {
    channel: u8,
    gpio: &'a mut Gpio<B>,
}

impl<B: Backend> Pin<'_, B> {
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn write(&mut self, level: Level) -> Result<()> {
        self.gpio.output(self.channel, level)
    }
}

impl digital::Error for Error {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl<B> digital::ErrorType for Pin<'_, B> {
    type Error = Error;
}

impl<B: Backend> digital::OutputPin for Pin<'_, B> {
    fn set_low(&mut self) -> std::result::Result<(), Self::Error> {
        self.write(Level::Low)
    }

    fn set_high(&mut self) -> std::result::Result<(), Self::Error> {
        self.write(Level::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::Mock;
    use embedded_hal::digital::OutputPin;

    fn board() -> Gpio<Mock> {
        let mut gpio = Gpio::new(Mock::new());
        gpio.set_mode(Numbering::Board).unwrap();
        gpio
    }

    #[test]
    fn setup_requires_mode() {
        let mut gpio = Gpio::new(Mock::new());
        assert!(matches!(gpio.setup_output(12), Err(Error::ModeNotSet)));
    }

    #[test]
    fn setup_twice_without_warnings_is_ok() {
        let mut gpio = board();
        gpio.set_warnings(false);

        gpio.setup_output(12).unwrap();
        gpio.setup_output(12).unwrap();

        assert!(gpio.is_output(12));
        assert!(gpio.backend().is_configured(18));
    }

    #[test]
    fn setup_twice_with_warnings_still_succeeds() {
        let mut gpio = board();

        gpio.setup_output(12).unwrap();
        gpio.setup_output(12).unwrap();

        assert!(gpio.is_output(12));
    }

    #[test]
    fn setup_rejects_power_pins() {
        let mut gpio = board();

        match gpio.setup_output(6) {
            Err(Error::InvalidChannel { channel, numbering }) => {
                assert_eq!(channel, 6);
                assert_eq!(numbering, Numbering::Board);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bcm_mode_addresses_lines_directly() {
        let mut gpio = Gpio::new(Mock::new());
        gpio.set_mode(Numbering::Bcm).unwrap();
        gpio.setup_output(18).unwrap();
        gpio.output(18, Level::High).unwrap();

        let writes = gpio.backend().recorder().writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].line, 18);
    }

    #[test]
    fn mode_cannot_change() {
        let mut gpio = board();

        gpio.set_mode(Numbering::Board).unwrap();
        assert!(matches!(
            gpio.set_mode(Numbering::Bcm),
            Err(Error::ModeConflict {
                current: Numbering::Board,
                requested: Numbering::Bcm
            })
        ));
        assert_eq!(gpio.mode(), Some(Numbering::Board));
    }

    #[test]
    fn output_requires_setup() {
        let mut gpio = board();
        assert!(matches!(gpio.output(12, Level::High), Err(Error::NotAnOutput(12))));
        assert!(gpio.backend().recorder().writes().is_empty());
    }

    #[test]
    fn output_reaches_backend_line() {
        let mut gpio = board();
        gpio.setup_output(12).unwrap();

        gpio.output(12, Level::High).unwrap();
        gpio.output(12, Level::Low).unwrap();

        assert_eq!(gpio.backend().recorder().lines(), vec![18, 18]);
        assert_eq!(gpio.backend().recorder().levels(), vec![Level::High, Level::Low]);
    }

    #[test]
    fn pin_implements_output_pin() {
        let mut gpio = board();
        gpio.setup_output(12).unwrap();

        let mut pin = gpio.pin(12).unwrap();
        assert_eq!(pin.channel(), 12);
        pin.set_high().unwrap();
        pin.set_low().unwrap();

        assert_eq!(gpio.backend().recorder().levels(), vec![Level::High, Level::Low]);
    }

    #[test]
    fn pin_requires_setup() {
        let mut gpio = board();
        assert!(gpio.pin(12).is_err());
    }
}
