//! Toggle a header pin until interrupted, leaving it low on the way out.
//!
//! The [`PinController`] configures board pin 12 as an output, flips it every
//! half second and drives it low when its [`ExitGuard`] goes out of scope.
//! Hardware access goes through a [`Backend`]: [`Cdev`] talks to the Linux
//! GPIO character device, [`Mock`] records writes in memory.

pub use blinkenpin_internal::{Level, Numbering, line_for};
use thiserror::Error;

pub mod blink;
#[cfg(target_os = "linux")]
pub mod cdev;
pub mod controller;
pub mod delay;
pub mod gpio;
pub mod guard;
pub mod mock;

pub use blink::Blinker;
#[cfg(target_os = "linux")]
pub use cdev::Cdev;
pub use controller::{BLINK_PIN, HALF_PERIOD, PinController};
pub use delay::{InterruptibleDelay, Sleep, Wake};
pub use gpio::{Backend, Gpio, Pin};
pub use guard::ExitGuard;
pub use mock::{Mock, Recorder, Write};

/// GPIO chip used when none is given.
pub const DEFAULT_CHIP: &str = "/dev/gpiochip0";

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(target_os = "linux")]
    #[error("gpio character device error: {0}")]
    Cdev(#[from] gpiocdev::Error),
    #[error("unable to register signal handler: {0}")]
    Signal(#[source] std::io::Error),
    #[error("pin numbering mode has not been set")]
    ModeNotSet,
    #[error("pin numbering already set to {current}, refusing to switch to {requested}")]
    ModeConflict { current: Numbering, requested: Numbering },
    #[error("channel {channel} is not a GPIO in {numbering} numbering")]
    InvalidChannel { channel: u8, numbering: Numbering },
    #[error("channel {0} has not been set up as an output")]
    NotAnOutput(u8),
    #[error("line {0} is not configured on the backend")]
    LineNotConfigured(u32),
    #[error("injected write failure on line {0}")]
    Injected(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
