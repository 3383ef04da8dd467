use blinkenpin::{
    Backend, DEFAULT_CHIP, Gpio, InterruptibleDelay, Level, Mock, Numbering, PinController,
};
use clap::{ArgAction, Parser, Subcommand};
use color_eyre::Result;
use std::num::ParseIntError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "blinkenpin",
    about = "Blink board pin 12 until interrupted, leaving it low on exit",
    version
)]
pub struct Cli {
    /// GPIO character device
    #[arg(long, global = true, default_value = DEFAULT_CHIP)]
    chip: PathBuf,

    /// Record pin writes in memory instead of driving hardware
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log more (repeat for trace output)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Toggle board pin 12 every half second until interrupted (default)
    Blink,

    /// Drive one channel to a level and exit
    Set {
        /// Channel to drive
        #[arg(value_parser(parse_channel))]
        channel: u8,

        /// Drive the channel low instead of high
        #[arg(long)]
        low: bool,

        /// Treat CHANNEL as a SoC line instead of a board pin
        #[arg(long)]
        bcm: bool,
    },
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        self.init_logging();

        match &self.command {
            None | Some(Commands::Blink) => self.blink(),
            Some(Commands::Set { channel, low, bcm }) => {
                let numbering = if *bcm { Numbering::Bcm } else { Numbering::Board };
                self.set(*channel, Level::from(!*low), numbering)
            }
        }
    }

    fn init_logging(&self) {
        let level = match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let installed = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .try_init();

        if let Err(e) = installed {
            tracing::debug!("keeping existing subscriber: {e}");
        }
    }

    fn backend(&self) -> Result<Box<dyn Backend>> {
        if self.dry_run {
            return Ok(Box::new(Mock::new()));
        }

        #[cfg(target_os = "linux")]
        {
            Ok(Box::new(blinkenpin::Cdev::new(&self.chip)))
        }

        #[cfg(not(target_os = "linux"))]
        {
            color_eyre::eyre::bail!(
                "{} is unavailable: GPIO character devices need Linux, try --dry-run",
                self.chip.display()
            )
        }
    }

    fn blink(&self) -> Result<()> {
        let mut delay = InterruptibleDelay::new()?;
        let mut controller = PinController::new(self.backend()?);

        let writes = controller.run(&mut delay)?;
        tracing::info!(writes, "stopped");

        Ok(())
    }

    fn set(&self, channel: u8, level: Level, numbering: Numbering) -> Result<()> {
        let mut gpio = Gpio::new(self.backend()?);

        gpio.set_mode(numbering)?;
        gpio.setup_output(channel)?;
        gpio.output(channel, level)?;

        tracing::info!(channel, %level, %numbering, "channel driven");
        Ok(())
    }
}

fn parse_channel(s: &str) -> Result<u8, ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x") {
        u8::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_blinks_on_default_chip() {
        let cli = Cli::try_parse_from(["blinkenpin"]).unwrap();

        assert_eq!(cli.command, None);
        assert_eq!(cli.chip, PathBuf::from("/dev/gpiochip0"));
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["blinkenpin", "blink", "--chip", "/dev/gpiochip4", "-vv"])
                .unwrap();

        assert_eq!(cli.command, Some(Commands::Blink));
        assert_eq!(cli.chip, PathBuf::from("/dev/gpiochip4"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn set_parses_channel() {
        let cli = Cli::try_parse_from(["blinkenpin", "set", "0x12", "--low", "--bcm"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Set {
                channel: 18,
                low: true,
                bcm: true
            })
        );
    }

    #[test]
    fn set_rejects_garbage_channel() {
        assert!(Cli::try_parse_from(["blinkenpin", "set", "twelve"]).is_err());
        assert!(Cli::try_parse_from(["blinkenpin", "set", "300"]).is_err());
    }

    #[test]
    fn dry_run_set_drives_channel() {
        let cli = Cli::try_parse_from(["blinkenpin", "--dry-run", "set", "12"]).unwrap();
        cli.run().unwrap();
    }

    #[test]
    fn dry_run_set_rejects_invalid_channels() {
        // Board pin 0 does not exist, board pin 6 is ground.
        for channel in ["0", "6"] {
            let cli = Cli::try_parse_from(["blinkenpin", "--dry-run", "set", channel]).unwrap();
            assert!(cli.run().is_err(), "channel {channel}");
        }
    }

    #[test]
    fn logging_setup_tolerates_an_installed_subscriber() {
        for args in [["blinkenpin", "-v"], ["blinkenpin", "-vv"]] {
            Cli::try_parse_from(args).unwrap().init_logging();
        }
    }

    #[test]
    fn parse_channel_accepts_decimal_and_hex() {
        assert_eq!(parse_channel("12"), Ok(12));
        assert_eq!(parse_channel("0x0c"), Ok(12));
        assert!(parse_channel("0b1100").is_err());
    }
}
