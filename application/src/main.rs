use blinkenpin_tool::Cli;
use clap::Parser;
use color_eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    Cli::parse().run()
}
