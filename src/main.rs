use aeon2md::{CliArgs, ConvertConfig, LoggingConfig, init_logging, run};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::from_env())?;

    let cli = CliArgs::parse();
    let config = ConvertConfig::from_args(cli)?;

    run(&config)
}
