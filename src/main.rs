use anyhow::Result;
use clap::Parser;
use kansuji::cli::{handle_convert_command, Cli, CliCommand};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        CliCommand::Version => {
            println!("kansuji {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliCommand::Convert(args) => handle_convert_command(args),
    }
}
