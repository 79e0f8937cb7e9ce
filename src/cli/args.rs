use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kansuji")]
#[command(about = "Kanji numeral normalization for transcription lattices", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Normalize recognizer exports into start/speaker/content tables
    Convert(ConvertCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct ConvertCliArgs {
    /// Recognizer export JSON file, or a folder of them
    pub path: PathBuf,

    /// Convert numerals even inside words with disallowed characters
    #[arg(long)]
    pub force: bool,

    /// Additional exclusion word for this run (repeatable)
    #[arg(short, long = "exclude", value_name = "WORD")]
    pub exclude: Vec<String>,

    /// Where to write the output tables (default: next to the input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
