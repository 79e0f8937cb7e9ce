mod args;
mod convert;

pub use args::{Cli, CliCommand, ConvertCliArgs};
pub use convert::handle_convert_command;
