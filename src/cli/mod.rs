//! CLI module for bootshare
//!
//! Provides command-line interface for:
//! - save: run one boot session against an image file
//! - dump: list committed entries
//! - info: decode the bootloader information

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{dump, info, run, run_command, save};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
