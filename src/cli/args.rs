//! CLI argument definitions using clap
//!
//! Commands:
//! - bootshare save --config <path>
//! - bootshare dump --image <path>
//! - bootshare info --image <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bootshare - boot information handoff through a retained TLV area
#[derive(Parser, Debug)]
#[command(name = "bootshare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one boot session: clear the image and record the boot info
    Save {
        /// Path to configuration file
        #[arg(long, default_value = "./bootshare.json")]
        config: PathBuf,
    },

    /// Print every committed entry of an area image
    Dump {
        /// Path to the area image file
        #[arg(long)]
        image: PathBuf,
    },

    /// Decode the bootloader information of an area image
    Info {
        /// Path to the area image file
        #[arg(long)]
        image: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
