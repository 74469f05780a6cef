//! CLI command implementations
//!
//! Each command builds one JSON value; `run_command` prints it.
//! - `save` is one boot session: it clears the image and writes the boot info
//! - `dump` and `info` only read, through the header-bounded reader

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use crate::backing::{BackingStore, FileStore};
use crate::boot_info::{save_shared_data, BootInfo};
use crate::observability::Logger;
use crate::shared_data::{SharedArea, SharedAreaReader};

use super::args::Command;
use super::config::Config;
use super::errors::CliResult;
use super::io::{write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
///
/// A failure is also reported on stdout as an error response before it is
/// returned.
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Save { config } => save(&config),
        Command::Dump { image } => dump(&image),
        Command::Info { image } => info(&image),
    };

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Record the configured boot info into a fresh area image.
pub fn save(config_path: &Path) -> CliResult<Value> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let image_path = config.resolved_image_path(config_path);
    let store = FileStore::create(&image_path, config.capacity_bytes)?;
    let mut area = SharedArea::new(store);

    let boot_info = config.boot_info();
    save_shared_data(&mut area, &boot_info)?;

    Ok(json!({
        "image": image_path.display().to_string(),
        "capacity": config.capacity_bytes,
        "total_length": area.cursor(),
        "boot_info": serde_json::to_value(boot_info)?,
    }))
}

/// List every committed entry of an area image.
pub fn dump(image_path: &Path) -> CliResult<Value> {
    let store = FileStore::open(image_path)?;
    let capacity = store.capacity();
    let mut reader = SharedAreaReader::open(store)?;

    let entries: Vec<Value> = reader
        .read_all()?
        .into_iter()
        .map(|entry| {
            json!({
                "major": entry.major(),
                "minor": entry.minor(),
                "offset": entry.offset,
                "length": entry.payload.len(),
                "payload": STANDARD.encode(&entry.payload),
            })
        })
        .collect();

    Ok(json!({
        "capacity": capacity,
        "total_length": reader.total_length(),
        "entries": entries,
    }))
}

/// Decode the boot info of an area image.
pub fn info(image_path: &Path) -> CliResult<Value> {
    let store = FileStore::open(image_path)?;
    let mut reader = SharedAreaReader::open(store)?;
    let boot_info = BootInfo::load(&mut reader)?;
    Ok(serde_json::to_value(boot_info)?)
}
