//! Configuration file for the `save` command
//!
//! The facts a bootloader would take from its build configuration (mode,
//! signature type, recovery channel, version) come from a JSON file here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::boot_info::{BootInfo, BootMode, ImageVersion, RecoveryMode, SignatureType};
use crate::observability::Severity;
use crate::shared_data::SHARED_MEMORY_MIN_SIZE;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Area image file (required)
    pub image_path: PathBuf,

    /// Region size in bytes (optional, default 256)
    #[serde(default = "default_capacity")]
    pub capacity_bytes: usize,

    pub mode: BootMode,

    pub signature_type: SignatureType,

    /// Recovery channel (optional, default "none")
    #[serde(default = "default_recovery")]
    pub recovery: RecoveryMode,

    /// Slot the image is booted from (optional, default 0)
    #[serde(default)]
    pub running_slot: u32,

    pub bootloader_version: ImageVersion,

    /// Largest application image in bytes (optional, default 0)
    #[serde(default)]
    pub max_application_size: u32,

    /// Lowest logged severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_capacity() -> usize {
    256
}
fn default_recovery() -> RecoveryMode {
    RecoveryMode::None
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.capacity_bytes <= SHARED_MEMORY_MIN_SIZE {
            return Err(CliError::config_error(format!(
                "capacity_bytes must be > {}",
                SHARED_MEMORY_MIN_SIZE
            )));
        }

        // total_length is a u16, so nothing past that offset is addressable
        if self.capacity_bytes > u16::MAX as usize {
            return Err(CliError::config_error(format!(
                "capacity_bytes must be <= {}",
                u16::MAX
            )));
        }

        if self.image_path.as_os_str().is_empty() {
            return Err(CliError::config_error("image_path must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be trace, info, warn or error.",
                self.log_level
            ))
        })
    }

    /// Image path, with a relative path taken from the config file's directory
    pub fn resolved_image_path(&self, config_path: &Path) -> PathBuf {
        if self.image_path.is_absolute() {
            return self.image_path.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.image_path),
            None => self.image_path.clone(),
        }
    }

    /// Boot info described by this configuration
    pub fn boot_info(&self) -> BootInfo {
        BootInfo {
            mode: self.mode,
            signature_type: self.signature_type,
            recovery: self.recovery,
            running_slot: self.running_slot,
            bootloader_version: self.bootloader_version,
            max_application_size: self.max_application_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("bootshare.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "image_path": "area.img",
                "mode": "single_slot",
                "signature_type": "rsa",
                "bootloader_version": {"major": 1, "minor": 4}
            }"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.capacity_bytes, 256);
        assert_eq!(config.recovery, RecoveryMode::None);
        assert_eq!(config.severity().unwrap(), Severity::Info);

        assert_eq!(
            config.resolved_image_path(&path),
            dir.path().join("area.img")
        );

        let info = config.boot_info();
        assert_eq!(info.mode, BootMode::SingleSlot);
        assert_eq!(info.bootloader_version, ImageVersion::new(1, 4, 0, 0));
    }

    #[test]
    fn test_rejects_tiny_capacity() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "image_path": "area.img",
                "capacity_bytes": 8,
                "mode": "ram_load",
                "signature_type": "none",
                "bootloader_version": {"major": 1, "minor": 0}
            }"#,
        );

        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("capacity_bytes"));
    }

    #[test]
    fn test_capacity_limited_by_total_length_field() {
        let dir = TempDir::new().unwrap();
        let body = |capacity: usize| {
            format!(
                r#"{{
                    "image_path": "area.img",
                    "capacity_bytes": {},
                    "mode": "ram_load",
                    "signature_type": "none",
                    "bootloader_version": {{"major": 1, "minor": 0}}
                }}"#,
                capacity
            )
        };

        let path = write_config(&dir, &body(65_536));
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert!(err.message().contains("<= 65535"));

        let path = write_config(&dir, &body(65_535));
        assert_eq!(Config::load(&path).unwrap().capacity_bytes, 65_535);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "image_path": "area.img",
                "mode": "swap_everything",
                "signature_type": "none",
                "bootloader_version": {"major": 1, "minor": 0}
            }"#,
        );

        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "image_path": "area.img",
                "mode": "direct_xip",
                "signature_type": "ed25519",
                "bootloader_version": {"major": 1, "minor": 0},
                "log_level": "verbose"
            }"#,
        );

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().contains("Failed to read config"));
    }
}
