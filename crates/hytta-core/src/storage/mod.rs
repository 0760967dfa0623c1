mod config;
pub mod booking_db;

pub use booking_db::{BookingDb, BookingRecord};
pub use config::{Config, NightConfig, SyncConfig};

use std::path::PathBuf;

/// Returns `~/.config/hytta[-dev]/` based on HYTTA_ENV.
///
/// Set HYTTA_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HYTTA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hytta-dev")
    } else {
        base_dir.join("hytta")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
