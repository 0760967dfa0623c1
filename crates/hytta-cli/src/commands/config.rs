//! Config subcommands.

use clap::Subcommand;
use hytta_core::Config;

/// Configuration actions.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file if none exists
    Init,
    /// Print the config file path
    Path,
}

/// Run the config command.
pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Init => {
            let path = Config::path()?;
            if path.exists() {
                println!("Config already exists at {}", path.display());
                return Ok(());
            }
            let config = Config::default();
            config.save()?;
            println!("Wrote default config to {}", path.display());
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
            Ok(())
        }
    }
}
