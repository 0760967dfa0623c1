use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hytta", version, about = "Hytta cabin booking CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Booking management and conflict checks
    Booking {
        #[command(subcommand)]
        action: commands::booking::BookingAction,
    },
    /// Calendar feed synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Booking { action } => commands::booking::run(action),
        Commands::Sync { action } => commands::sync::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
