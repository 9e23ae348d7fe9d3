//! Storefront CLI.
//!
//! # Responsibility
//! - Resolve configuration from `STOREFRONT_*` variables and global flags.
//! - Run one request, a schema migration, or a version probe per call.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storefront_api::ApiConfig;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront - users, products and orders over SQLite", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// SQLite database file (overrides STOREFRONT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (overrides STOREFRONT_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Rolling log directory (overrides STOREFRONT_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

impl GlobalArgs {
    fn into_config(self, mut config: ApiConfig) -> ApiConfig {
        if let Some(db) = self.db {
            config.db_path = db;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = Some(dir);
        }
        config
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send one request to the API
    Request(commands::request::RequestArgs),
    /// Create or upgrade the database schema and print its version
    Migrate,
    /// Print crate versions
    Version,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.global.into_config(ApiConfig::from_env());

    if let Err(e) = config.init_logging() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Request(args) => commands::request::execute(&config, args),
        Commands::Migrate => commands::migrate::execute(&config),
        Commands::Version => {
            println!("storefront_cli version={}", env!("CARGO_PKG_VERSION"));
            println!("storefront_core version={}", storefront_core::core_version());
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
