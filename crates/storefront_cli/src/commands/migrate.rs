//! Schema migration command
//!
//! Usage: storefront migrate

use storefront_api::ApiConfig;
use storefront_core::db::{migrations, open_db};

/// Opens (and thereby migrates) the configured database.
pub fn execute(config: &ApiConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let version = migrations::current_version(&conn)?;
    println!(
        "schema_version={version} db_path={}",
        config.db_path.display()
    );
    Ok(true)
}
