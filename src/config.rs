//! Application configuration loaded from the environment.
//!
//! Configuration is read once at startup. A `.env` file is honored for
//! local development but never required - all variables have working
//! defaults.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the remote store connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable naming the guest blob location.
pub const GUEST_DATA_PATH_VAR: &str = "ZENITH_GUEST_DATA_PATH";

/// Resolved application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Connection string for the remote store
    pub database_url: String,
    /// Path of the guest-local budget blob
    pub guest_data_path: PathBuf,
}

/// Loads configuration from the environment, honoring a `.env` file when
/// present.
#[must_use]
pub fn load_app_configuration() -> AppConfig {
    dotenvy::dotenv().ok();

    let database_url = env::var(DATABASE_URL_VAR)
        .unwrap_or_else(|_| "sqlite://data/zenith_budget.sqlite".to_string());
    let guest_data_path = env::var(GUEST_DATA_PATH_VAR)
        .map_or_else(|_| PathBuf::from("data/guest-budget.json"), PathBuf::from);

    AppConfig {
        database_url,
        guest_data_path,
    }
}
