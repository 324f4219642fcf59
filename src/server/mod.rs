//! Beacon backend: accepts device records over HTTP and keeps them in SQLite.
//!
//! Env variables read by the `beacon-server` binary:
//!   BEACON_DB  : sqlx SQLite url (default "sqlite://system_info.db?mode=rwc")
//!   PORT       : u16 (default 8080)
//!   LOG_LEVEL  : tracing filter
//!   LOG_FORMAT : "pretty" (default) or "json"

pub mod routes;
pub mod storage;

use tracing_subscriber::EnvFilter;

pub use routes::build_router;
pub use storage::{BeaconStore, StorageError};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://system_info.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 8080;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("info,beacon_server=debug,tower_http=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
