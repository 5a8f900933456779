//! Server configuration from command-line flags and environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Log filter used when neither `RUST_LOG` nor `--log-filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,clinicdesk_web=debug,clinicdesk_core=debug";

/// Flash-cookie secret used when none is configured. Development only.
pub const DEV_FLASH_SECRET: &str = "clinicdesk-dev-flash-secret";

#[derive(Debug, Clone, Parser)]
#[command(name = "clinicdesk-server", version, about = "Clinic management web backend")]
pub struct Config {
    /// SQLite database file; created with the schema if missing
    #[arg(long, env = "CLINICDESK_DATABASE", default_value = "clinicdesk.db")]
    pub database: PathBuf,

    /// Address to listen on
    #[arg(long, env = "CLINICDESK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Secret used to sign flash cookies
    #[arg(long, env = "CLINICDESK_FLASH_SECRET", default_value = DEV_FLASH_SECRET, hide_env_values = true)]
    pub flash_secret: String,

    /// tracing filter directives, overridden by RUST_LOG
    #[arg(long, env = "CLINICDESK_LOG")]
    pub log_filter: Option<String>,
}

impl Config {
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.flash_secret == DEV_FLASH_SECRET
    }
}
