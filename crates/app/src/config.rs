//! Configuration shared by the CLI commands.

use clap::Args;

use crate::domain::carts::redis_store::DEFAULT_KEY_PREFIX;

/// Postgres settings.
#[derive(Debug, Clone, Args)]
pub struct DatabaseArgs {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Cart store settings.
#[derive(Debug, Clone, Args)]
pub struct CartStoreArgs {
    /// Redis connection string of the cart store
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    pub redis_url: String,

    /// Prefix of cart keys
    #[arg(long, env = "CART_KEY_PREFIX", default_value = DEFAULT_KEY_PREFIX)]
    pub cart_key_prefix: String,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}
