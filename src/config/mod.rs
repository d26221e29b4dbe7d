use tracing::{debug, info};

pub const MEMORY_DATABASE_URL: &str = "memory://";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// `memory://` or a `postgres://` connection string
    pub database_url: String,
    pub database_max_connections: u32,
}

impl Config {
    /// Configuration for a throwaway server, e.g. in tests: ephemeral port,
    /// the given database and default pool size.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            server_port: 0,
            database_url: database_url.into(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

pub fn load() -> Config {
    info!("Loading application configuration");
    debug!("Configuration loading started");

    let server_port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let database_url = std::env::var("APP_DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| MEMORY_DATABASE_URL.to_string());

    let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|p| p.parse::<u32>().ok().filter(|&n| n >= 1))
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let config = Config {
        server_port,
        database_url,
        database_max_connections,
    };

    info!(
        server_port = config.server_port,
        database_backend = backend_name(&config.database_url),
        database_max_connections = config.database_max_connections,
        "Configuration loaded successfully"
    );

    config
}

/// Scheme of the database url, safe to log (no credentials).
pub fn backend_name(database_url: &str) -> &str {
    database_url.split("://").next().unwrap_or("unknown")
}
