//! Application configuration loaded from environment variables.

use std::env;

use blogicum_infra::JwtConfig;
use blogicum_infra::database::DatabaseConfig;

/// Credentials of the staff account created at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the blog on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub admin: Option<AdminBootstrap>,
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
        });

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminBootstrap {
                email: env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{username}@localhost.localdomain")),
                username,
                password,
            }),
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            jwt: JwtConfig::from_env(),
            admin,
        }
    }
}
