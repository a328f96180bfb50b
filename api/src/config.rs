use std::env;

use anyhow::{Context, Result};
use tower_cookies::Key;
use tracing::warn;

/// Runtime settings read from the environment (and `.env`, when present).
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_key: Key,
    pub admin: Option<AdminAccount>,
}

/// Credentials of the cook created on first start.
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL is not set in .env file")?;
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let port = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?,
            Err(_) => 8000,
        };

        let session_key = match env::var("SESSION_SECRET") {
            Ok(secret) => Key::try_from(secret.as_bytes())
                .context("SESSION_SECRET must be at least 64 bytes long")?,
            Err(_) => {
                warn!("SESSION_SECRET is not set, sessions will not survive a restart");
                Key::generate()
            }
        };

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminAccount { username, password }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            session_key,
            admin,
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
