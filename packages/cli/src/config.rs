// ABOUTME: Environment-driven configuration for the server binary
// ABOUTME: Admin credentials must be provided; everything else has defaults

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid session TTL: {0}")]
    InvalidSessionTtl(String),
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub database_path: Option<PathBuf>,
    pub session_ttl_hours: i64,
    pub admin_email: String,
    pub admin_name: String,
    pub admin_password: String,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "4001".to_string());

        let port = port_str.parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let database_path = env::var("DATABASE_PATH").ok().map(PathBuf::from);

        let session_ttl_str = env::var("SESSION_TTL_HOURS").unwrap_or_else(|_| "24".to_string());
        let session_ttl_hours = session_ttl_str
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or(ConfigError::InvalidSessionTtl(session_ttl_str))?;

        // The first admin cannot register itself, so it must be configured
        let admin_email = required("ADMIN_EMAIL")?;
        let admin_name = env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
        let admin_password = required("ADMIN_PASSWORD")?;

        Ok(Config {
            port,
            cors_origin,
            database_path,
            session_ttl_hours,
            admin_email,
            admin_name,
            admin_password,
        })
    }
}
