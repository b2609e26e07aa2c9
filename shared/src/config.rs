use anyhow::{Context, Result};
use std::env;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: var_or("DATABASE_HOST", "localhost"),
            port: var_or("DATABASE_PORT", "5432")
                .parse()
                .context("DATABASE_PORT must be a port number")?,
            username: var_or("DATABASE_USERNAME", "app"),
            password: var_or("DATABASE_PASSWORD", "passwd"),
            database: var_or("DATABASE_NAME", "app"),
        };
        let redis = RedisConfig {
            host: var_or("REDIS_HOST", "localhost"),
            port: var_or("REDIS_PORT", "6379")
                .parse()
                .context("REDIS_PORT must be a port number")?,
        };
        let mail = MailConfig {
            smtp_host: var_or("SMTP_HOST", "localhost"),
            smtp_port: var_or("SMTP_PORT", "465")
                .parse()
                .context("SMTP_PORT must be a port number")?,
            smtp_username: var_or("SMTP_USERNAME", ""),
            smtp_password: var_or("SMTP_PASSWORD", ""),
            from_address: var_or("MAIL_FROM", "noreply@coworking.local"),
        };
        Ok(Self {
            database,
            redis,
            mail,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
}
