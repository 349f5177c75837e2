use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use dotenvy::dotenv;
use strum::EnumString;

use crate::utils::time_parse::DEFAULT_ZONE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    MySql,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub store_backend: StoreBackend,

    /// IANA zone for calendar days and offset-less timestamps; an unknown
    /// name falls back to fixed +07:00 (WIB), not to UTC
    pub timezone: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_per_min: u32,

    pub log_dir: String,

    /// `nik:full name` pairs seeded into the memory backend
    pub memory_roster: Vec<(String, String)>,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} is invalid: {e}")),
        None => Ok(default),
    }
}

fn parse_roster(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (nik, name) = entry
                .split_once(':')
                .with_context(|| format!("MEMORY_ROSTER entry {entry:?} must look like nik:name"))?;
            Ok((nik.trim().to_string(), name.trim().to_string()))
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_addr = lookup("SERVER_ADDR").context("SERVER_ADDR must be set")?;
        let store_backend = parse_or(&lookup, "STORE_BACKEND", StoreBackend::MySql)?;
        let database_url = lookup("DATABASE_URL");

        if store_backend == StoreBackend::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=mysql");
        }

        Ok(Self {
            server_addr,
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            store_backend,
            timezone: lookup("APP_TIMEZONE").unwrap_or_else(|| DEFAULT_ZONE.to_string()),
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            rate_per_min: parse_or(&lookup, "RATE_PER_MIN", 1000)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            memory_roster: match lookup("MEMORY_ROSTER") {
                Some(raw) => parse_roster(&raw)?,
                None => Vec::new(),
            },
        })
    }
}
