//! Environment-driven settings.
//! Used by: main.

use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:80";
const DEFAULT_DB_PATH: &str = "microservices.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            db_path: lookup("DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.into())
                .into(),
        }
    }
}
