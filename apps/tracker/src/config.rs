//! Runtime configuration read from the environment (and `.env`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use study_core::IntervalLadder;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub ladder: IntervalLadder,
    pub lock_timeout: Duration,
    pub daily_reset_hour: u32,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let ladder = match lookup("SRS_LADDER") {
            Some(raw) => raw
                .parse::<IntervalLadder>()
                .with_context(|| format!("invalid SRS_LADDER {raw:?}"))?,
            None => IntervalLadder::default(),
        };

        let lock_timeout_ms: u64 = match lookup("LOCK_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid LOCK_TIMEOUT_MS {raw:?}"))?,
            None => 2000,
        };

        let daily_reset_hour: u32 = match lookup("DAILY_RESET_HOUR") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid DAILY_RESET_HOUR {raw:?}"))?,
            None => 0,
        };
        if daily_reset_hour > 23 {
            bail!("DAILY_RESET_HOUR must be between 0 and 23, got {daily_reset_hour}");
        }

        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT {raw:?}"))?,
            None => 3000,
        };

        Ok(Self {
            database_path,
            ladder,
            lock_timeout: Duration::from_millis(lock_timeout_ms),
            daily_reset_hour,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_database_path() -> PathBuf {
    // Use the platform data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("study-tracker")
        .join("tracker.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.ladder, IntervalLadder::default());
        assert_eq!(config.lock_timeout, Duration::from_millis(2000));
        assert_eq!(config.daily_reset_hour, 0);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.database_path.ends_with("study-tracker/tracker.db"));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("DATABASE_PATH", "/tmp/t.db"),
            ("SRS_LADDER", "2, 4, 8"),
            ("LOCK_TIMEOUT_MS", "150"),
            ("DAILY_RESET_HOUR", "4"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.ladder.as_slice(), &[2, 4, 8]);
        assert_eq!(config.lock_timeout, Duration::from_millis(150));
        assert_eq!(config.daily_reset_hour, 4);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn invalid_ladder_fails_at_startup() {
        assert!(config(&[("SRS_LADDER", "3,1")]).is_err());
        assert!(config(&[("SRS_LADDER", "")]).is_err());
    }

    #[test]
    fn invalid_reset_hour() {
        assert!(config(&[("DAILY_RESET_HOUR", "24")]).is_err());
        assert!(config(&[("PORT", "http")]).is_err());
    }
}
