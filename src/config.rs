// src/config.rs
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub reply_delay: Duration,
    pub session_ttl: Duration,
    pub purge_interval: Duration,
    /// Fixed seed for reply choice; entropy when unset.
    pub rng_seed: Option<u64>,
    /// Admin routes answer 401 when unset.
    pub admin_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            reply_delay: Duration::from_millis(1500),
            session_ttl: Duration::from_secs(30 * 60),
            purge_interval: Duration::from_secs(60),
            rng_seed: None,
            admin_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("COMPANION_BIND_ADDR") {
            Some(v) => parse("COMPANION_BIND_ADDR", "socket address", &v)?,
            None => defaults.bind_addr,
        };
        let reply_delay = match get("COMPANION_REPLY_DELAY_MS") {
            Some(v) => Duration::from_millis(parse("COMPANION_REPLY_DELAY_MS", "integer", &v)?),
            None => defaults.reply_delay,
        };
        let session_ttl = match get("COMPANION_SESSION_TTL_SECS") {
            Some(v) => Duration::from_secs(parse("COMPANION_SESSION_TTL_SECS", "integer", &v)?),
            None => defaults.session_ttl,
        };
        let purge_interval = match get("COMPANION_PURGE_INTERVAL_SECS") {
            Some(v) => {
                let secs: u64 = parse("COMPANION_PURGE_INTERVAL_SECS", "integer", &v)?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: "COMPANION_PURGE_INTERVAL_SECS",
                        expected: "positive integer",
                        value: v,
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.purge_interval,
        };
        let rng_seed = match get("COMPANION_RNG_SEED") {
            Some(v) => Some(parse("COMPANION_RNG_SEED", "integer", &v)?),
            None => None,
        };

        Ok(Self {
            bind_addr,
            reply_delay,
            session_ttl,
            purge_interval,
            rng_seed,
            admin_key: get("COMPANION_ADMIN_KEY"),
        })
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    value: &str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value: value.to_string(),
    })
}
