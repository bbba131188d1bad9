use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::intent::ParserKind;

pub const DEFAULT_ORCHESTRATOR_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CALENDAR_URL: &str = "http://localhost:8081";
pub const DEFAULT_TODO_URL: &str = "http://localhost:8082";
pub const DEFAULT_CALENDAR_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_TODO_ADDR: &str = "0.0.0.0:8082";
pub const DEFAULT_AGENT_TIMEOUT_MS: u64 = 10_000;

/// Orchestrator settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub calendar_url: String,
    pub todo_url: String,
    pub parser: ParserKind,
    pub agent_timeout: Duration,
}

impl Config {
    /// Read from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing or unparseable values fall back
    /// to the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_ms = parse_or(&lookup, "AGENT_TIMEOUT_MS", DEFAULT_AGENT_TIMEOUT_MS);

        Self {
            bind_addr: socket_addr_or(&lookup, "ORCHESTRATOR_ADDR", DEFAULT_ORCHESTRATOR_ADDR),
            calendar_url: string_or(&lookup, "CALENDAR_URL", DEFAULT_CALENDAR_URL),
            todo_url: string_or(&lookup, "TODO_URL", DEFAULT_TODO_URL),
            parser: parse_or(&lookup, "NLU_PROVIDER", ParserKind::default()),
            agent_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Listen address for a worker binary, e.g. `CALENDAR_ADDR`
pub fn worker_addr(key: &str, default: &str) -> SocketAddr {
    socket_addr_or(&|k: &str| std::env::var(k).ok(), key, default)
}

fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{}={:?} is invalid ({}), using default {}", key, raw, e, default);
            default
        }
    }
}

fn socket_addr_or<F>(lookup: &F, key: &str, default: &str) -> SocketAddr
where
    F: Fn(&str) -> Option<String>,
{
    let fallback = SocketAddr::from_str(default)
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)));
    parse_or(lookup, key, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.calendar_url, "http://localhost:8081");
        assert_eq!(config.todo_url, "http://localhost:8082");
        assert_eq!(config.parser, ParserKind::Keyword);
        assert_eq!(config.agent_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("ORCHESTRATOR_ADDR", "127.0.0.1:9000"),
            ("CALENDAR_URL", "http://calendar:80"),
            ("TODO_URL", "http://todo:80"),
            ("NLU_PROVIDER", "keyword"),
            ("AGENT_TIMEOUT_MS", "250"),
        ]);
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.calendar_url, "http://calendar:80");
        assert_eq!(config.todo_url, "http://todo:80");
        assert_eq!(config.agent_timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[
            ("ORCHESTRATOR_ADDR", "not an address"),
            ("NLU_PROVIDER", "neural"),
            ("AGENT_TIMEOUT_MS", "soon"),
            ("CALENDAR_URL", "  "),
        ]);
        assert_eq!(config, Config::default());
    }
}
