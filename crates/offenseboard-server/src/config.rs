use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub http_addr: SocketAddr,
    /// JSON dataset to serve; the built-in sample when unset.
    pub fixture_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let raw_addr = lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr
            .parse()
            .with_context(|| format!("HTTP_ADDR is not a socket address: {raw_addr}"))?;
        let fixture_path = lookup("FIXTURE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self {
            http_addr,
            fixture_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.http_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert!(cfg.fixture_path.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("FIXTURE_PATH", "/srv/offenses.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.http_addr.port(), 9000);
        assert_eq!(cfg.fixture_path, Some(PathBuf::from("/srv/offenses.json")));
    }

    #[test]
    fn blank_fixture_path_is_ignored() {
        let cfg = ServerConfig::from_lookup(lookup(&[("FIXTURE_PATH", "  ")])).unwrap();
        assert!(cfg.fixture_path.is_none());
    }

    #[test]
    fn bad_address_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("HTTP_ADDR", "nope")])).unwrap_err();
        assert!(err.to_string().contains("HTTP_ADDR"));
    }
}
