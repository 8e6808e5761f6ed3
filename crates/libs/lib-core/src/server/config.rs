use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use std::{net::SocketAddr, sync::OnceLock};

/// The version of the server.
pub static SERVER_VERSION: &str = concat!("mcd-coupon-server/", env!("CARGO_PKG_VERSION"));

pub static CONFIG_SERVER: OnceLock<ServerConfigServer> = OnceLock::new();

/// Env key of the listen addr
pub const ENV_LISTEN: &str = "MCD_LISTEN";
/// Env key of the upstream MCP server url
pub const ENV_UPSTREAM_URL: &str = "MCD_UPSTREAM_URL";
/// Env key of the jaeger agent endpoint, tracing export is off when unset
pub const ENV_JAEGER_ENDPOINT: &str = "MCD_JAEGER_ENDPOINT";

/// Init server config from env, call `dotenvy` before this to pick up `.env`.
///
/// Keeps the first config when called twice.
#[tracing::instrument]
pub fn init_config() -> Result<()> {
    let config = ServerConfigServer::from_env()?;
    tracing::info!("Server config: {:?}", config);
    let _ = CONFIG_SERVER.set(config);
    Ok(())
}

/// Get server config, default one if not inited
pub fn config() -> &'static ServerConfigServer {
    CONFIG_SERVER.get_or_init(ServerConfigServer::default)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfigServer {
    /// HTTP server addr
    pub listen: SocketAddr,
    /// Upstream MCP server, the fixed MCD one if `None`
    pub upstream_url: Option<String>,
    /// Jaeger agent endpoint
    pub jaeger_endpoint: Option<String>,
}

impl Default for ServerConfigServer {
    fn default() -> Self {
        Self {
            listen: ([127, 0, 0, 1], 2663).into(),
            upstream_url: None,
            jaeger_endpoint: None,
        }
    }
}

impl ServerConfigServer {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from a key lookup, blank values count as unset.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(listen) = get(ENV_LISTEN) {
            config.listen = listen
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_LISTEN} [{listen}]"))?;
        }
        config.upstream_url = get(ENV_UPSTREAM_URL);
        config.jaeger_endpoint = get(ENV_JAEGER_ENDPOINT);
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default() {
        let config = ServerConfigServer::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfigServer::default());
        assert_eq!(config.listen.to_string(), "127.0.0.1:2663");
        assert!(SERVER_VERSION.starts_with("mcd-coupon-server/"));
    }

    #[test]
    fn test_from_env() {
        let config = ServerConfigServer::from_lookup(lookup(&[
            (ENV_LISTEN, "0.0.0.0:8080"),
            (ENV_UPSTREAM_URL, "http://127.0.0.1:9000/mcp"),
            (ENV_JAEGER_ENDPOINT, "  "),
        ]))
        .unwrap();
        assert_eq!(config.listen.port(), 8080);
        assert_eq!(config.upstream_url.as_deref(), Some("http://127.0.0.1:9000/mcp"));
        assert_eq!(config.jaeger_endpoint, None);
    }

    #[test]
    fn test_invalid_listen() {
        let err = ServerConfigServer::from_lookup(lookup(&[(ENV_LISTEN, "localhost")])).unwrap_err();
        assert!(err.to_string().contains(ENV_LISTEN));
    }
}
