use std::env;

use anyhow::Result;

use crate::image::reference::DEFAULT_IPFS_GATEWAY;

/// Central configuration loaded from environment variables.
///
/// Nothing here is secret. The .env file is loaded automatically at
/// startup via dotenvy, so local overrides can live there.
pub struct Config {
    /// Gateway prefix used to resolve IPFS hashes found in image names
    /// (NOTIFKIT_IPFS_GATEWAY, defaults to https://ipfs.io/ipfs/).
    pub ipfs_gateway: String,
    /// User-Agent sent by the HTTP helper (NOTIFKIT_USER_AGENT).
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every field has a default, so this only fails if the environment
    /// holds something unusable.
    pub fn load() -> Result<Self> {
        let config = Self {
            ipfs_gateway: env::var("NOTIFKIT_IPFS_GATEWAY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IPFS_GATEWAY.to_string()),
            user_agent: env::var("NOTIFKIT_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_user_agent),
        };
        config.require_gateway()?;
        Ok(config)
    }

    /// Check that the gateway looks like an http(s) URL.
    pub fn require_gateway(&self) -> Result<()> {
        let gateway = self.ipfs_gateway.trim();
        if !(gateway.starts_with("https://") || gateway.starts_with("http://")) {
            anyhow::bail!(
                "NOTIFKIT_IPFS_GATEWAY must be an http(s) URL, got {:?}.\n\
                 Unset it to use {}.",
                self.ipfs_gateway,
                DEFAULT_IPFS_GATEWAY
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("notifkit/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = Config::default();
        assert!(config.require_gateway().is_ok());
        assert!(config.user_agent.starts_with("notifkit/"));
    }

    #[test]
    fn non_http_gateway_is_rejected() {
        let config = Config {
            ipfs_gateway: "ipfs://".to_string(),
            ..Config::default()
        };
        let err = config.require_gateway().unwrap_err();
        assert!(err.to_string().contains("NOTIFKIT_IPFS_GATEWAY"));
    }
}
