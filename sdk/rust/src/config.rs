//! Endpoint configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{BroadcasttError, Result};
use crate::validation::validate_host;

/// Domain appended to a cluster name to form the host.
pub const CLUSTER_DOMAIN: &str = ".broadcastt.xyz";

pub const DEFAULT_CLUSTER: &str = "eu";
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_TLS_PORT: u16 = 443;
pub const DEFAULT_BASE_PATH: &str = "/apps/{appId}";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Placeholder replaced by the app ID in request paths.
pub const APP_ID_PLACEHOLDER: &str = "{appId}";

/// URI scheme used to reach the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Well-known port for the scheme.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => DEFAULT_PORT,
            Scheme::Https => DEFAULT_TLS_PORT,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = BroadcasttError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(BroadcasttError::invalid_argument(format!(
                "unsupported scheme {:?}",
                other
            ))),
        }
    }
}

/// Where and how requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    /// Host without scheme prefix or trailing slash, e.g. `eu.broadcastt.xyz`.
    pub host: String,
    pub port: u16,
    /// Path prefix of every request; `{appId}` is replaced by the app ID.
    pub base_path: String,
    pub timeout: Duration,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: Scheme::Http,
            host: cluster_host(DEFAULT_CLUSTER),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Endpoint {
    /// Point the host at `{cluster}.broadcastt.xyz`.
    pub fn use_cluster(&mut self, cluster: &str) {
        self.host = cluster_host(cluster);
    }

    /// Switch to https; the port moves to 443 only if it is still 80.
    pub fn use_tls(&mut self) {
        self.scheme = Scheme::Https;

        if self.port == DEFAULT_PORT {
            self.port = DEFAULT_TLS_PORT;
        }
    }

    /// `scheme://host:port`, rejecting hosts that carry their own scheme.
    pub fn build_uri(&self) -> Result<String> {
        validate_host(&self.host)?;

        Ok(format!("{}://{}:{}", self.scheme, self.host, self.port))
    }
}

/// Host name for a cluster.
pub fn cluster_host(cluster: &str) -> String {
    format!("{}{}", cluster, CLUSTER_DOMAIN)
}
