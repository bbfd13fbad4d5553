use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// System configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request body limit for uploads, in MiB.
    #[serde(rename = "max_upload_mb")]
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_mb() -> usize {
    64
}

/// Upper bound for `max_upload_mb`; keeps the byte count well inside `usize`.
pub const MAX_UPLOAD_MB_LIMIT: usize = 4096;

impl SystemConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be between 1 and 65535".to_string());
        }
        if self.max_upload_mb == 0 || self.max_upload_mb > MAX_UPLOAD_MB_LIMIT {
            return Err(format!(
                "max_upload_mb must be between 1 and {}",
                MAX_UPLOAD_MB_LIMIT
            ));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Listen address; `host` must be `localhost` or a literal IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip = match self.host.as_str() {
            "localhost" => IpAddr::V4(Ipv4Addr::LOCALHOST),
            host => host.parse::<IpAddr>().map_err(|_| {
                format!("host must be \"localhost\" or an IP address, got \"{}\"", host)
            })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}
