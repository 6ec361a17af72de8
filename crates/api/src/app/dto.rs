use std::net::IpAddr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    pub echo: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: u16,
    pub status_message: &'static str,
    /// RFC 3339, UTC, `Z`-suffixed.
    pub timestamp: String,
    pub ip_address: String,
    pub echo: Option<String>,
    pub path_echo: Option<String>,
}

impl Health {
    pub fn ok(ip_address: IpAddr, echo: Option<String>, path_echo: Option<String>) -> Self {
        Self {
            status: 200,
            status_message: "OK",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ip_address: ip_address.to_string(),
            echo,
            path_echo,
        }
    }
}

/// Address reported by the health endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub ip_address: IpAddr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn health_timestamp_is_utc_zulu() {
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let h = Health::ok(ip, Some("hi".to_string()), None);
        assert_eq!(h.status, 200);
        assert!(h.timestamp.ends_with('Z'));
        assert_eq!(h.ip_address, "127.0.0.1");
        assert_eq!(h.echo.as_deref(), Some("hi"));
        assert!(h.path_echo.is_none());
    }
}
