//! Server configuration from environment variables.
//!
//! | variable | default | |
//! |---|---|---|
//! | `CAMPUS_HTTP_HOST` | `0.0.0.0` | bind address |
//! | `CAMPUS_HTTP_PORT` | `8000` | falls back to `FASTAPIPORT` |
//! | `CAMPUS_LOG_FORMAT` | `json` | `json` or `pretty` |
//!
//! Log filtering itself is read from `RUST_LOG` by the observability crate.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use thiserror::Error;

use campus_observability::LogFormat;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    Invalid {
        var: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset or blank variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("CAMPUS_HTTP_HOST") {
            config.host = parse("CAMPUS_HTTP_HOST", &host)?;
        }
        if let Some(port) = get("CAMPUS_HTTP_PORT") {
            config.port = parse("CAMPUS_HTTP_PORT", &port)?;
        } else if let Some(port) = get("FASTAPIPORT") {
            config.port = parse("FASTAPIPORT", &port)?;
        }
        if let Some(format) = get("CAMPUS_LOG_FORMAT") {
            config.log_format = parse("CAMPUS_LOG_FORMAT", &format)?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Address reported by the health endpoints.
///
/// A specific bind address is reported as is. For a wildcard bind the host's
/// primary address is used: the local end of a UDP socket routed towards a
/// documentation-range address (connecting a UDP socket sends nothing). Hosts
/// without a route report loopback.
pub async fn advertised_ip(bound: IpAddr) -> IpAddr {
    if !bound.is_unspecified() {
        return bound;
    }
    match primary_ip(bound).await {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => loopback(bound),
        Err(err) => {
            tracing::warn!(
                error = %err,
                "could not resolve host address, reporting loopback"
            );
            loopback(bound)
        }
    }
}

const ROUTE_TARGET_V4: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);
const ROUTE_TARGET_V6: Ipv6Addr = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1);

async fn primary_ip(bound: IpAddr) -> std::io::Result<IpAddr> {
    let (local, remote) = match bound {
        IpAddr::V4(_) => (
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::new(IpAddr::V4(ROUTE_TARGET_V4), 9),
        ),
        IpAddr::V6(_) => (
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
            SocketAddr::new(IpAddr::V6(ROUTE_TARGET_V6), 9),
        ),
    };
    let socket = tokio::net::UdpSocket::bind(local).await?;
    socket.connect(remote).await?;
    Ok(socket.local_addr()?.ip())
}

fn loopback(bound: IpAddr) -> IpAddr {
    match bound {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ApiConfig::default());
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn reads_every_variable() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            ("CAMPUS_HTTP_HOST", "127.0.0.1"),
            ("CAMPUS_HTTP_PORT", "9090"),
            ("CAMPUS_LOG_FORMAT", "pretty"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn legacy_port_variable_is_a_fallback() {
        let cfg = ApiConfig::from_lookup(lookup(&[("FASTAPIPORT", "8123")])).unwrap();
        assert_eq!(cfg.port, 8123);

        let cfg = ApiConfig::from_lookup(lookup(&[
            ("FASTAPIPORT", "8123"),
            ("CAMPUS_HTTP_PORT", "8200"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8200);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = ApiConfig::from_lookup(lookup(&[("CAMPUS_HTTP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "CAMPUS_HTTP_PORT",
                ..
            }
        ));

        let err = ApiConfig::from_lookup(lookup(&[("CAMPUS_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "CAMPUS_LOG_FORMAT",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn specific_bind_address_is_reported_as_is() {
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(advertised_ip(ip).await, ip);
    }

    #[tokio::test]
    async fn wildcard_bind_address_is_never_reported() {
        let ip = advertised_ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED)).await;
        assert!(!ip.is_unspecified());
        assert!(ip.is_ipv4());
    }
}
