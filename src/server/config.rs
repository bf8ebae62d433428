//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default consumer (HTTP) port
pub const DEFAULT_WEB_PORT: u16 = 5000;

/// Default producer (TCP) port
pub const DEFAULT_DATA_PORT: u16 = 5001;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP consumer endpoint binds to
    pub web_addr: SocketAddr,

    /// Address the producer endpoint binds to
    pub data_addr: SocketAddr,

    /// Bytes read from the producer per chunk
    pub read_buffer_size: usize,

    /// Longest accepted record in bytes; longer lines are dropped
    pub max_record_len: usize,

    /// Enable TCP_NODELAY on producer sockets
    pub tcp_nodelay: bool,

    /// Interval between SSE keep-alive comments
    pub keep_alive_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            web_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_WEB_PORT)),
            data_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_DATA_PORT)),
            read_buffer_size: 8 * 1024,
            max_record_len: 1024 * 1024,
            tcp_nodelay: true,
            keep_alive_interval: Duration::from_secs(15),
        }
    }
}

impl ServerConfig {
    /// Set the consumer endpoint address
    pub fn web_addr(mut self, addr: SocketAddr) -> Self {
        self.web_addr = addr;
        self
    }

    /// Set the producer endpoint address
    pub fn data_addr(mut self, addr: SocketAddr) -> Self {
        self.data_addr = addr;
        self
    }

    /// Set the producer read chunk size
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Set the maximum record length
    pub fn max_record_len(mut self, len: usize) -> Self {
        self.max_record_len = len;
        self
    }

    /// Set the SSE keep-alive interval
    pub fn keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    /// Check the configuration for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_size == 0 {
            return Err(Error::InvalidConfig("read_buffer_size must be > 0".into()));
        }
        if self.max_record_len == 0 {
            return Err(Error::InvalidConfig("max_record_len must be > 0".into()));
        }
        if self.keep_alive_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "keep_alive_interval must be > 0".into(),
            ));
        }
        // Port 0 asks the OS for a free port, so only fixed ports can clash
        if self.web_addr == self.data_addr && self.web_addr.port() != 0 {
            return Err(Error::InvalidConfig(format!(
                "web and data endpoints both use {}",
                self.web_addr
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.web_addr.port(), DEFAULT_WEB_PORT);
        assert_eq!(config.data_addr.port(), DEFAULT_DATA_PORT);
        assert!(config.web_addr.ip().is_loopback());
        assert!(config.tcp_nodelay);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let web: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let data: SocketAddr = "0.0.0.0:8081".parse().unwrap();
        let config = ServerConfig::default()
            .web_addr(web)
            .data_addr(data)
            .read_buffer_size(1024)
            .max_record_len(64)
            .keep_alive_interval(Duration::from_secs(5));

        assert_eq!(config.web_addr, web);
        assert_eq!(config.data_addr, data);
        assert_eq!(config.read_buffer_size, 1024);
        assert_eq!(config.max_record_len, 64);
        assert_eq!(config.keep_alive_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let config = ServerConfig::default().read_buffer_size(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = ServerConfig::default().max_record_len(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_shared_port() {
        let addr: SocketAddr = "127.0.0.1:7000".parse().unwrap();
        let config = ServerConfig::default().web_addr(addr).data_addr(addr);
        assert!(config.validate().is_err());

        let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let config = ServerConfig::default().web_addr(any).data_addr(any);
        assert!(config.validate().is_ok());
    }
}
