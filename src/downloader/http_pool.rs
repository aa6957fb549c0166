use std::time::Duration;
use reqwest::{Client, ClientBuilder, Proxy};
use crate::config::AppConfig;
use crate::errors::Result;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for the music-service and video-search calls.
pub struct HttpPool {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpPool {
    /// `timeout` of `None` keeps reqwest's default (no overall deadline).
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Self::builder(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let pool = Self::new(config.request_timeout_secs.map(Duration::from_secs))?;
        match &config.proxy {
            Some(proxy_url) => pool.with_proxy(proxy_url),
            None => Ok(pool),
        }
    }

    pub fn with_proxy(mut self, proxy_url: &str) -> Result<Self> {
        log::info!("Routing HTTP traffic through proxy: {}", proxy_url);
        let proxy = Proxy::all(proxy_url)?;
        self.client = Self::builder(self.timeout).proxy(proxy).build()?;
        Ok(self)
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    fn builder(timeout: Option<Duration>) -> ClientBuilder {
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        let pool = HttpPool::from_config(&AppConfig::default()).unwrap();
        assert!(pool.timeout.is_none());
    }

    #[test]
    fn applies_timeout_and_proxy() {
        let config = AppConfig {
            request_timeout_secs: Some(5),
            proxy: Some("socks5://127.0.0.1:1080".to_string()),
            ..AppConfig::default()
        };
        let pool = HttpPool::from_config(&config).unwrap();
        assert_eq!(pool.timeout, Some(Duration::from_secs(5)));
    }
}
