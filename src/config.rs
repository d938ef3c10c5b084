use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://gptproto.com/api/v3";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 300_000;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct GptProtoConfig {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub poll_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub gptproto: GptProtoConfig,
}

impl Default for GptProtoConfig {
    fn default() -> Self {
        GptProtoConfig {
            base_url: None,
            poll_interval_ms: None,
            poll_timeout_ms: None,
        }
    }
}

impl GptProtoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url = env::var("GPTPROTO_BASE_URL").ok();
        let poll_interval_ms = env::var("GPTPROTO_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok());
        let poll_timeout_ms = env::var("GPTPROTO_POLL_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok());

        GptProtoConfig {
            base_url,
            poll_interval_ms,
            poll_timeout_ms,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_poll_interval(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = Some(interval_ms);
        self
    }

    pub fn with_poll_timeout(mut self, timeout_ms: u64) -> Self {
        self.poll_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms.unwrap_or(DEFAULT_POLL_TIMEOUT_MS))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            gptproto: GptProtoConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            gptproto: GptProtoConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_gptproto(mut self, config: GptProtoConfig) -> Self {
        self.gptproto = config;
        self
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}
