use std::time::Duration;

/// Default address of a locally running battle server
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:7654";

/// Backoff for establishing the connection
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub max_attempts: Option<usize>,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl ReconnectPolicy {
    /// Delay to wait after a failed attempt that waited `delay`
    pub fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier).min(self.max_delay)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(5),
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Where and how to connect
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server_url: String,
    pub server_secret: Option<String>,
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Defaults overridden by `SERVER_URL` and `SERVER_SECRET`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("SERVER_URL").filter(|url| !url.trim().is_empty()) {
            config.server_url = url;
        }
        config.server_secret = lookup("SERVER_SECRET").filter(|secret| !secret.is_empty());
        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            server_secret: None,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Identity sent in the handshake
#[derive(Debug, Clone, PartialEq)]
pub struct BotInfo {
    pub name: String,
    pub version: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
}

impl BotInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            authors: Vec::new(),
            description: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "ws://localhost:7654");
        assert!(config.server_secret.is_none());
        assert_eq!(config.reconnect.max_attempts, Some(5));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ClientConfig::from_lookup(|key| match key {
            "SERVER_URL" => Some("ws://arena:9000".to_string()),
            "SERVER_SECRET" => Some("hush".to_string()),
            _ => None,
        });
        assert_eq!(config.server_url, "ws://arena:9000");
        assert_eq!(config.server_secret.as_deref(), Some("hush"));
    }

    #[test]
    fn test_blank_lookup_keeps_defaults() {
        let config = ClientConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert!(config.server_secret.is_none());
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.next_delay(Duration::from_secs(1)), Duration::from_secs(2));
        assert_eq!(policy.next_delay(Duration::from_secs(20)), Duration::from_secs(30));
    }

    #[test]
    fn test_bot_info() {
        let info = BotInfo::new("Walls", "1.0").with_author("Ann");
        assert_eq!(info.authors, vec!["Ann".to_string()]);
    }
}
