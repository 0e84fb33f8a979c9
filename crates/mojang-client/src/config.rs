use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mojang.com";
pub const DEFAULT_USER_AGENT: &str = "mojang-client-rs/0.1";
/// Hard cap the bulk endpoint enforces per call
pub const MAX_BATCH_SIZE: usize = 100;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CACHE_TTL_SECS: u64 = 86400; // 24 hours
const CACHE_CAPACITY: u64 = 10_000;

/// Configuration for a [`UuidResolver`](crate::UuidResolver)
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Sent as `User-Agent` on every request
    pub user_agent: String,
    /// Usernames per bulk call, clamped to `1..=MAX_BATCH_SIZE`
    pub batch_size: usize,
    /// Per-request timeout of the default HTTP transport
    pub request_timeout: Duration,
    /// Upper bound for a whole resolve call
    pub deadline: Option<Duration>,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            batch_size: MAX_BATCH_SIZE,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            deadline: None,
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            cache_capacity: CACHE_CAPACITY,
        }
    }
}

impl ResolverConfig {
    pub(crate) fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }

    pub(crate) fn single_lookup_url(&self, username: &str) -> String {
        format!(
            "{}/users/profiles/minecraft/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(username)
        )
    }

    pub(crate) fn bulk_lookup_url(&self) -> String {
        format!("{}/profiles/minecraft", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_size_is_clamped() {
        let mut config = ResolverConfig {
            batch_size: 500,
            ..Default::default()
        };
        assert_eq!(config.effective_batch_size(), 100);
        config.batch_size = 0;
        assert_eq!(config.effective_batch_size(), 1);
        config.batch_size = 25;
        assert_eq!(config.effective_batch_size(), 25);
    }

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let config = ResolverConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.single_lookup_url("Notch"),
            "http://localhost:8080/users/profiles/minecraft/Notch"
        );
        assert_eq!(
            config.bulk_lookup_url(),
            "http://localhost:8080/profiles/minecraft"
        );
    }

    #[test]
    fn test_single_lookup_url_encodes_username() {
        let config = ResolverConfig::default();
        assert_eq!(
            config.single_lookup_url("a/b c"),
            "https://api.mojang.com/users/profiles/minecraft/a%2Fb%20c"
        );
    }
}
