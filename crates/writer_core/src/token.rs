use std::time::{Duration, SystemTime};

/// Subtracted from the server-reported lifetime so a token never expires mid-request.
pub const TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: SystemTime,
}

impl AccessToken {
    /// Builds a token issued at `issued_at` that the server considers valid for `ttl`.
    ///
    /// The stored expiry is `issued_at + ttl - TOKEN_SAFETY_MARGIN`, clamped to
    /// `issued_at` for lifetimes shorter than the margin or too large to
    /// represent.
    pub fn issued(value: impl Into<String>, issued_at: SystemTime, ttl: Duration) -> Self {
        let expires_at = issued_at
            .checked_add(ttl.saturating_sub(TOKEN_SAFETY_MARGIN))
            .unwrap_or(issued_at);
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    pub fn is_usable_at(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }
}

/// Holds at most one token; a new token replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCache {
    current: Option<AccessToken>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token value if it is still usable at `now`.
    pub fn usable(&self, now: SystemTime) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|token| token.is_usable_at(now))
            .map(AccessToken::value)
    }

    pub fn store(&mut self, token: AccessToken) -> &str {
        self.current.insert(token).value()
    }

    pub fn current(&self) -> Option<&AccessToken> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch_plus(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn expiry_subtracts_safety_margin() {
        let token = AccessToken::issued("t", epoch_plus(1_000), Duration::from_secs(7_200));
        assert_eq!(token.expires_at(), epoch_plus(1_000 + 7_200 - 300));
    }

    #[test]
    fn short_lifetime_expires_immediately() {
        let token = AccessToken::issued("t", epoch_plus(1_000), Duration::from_secs(60));
        assert_eq!(token.expires_at(), epoch_plus(1_000));
        assert!(!token.is_usable_at(epoch_plus(1_000)));
    }

    #[test]
    fn unrepresentable_lifetime_expires_immediately() {
        let token = AccessToken::issued("t", epoch_plus(1_000), Duration::MAX);
        assert_eq!(token.expires_at(), epoch_plus(1_000));
    }

    #[test]
    fn cache_reuses_until_expiry() {
        let mut cache = TokenCache::new();
        assert_eq!(cache.usable(epoch_plus(0)), None);

        cache.store(AccessToken::issued("abc", epoch_plus(0), Duration::from_secs(7_200)));
        assert_eq!(cache.usable(epoch_plus(6_899)), Some("abc"));
        assert_eq!(cache.usable(epoch_plus(6_900)), None);
        assert_eq!(cache.usable(epoch_plus(10_000)), None);
    }

    #[test]
    fn store_replaces_previous_token() {
        let mut cache = TokenCache::new();
        cache.store(AccessToken::issued("old", epoch_plus(0), Duration::from_secs(600)));
        let value = cache.store(AccessToken::issued("new", epoch_plus(500), Duration::from_secs(600)));
        assert_eq!(value, "new");
        assert_eq!(cache.current().map(AccessToken::value), Some("new"));
    }
}
