//! Per-call dispatch options.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Options that shape one dispatch without being part of the request itself.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// `Some(false)` bypasses the cache layer for this call.
    pub cache: Option<bool>,
    /// Overrides `Params::timeout` and the adapter default.
    pub timeout: Option<Duration>,
    /// Overrides the signal produced by `signal_for_request`.
    pub signal: Option<CancellationToken>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = Some(enabled);
        self
    }

    /// Shorthand for `with_cache(false)`.
    pub fn without_cache(self) -> Self {
        self.with_cache(false)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// False only when the caller explicitly disabled caching.
    pub fn cache_enabled(&self) -> bool {
        self.cache != Some(false)
    }

    /// Fill an unset timeout from a lower-precedence source.
    pub fn or_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = self.timeout.or(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_is_enabled_unless_explicitly_disabled() {
        assert!(DispatchOptions::new().cache_enabled());
        assert!(DispatchOptions::new().with_cache(true).cache_enabled());
        assert!(!DispatchOptions::new().without_cache().cache_enabled());
    }

    #[test]
    fn timeout_precedence() {
        let call = DispatchOptions::new().with_timeout(Duration::from_secs(1));
        assert_eq!(
            call.or_timeout(Some(Duration::from_secs(5))).timeout,
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            DispatchOptions::new().or_timeout(Some(Duration::from_secs(5))).timeout,
            Some(Duration::from_secs(5))
        );
    }
}
