//! Request-path service: cached payload lookup with build-on-miss.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::PayloadCache;
use crate::kpi::builder::PayloadBuilder;
use crate::kpi::types::{Payload, PayloadState, Selector};

/// Result of a forced rebuild.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// A new payload replaced the cache entry
    Published(Arc<Payload>),
    /// The warehouse was unreachable; the previous entry (if any) stays
    KeptPrevious { reason: String },
}

pub struct Dashboard {
    builder: PayloadBuilder,
    cache: PayloadCache,
}

impl Dashboard {
    pub fn new(builder: PayloadBuilder) -> Self {
        Self {
            builder,
            cache: PayloadCache::new(),
        }
    }

    pub fn cache(&self) -> &PayloadCache {
        &self.cache
    }

    /// Payload for a selector, building it on a cache miss.
    ///
    /// Unavailable payloads are returned but not cached, so the next request
    /// tries the warehouse again.
    pub async fn payload(&self, selector: Selector) -> Arc<Payload> {
        if let Some(hit) = self.cache.get(&selector) {
            return hit;
        }

        info!(event = "core.dashboard.build_on_miss", selector = %selector);
        let payload = Arc::new(self.builder.build(selector).await);
        if !payload.is_unavailable() {
            self.cache.put(selector, Arc::clone(&payload));
        }
        payload
    }

    /// Rebuild a selector regardless of what is cached.
    ///
    /// A payload whose summary fetch failed never replaces the cached one.
    pub async fn refresh(&self, selector: Selector) -> RefreshOutcome {
        let payload = self.builder.build(selector).await;
        match &payload.state {
            PayloadState::Unavailable { reason } => {
                warn!(
                    event = "core.dashboard.refresh_kept_previous",
                    selector = %selector,
                    reason = %reason,
                    has_previous = self.cache.get(&selector).is_some()
                );
                RefreshOutcome::KeptPrevious {
                    reason: reason.clone(),
                }
            }
            _ => {
                let payload = Arc::new(payload);
                self.cache.put(selector, Arc::clone(&payload));
                RefreshOutcome::Published(payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::builder::testing::{Canned, builder, connector, full};

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let connector = connector(full());
        let dashboard = Dashboard::new(builder(&connector));

        let first = dashboard.payload(Selector::Current).await;
        let statements = connector.executed().len();
        let second = dashboard.payload(Selector::Current).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(connector.executed().len(), statements);
    }

    #[tokio::test]
    async fn test_no_data_payloads_are_cached() {
        let connector = connector(Canned {
            summary: None,
            ..full()
        });
        let dashboard = Dashboard::new(builder(&connector));

        let payload = dashboard.payload(Selector::Current).await;
        assert_eq!(payload.state, PayloadState::NoData);
        assert_eq!(dashboard.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_payloads_are_not_cached() {
        let connector = connector(Canned {
            fail_summary: true,
            ..full()
        });
        let dashboard = Dashboard::new(builder(&connector));

        let payload = dashboard.payload(Selector::Current).await;
        assert!(payload.is_unavailable());
        assert!(dashboard.cache().is_empty());

        dashboard.payload(Selector::Current).await;
        assert_eq!(connector.executed().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_entry() {
        let connector = connector(full());
        let dashboard = Dashboard::new(builder(&connector));

        let first = dashboard.payload(Selector::Current).await;
        let RefreshOutcome::Published(fresh) = dashboard.refresh(Selector::Current).await else {
            panic!("expected a published payload");
        };

        assert!(!Arc::ptr_eq(&first, &fresh));
        let cached = dashboard.payload(Selector::Current).await;
        assert!(Arc::ptr_eq(&cached, &fresh));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_entry() {
        let healthy = connector(full());
        let dashboard = Dashboard::new(builder(&healthy));
        let first = dashboard.payload(Selector::Current).await;

        // Same cache, but every summary fetch now fails
        let broken = connector(Canned {
            fail_summary: true,
            ..full()
        });
        let Dashboard { cache, .. } = dashboard;
        let dashboard = Dashboard {
            builder: builder(&broken),
            cache,
        };

        let outcome = dashboard.refresh(Selector::Current).await;
        assert!(matches!(outcome, RefreshOutcome::KeptPrevious { .. }));

        let cached = dashboard.payload(Selector::Current).await;
        assert!(Arc::ptr_eq(&cached, &first));
    }
}
