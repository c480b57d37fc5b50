use std::time::Duration;

/// Point in an aggregation pass at which the engine pauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallBoundary {
    /// After one item and its enrichment calls
    Item,
    /// After a whole discover page
    Page,
}

/// Rate-limit policy consulted between outbound calls
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PacingPolicy: Send + Sync {
    async fn wait_before_next_call(&self, boundary: CallBoundary);
}

/// Fixed sleeps sized to stay under the external APIs' rate limits
#[derive(Debug, Clone)]
pub struct FixedDelayPacing {
    item_delay: Duration,
    page_delay: Duration,
}

impl Default for FixedDelayPacing {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(1))
    }
}

impl FixedDelayPacing {
    pub fn new(item_delay: Duration, page_delay: Duration) -> Self {
        Self {
            item_delay,
            page_delay,
        }
    }

    pub fn delay_for(&self, boundary: CallBoundary) -> Duration {
        match boundary {
            CallBoundary::Item => self.item_delay,
            CallBoundary::Page => self.page_delay,
        }
    }
}

#[async_trait::async_trait]
impl PacingPolicy for FixedDelayPacing {
    async fn wait_before_next_call(&self, boundary: CallBoundary) {
        let delay = self.delay_for(boundary);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// No pauses at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait::async_trait]
impl PacingPolicy for NoPacing {
    async fn wait_before_next_call(&self, _boundary: CallBoundary) {}
}
