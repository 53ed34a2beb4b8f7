//! Browser Runtime Glue

use async_trait::async_trait;
use garden_state::Backoff;
use gloo_timers::future::TimeoutFuture;

/// Retry backoff on the browser timer queue
pub struct GlooBackoff;

#[async_trait(?Send)]
impl Backoff for GlooBackoff {
    async fn sleep(&self, ms: u64) {
        TimeoutFuture::new(u32::try_from(ms).unwrap_or(u32::MAX)).await;
    }
}
