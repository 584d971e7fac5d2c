use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::ResourceList;
use crate::api::ResourceApi;
use crate::config::Config;

/// Re-runs a refresh at a fixed interval until cancelled or dropped.
///
/// The first refresh happens one interval after starting; the caller has
/// normally just loaded. A slow refresh delays the next one instead of
/// causing a burst.
pub struct Poller {
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(interval: Duration, refresh: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(?interval, "polling started");
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                refresh().await;
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("polling stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Reload `list` every `interval`. `None` disables polling, as configured
/// by `POLL_INTERVAL_SECS`.
pub fn use_polling<A: ResourceApi>(
    list: Arc<ResourceList<A>>,
    interval: Option<Duration>,
) -> Option<Poller> {
    let interval = interval.filter(|i| !i.is_zero())?;
    Some(Poller::start(interval, move || {
        let list = list.clone();
        async move { list.load().await }
    }))
}

/// Reload `list` at the configured `POLL_INTERVAL_SECS`, if any.
pub fn use_configured_polling<A: ResourceApi>(
    list: Arc<ResourceList<A>>,
    config: &Config,
) -> Option<Poller> {
    use_polling(list, config.poll_interval)
}
