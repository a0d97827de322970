use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Repeating background task; the first tick fires one period after spawn.
/// Stops on [`Poller::cancel`] or when dropped.
pub struct Poller {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let (cancel, mut cancelled) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut cancelled => break,
                    _ = ticker.tick() => tick().await,
                }
            }
            debug!("Poller stopped");
        });

        Self {
            cancel: Some(cancel),
            handle,
        }
    }

    /// Stops the task and waits for the tick in progress, if any, to finish.
    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
