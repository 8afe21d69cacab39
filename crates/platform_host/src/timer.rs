//! Awaitable delays used to pace sequenced launches.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc, thread, time::Duration};

use futures::channel::oneshot;

/// Object-safe boxed future used by [`LaunchTimer`].
pub type LaunchTimerFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Host service that resolves after a requested delay.
pub trait LaunchTimer {
    /// Completes once `duration` has elapsed.
    fn sleep<'a>(&'a self, duration: Duration) -> LaunchTimerFuture<'a>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Timer backed by `tokio::time` when a Tokio runtime is current.
///
/// Outside a runtime the delay runs on a short-lived helper thread that completes a
/// [`futures::channel::oneshot`], so any executor can drive it.
pub struct TokioLaunchTimer;

impl LaunchTimer for TokioLaunchTimer {
    fn sleep<'a>(&'a self, duration: Duration) -> LaunchTimerFuture<'a> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Box::pin(tokio::time::sleep(duration));
        }

        let (done, finished) = oneshot::channel::<()>();
        let spawned = thread::Builder::new()
            .name("launch-timer".to_string())
            .spawn(move || {
                thread::sleep(duration);
                let _ = done.send(());
            });
        if let Err(err) = spawned {
            log::warn!("launch timer thread unavailable, skipping {duration:?} delay: {err}");
        }
        Box::pin(async move {
            let _ = finished.await;
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Timer that resolves immediately and records every requested delay. Clones share the record.
pub struct ImmediateLaunchTimer {
    requested: Rc<RefCell<Vec<Duration>>>,
}

impl ImmediateLaunchTimer {
    /// Delays requested so far, in call order.
    pub fn requested(&self) -> Vec<Duration> {
        self.requested.borrow().clone()
    }
}

impl LaunchTimer for ImmediateLaunchTimer {
    fn sleep<'a>(&'a self, duration: Duration) -> LaunchTimerFuture<'a> {
        self.requested.borrow_mut().push(duration);
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tokio_timer_waits_without_a_tokio_runtime() {
        let started = std::time::Instant::now();
        block_on(TokioLaunchTimer.sleep(Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_uses_the_runtime_clock() {
        let started = tokio::time::Instant::now();
        TokioLaunchTimer.sleep(Duration::from_millis(300)).await;
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn immediate_timer_records_requested_delays() {
        let timer = ImmediateLaunchTimer::default();
        block_on(timer.sleep(Duration::from_millis(300)));
        block_on(timer.sleep(Duration::from_millis(10)));
        assert_eq!(
            timer.requested(),
            vec![Duration::from_millis(300), Duration::from_millis(10)]
        );
    }
}
