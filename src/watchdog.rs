use crate::session::{SessionTeardown, TeardownReason};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Handle on a session's idle watchdog task.
///
/// The task tears the session down when its deadline passes. Every activity
/// pushes the deadline forward; dropping the handle ends the task.
#[derive(Debug)]
pub struct IdleWatchdog {
    deadline: watch::Sender<Option<Instant>>,
}

pub fn start_watchdog(timeout: Duration, teardown: Arc<SessionTeardown>) -> IdleWatchdog {
    let (deadline, mut rx) = watch::channel(Some(Instant::now() + timeout));

    tokio::spawn(async move {
        loop {
            let Some(current) = *rx.borrow_and_update() else {
                debug!("Idle watchdog stopped");
                return;
            };
            tokio::select! {
                _ = sleep_until(current) => {
                    info!("Idle timeout expired");
                    teardown.run(TeardownReason::IdleTimeout).await;
                    return;
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        // session gone
                        return;
                    }
                }
                _ = teardown.closed() => return,
            }
        }
    });

    IdleWatchdog { deadline }
}

impl IdleWatchdog {
    /// Re-arms the watchdog for `timeout` from now.
    pub fn reset(&self, timeout: Duration) {
        self.deadline.send_replace(Some(Instant::now() + timeout));
    }

    pub fn stop(&self) {
        self.deadline.send_replace(None);
    }
}
