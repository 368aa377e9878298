use std::sync::{Arc, Mutex};

use tokio::task::AbortHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// Errors for timer misuse. These indicate programmer error, not an
/// environmental condition, so they are never absorbed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer is already paused")]
    AlreadyPaused,

    #[error("cannot resume a timer that is not paused")]
    NotPaused,

    #[error("cannot call {0} on a destroyed timer")]
    Destroyed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Paused,
    Destroyed,
}

struct TimerShared {
    state: TimerState,
    started_at: Instant,
    paused_at: Option<Instant>,
    /// Cumulative time spent paused, excluded from elapsed readings.
    offset: Duration,
}

impl TimerShared {
    fn elapsed(&self) -> Duration {
        let reference = match (self.state, self.paused_at) {
            (TimerState::Paused, Some(paused_at)) => paused_at,
            _ => Instant::now(),
        };
        reference.saturating_duration_since(self.started_at) - self.offset
    }
}

/// A cancellable countdown that reports elapsed time at a fixed tick rate.
///
/// The timer starts running at construction and invokes its callback with
/// `now - started_at - paused_time` on every tick. While paused the tick
/// task keeps firing but the callback is suppressed, so resuming never
/// drifts. On the tick where the elapsed reading reaches the configured
/// duration the callback is invoked one final time and the timer destroys
/// itself.
pub struct PausableTimer {
    shared: Arc<Mutex<TimerShared>>,
    task: AbortHandle,
}

impl PausableTimer {
    /// Start a timer for `duration`, ticking roughly every `tick_interval`.
    ///
    /// Must be called from within a tokio runtime; the tick loop runs on a
    /// spawned task.
    pub fn spawn<F>(duration: Duration, tick_interval: Duration, on_tick: F) -> Self
    where
        F: Fn(Duration) + Send + 'static,
    {
        let shared = Arc::new(Mutex::new(TimerShared {
            state: TimerState::Running,
            started_at: Instant::now(),
            paused_at: None,
            offset: Duration::ZERO,
        }));

        let task = tokio::spawn({
            let shared = Arc::clone(&shared);
            async move {
                let mut ticker = time::interval(tick_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // The first interval tick completes immediately; skip it so
                // readings line up on tick boundaries.
                ticker.tick().await;

                loop {
                    ticker.tick().await;

                    let elapsed = {
                        let shared = shared.lock().unwrap();
                        match shared.state {
                            TimerState::Destroyed => break,
                            TimerState::Paused => continue,
                            TimerState::Running => shared.elapsed(),
                        }
                    };

                    // The callback runs without holding the timer lock, so
                    // it may freely pause or destroy this timer.
                    on_tick(elapsed);

                    if elapsed >= duration {
                        shared.lock().unwrap().state = TimerState::Destroyed;
                        debug!(?duration, "timer completed");
                        break;
                    }
                }
            }
        })
        .abort_handle();

        Self { shared, task }
    }

    pub fn state(&self) -> TimerState {
        self.shared.lock().unwrap().state
    }

    /// Elapsed running time, excluding time spent paused.
    pub fn elapsed(&self) -> Duration {
        self.shared.lock().unwrap().elapsed()
    }

    /// Suspend tick callbacks. Valid only while running.
    pub fn pause(&self) -> Result<(), TimerError> {
        let mut shared = self.shared.lock().unwrap();
        match shared.state {
            TimerState::Paused => Err(TimerError::AlreadyPaused),
            TimerState::Destroyed => Err(TimerError::Destroyed("pause")),
            TimerState::Running => {
                shared.state = TimerState::Paused;
                shared.paused_at = Some(Instant::now());
                Ok(())
            }
        }
    }

    /// Resume tick callbacks, folding the pause duration into the offset so
    /// elapsed readings stay continuous. Valid only while paused.
    pub fn resume(&self) -> Result<(), TimerError> {
        let mut shared = self.shared.lock().unwrap();
        match shared.state {
            TimerState::Destroyed => Err(TimerError::Destroyed("resume")),
            TimerState::Running => Err(TimerError::NotPaused),
            TimerState::Paused => {
                shared.state = TimerState::Running;
                if let Some(paused_at) = shared.paused_at.take() {
                    shared.offset += paused_at.elapsed();
                }
                Ok(())
            }
        }
    }

    /// Stop the timer and release the tick task. Idempotent.
    pub fn destroy(&self) {
        {
            let mut shared = self.shared.lock().unwrap();
            if shared.state == TimerState::Destroyed {
                return;
            }
            shared.state = TimerState::Destroyed;
        }
        self.task.abort();
    }
}

impl Drop for PausableTimer {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for PausableTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PausableTimer")
            .field("state", &self.state())
            .finish()
    }
}
