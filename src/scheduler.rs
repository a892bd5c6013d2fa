//! Periodic recompute tasks.
//!
//! A `PeriodicTask` runs a callback on a fixed period on the tokio runtime.
//! The first call happens one period after spawn; callers compute their
//! initial state synchronously. Dropping the handle aborts the task, so a
//! view's timers stop when the view is torn down.

use std::time::Duration;

use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::logging::{log, obj, v_str, Domain, Level};

#[derive(Debug)]
pub struct PeriodicTask {
    name: String,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Must be called from inside a tokio runtime.
    pub fn spawn<F>(name: &str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick();
                log(
                    Level::Trace,
                    Domain::Scheduler,
                    "tick",
                    obj(&[("task", v_str(&task_name))]),
                );
            }
        });

        log(
            Level::Info,
            Domain::Scheduler,
            "registered",
            obj(&[
                ("task", v_str(name)),
                ("period_ms", json!(period.as_millis() as u64)),
            ]),
        );

        Self {
            name: name.to_string(),
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the task. Same as dropping the handle, but logged.
    pub fn cancel(self) {
        log(
            Level::Info,
            Domain::Scheduler,
            "cancelled",
            obj(&[("task", v_str(&self.name))]),
        );
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
