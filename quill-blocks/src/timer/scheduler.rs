//! Live view scheduler - drives countdown snapshots on a fixed cadence.
//!
//! `Idle -> Running -> Stopped`. The first snapshot is delivered inside
//! `start`; later ones come from a task on the ambient tokio runtime. Ticks
//! deliver while holding the shared lock and `stop` takes that lock to drop
//! the callbacks, so nothing fires once `stop` has returned.
//!
//! Callbacks run under that lock and must not call back into the scheduler.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use quill_api::CountdownSnapshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::countdown::compute_snapshot;
use crate::config::SchedulerConfig;
use crate::host::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

type TickFn = Box<dyn FnMut(CountdownSnapshot) + Send>;
type ExpireFn = Box<dyn FnOnce() + Send>;

struct Callbacks {
    on_tick: TickFn,
    on_expire: Option<ExpireFn>,
}

struct Shared {
    state: SchedulerState,
    /// Bumped on every start/stop; a tick task only delivers for its own run.
    generation: u64,
    callbacks: Option<Callbacks>,
}

impl Shared {
    fn halt(&mut self) {
        self.state = SchedulerState::Stopped;
        self.callbacks = None;
    }

    /// Deliver one snapshot. Returns whether the run continues.
    fn deliver(&mut self, snapshot: Option<CountdownSnapshot>) -> bool {
        let Some(callbacks) = self.callbacks.as_mut() else {
            return false;
        };

        match snapshot {
            None => {
                self.halt();
                false
            }
            Some(CountdownSnapshot::Expired) => {
                tracing::debug!("countdown expired");
                if let Some(on_expire) = callbacks.on_expire.take() {
                    on_expire();
                }
                self.halt();
                false
            }
            Some(CountdownSnapshot::Invalid) => {
                (callbacks.on_tick)(CountdownSnapshot::Invalid);
                self.halt();
                false
            }
            Some(snapshot) => {
                tracing::trace!(?snapshot, "countdown tick");
                (callbacks.on_tick)(snapshot);
                true
            }
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Recurring countdown driver. At most one run is active at a time.
pub struct LiveViewScheduler {
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    shared: Arc<Mutex<Shared>>,
    task: Option<JoinHandle<()>>,
}

impl LiveViewScheduler {
    pub fn new(clock: Arc<dyn Clock>, config: &SchedulerConfig) -> Self {
        Self {
            clock,
            tick_interval: config.tick_interval,
            shared: Arc::new(Mutex::new(Shared {
                state: SchedulerState::Idle,
                generation: 0,
                callbacks: None,
            })),
            task: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        lock(&self.shared).state
    }

    /// Start counting down to `deadline`, replacing any run in progress.
    ///
    /// `on_tick` receives every remaining-time snapshot (or a single
    /// `Invalid`), `on_expire` fires once when the deadline passes. An empty
    /// deadline leaves the scheduler stopped without calling either.
    pub fn start<T, E>(&mut self, deadline: &str, on_tick: T, on_expire: E)
    where
        T: FnMut(CountdownSnapshot) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.stop();

        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.state = SchedulerState::Running;
            shared.callbacks = Some(Callbacks {
                on_tick: Box::new(on_tick),
                on_expire: Some(Box::new(on_expire)),
            });

            let first = compute_snapshot(deadline, self.clock.now());
            if !shared.deliver(first) {
                return;
            }
            shared.generation
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no tokio runtime; countdown will not refresh");
            lock(&self.shared).halt();
            return;
        };

        tracing::debug!(deadline, generation, "countdown started");
        self.task = Some(runtime.spawn(run_ticks(
            Arc::clone(&self.shared),
            Arc::clone(&self.clock),
            deadline.to_string(),
            generation,
            self.tick_interval,
        )));
    }

    /// Stop the current run, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        {
            let mut shared = lock(&self.shared);
            if shared.state == SchedulerState::Running {
                tracing::debug!(generation = shared.generation, "countdown stopped");
            }
            shared.generation += 1;
            shared.halt();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for LiveViewScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticks(
    shared: Arc<Mutex<Shared>>,
    clock: Arc<dyn Clock>,
    deadline: String,
    generation: u64,
    period: Duration,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let snapshot = compute_snapshot(&deadline, clock.now());

        let mut shared = lock(&shared);
        if shared.generation != generation || !shared.deliver(snapshot) {
            return;
        }
    }
}
