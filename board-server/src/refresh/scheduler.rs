//! Refresh scheduling: triggers, periodic refresh, countdown ticker.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::{Mutex, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::{Direction, Route, london_now};
use crate::engine::EngineConfig;

use super::cycle::run_cycle;
use super::session::{CycleOutcome, Session};
use super::source::BoardSource;
use super::store::DirectionStore;

/// Why a refresh was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Manual,
    Periodic,
    VisibilityRegained,
    DirectionChanged,
}

/// Timing for the scheduler's background tasks.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between periodic refreshes
    pub refresh_interval: Duration,

    /// Time between countdown updates
    pub tick_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl SchedulerConfig {
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

/// Source of "now" in UK local time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Handles to the running background tasks.
#[derive(Default)]
struct Tasks {
    in_flight: Option<AbortHandle>,
    ticker: Option<JoinHandle<()>>,
    periodic: Option<JoinHandle<()>>,
    visible: bool,
}

struct Inner<S> {
    source: S,
    route: Route,
    engine: EngineConfig,
    timing: SchedulerConfig,
    session: RwLock<Session>,
    store: Arc<dyn DirectionStore>,
    clock: Clock,
    tasks: Mutex<Tasks>,
}

/// Owns the session and decides when refresh cycles run.
///
/// Cheap to clone; clones share the same session and tasks.
pub struct Scheduler<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Scheduler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: BoardSource + 'static> Scheduler<S> {
    /// Create a scheduler. No tasks run until [`Scheduler::start`].
    pub fn new(
        source: S,
        route: Route,
        session: Session,
        store: Arc<dyn DirectionStore>,
        engine: EngineConfig,
        timing: SchedulerConfig,
    ) -> Self {
        Self::with_clock(
            source,
            route,
            session,
            store,
            engine,
            timing,
            Arc::new(london_now),
        )
    }

    pub fn with_clock(
        source: S,
        route: Route,
        session: Session,
        store: Arc<dyn DirectionStore>,
        engine: EngineConfig,
        timing: SchedulerConfig,
        clock: Clock,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                route,
                engine,
                timing,
                session: RwLock::new(session),
                store,
                clock,
                tasks: Mutex::new(Tasks::default()),
            }),
        }
    }

    pub fn route(&self) -> &Route {
        &self.inner.route
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.inner.clock)()
    }

    /// A copy of the current session.
    pub async fn session(&self) -> Session {
        self.inner.session.read().await.clone()
    }

    /// Start periodic refreshes. The first one runs immediately.
    pub async fn start(&self) {
        let mut tasks = self.inner.tasks.lock().await;
        tasks.visible = true;
        self.restart_periodic(&mut tasks, Instant::now());
    }

    /// Stop every background task, including any in-flight refresh.
    pub async fn shutdown(&self) {
        let mut tasks = self.inner.tasks.lock().await;
        tasks.visible = false;
        if let Some(handle) = tasks.in_flight.take() {
            handle.abort();
        }
        stop(&mut tasks.periodic);
        stop(&mut tasks.ticker);
    }

    /// Run a refresh cycle now and wait for it.
    ///
    /// Any refresh already in flight is aborted. Returns the session as
    /// it stands afterwards; if this refresh was itself superseded, that
    /// reflects the newer one.
    pub async fn refresh(&self, trigger: Trigger) -> Session {
        let handle = {
            let mut tasks = self.inner.tasks.lock().await;
            if let Some(previous) = tasks.in_flight.take() {
                previous.abort();
            }

            let (generation, direction) = {
                let mut session = self.inner.session.write().await;
                (session.begin_refresh(), session.direction())
            };
            debug!(?trigger, generation, ?direction, "refresh started");

            let inner = Arc::clone(&self.inner);
            let handle = tokio::spawn(async move {
                let now = (inner.clock)();
                let outcome =
                    match run_cycle(&inner.source, &inner.route, direction, now, &inner.engine)
                        .await
                    {
                        Ok(trains) => CycleOutcome::Trains {
                            trains,
                            refreshed_at: now,
                        },
                        Err(e) => {
                            warn!(error = %e, generation, "refresh failed");
                            CycleOutcome::Failed {
                                message: e.to_string(),
                                refreshed_at: now,
                            }
                        }
                    };

                if !inner.session.write().await.publish(generation, outcome) {
                    debug!(generation, "refresh superseded, results dropped");
                }
            });
            tasks.in_flight = Some(handle.abort_handle());

            if tasks.visible {
                self.restart_ticker(&mut tasks);
            }
            handle
        };

        if let Err(e) = handle.await
            && !e.is_cancelled()
        {
            warn!(error = %e, "refresh task failed");
        }

        self.session().await
    }

    /// Switch to `direction`, or the other direction if `None`, save it,
    /// and refresh.
    pub async fn set_direction(&self, direction: Option<Direction>) -> Session {
        let direction = {
            let mut session = self.inner.session.write().await;
            let direction = direction.unwrap_or_else(|| session.direction().toggle());
            session.set_direction(direction);
            direction
        };
        info!(?direction, "direction changed");

        if let Err(e) = self.inner.store.save(direction) {
            warn!(error = %e, "couldn't save direction");
        }

        self.refresh(Trigger::DirectionChanged).await
    }

    /// Hiding the board suspends the periodic refresh and the countdown.
    /// Showing it again refreshes immediately and resumes both.
    pub async fn set_visible(&self, visible: bool) -> Session {
        {
            let mut tasks = self.inner.tasks.lock().await;
            if tasks.visible == visible {
                drop(tasks);
                return self.session().await;
            }
            tasks.visible = visible;

            if !visible {
                debug!("board hidden, suspending refresh");
                stop(&mut tasks.periodic);
                stop(&mut tasks.ticker);
                drop(tasks);
                return self.session().await;
            }

            let first = Instant::now() + self.inner.timing.refresh_interval;
            self.restart_periodic(&mut tasks, first);
        }

        self.refresh(Trigger::VisibilityRegained).await
    }

    pub async fn is_visible(&self) -> bool {
        self.inner.tasks.lock().await.visible
    }

    fn restart_periodic(&self, tasks: &mut Tasks, first: Instant) {
        stop(&mut tasks.periodic);

        let scheduler = self.clone();
        let period = self.inner.timing.refresh_interval;
        tasks.periodic = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                scheduler.refresh(Trigger::Periodic).await;
            }
        }));
    }

    fn restart_ticker(&self, tasks: &mut Tasks) {
        stop(&mut tasks.ticker);

        let inner = Arc::clone(&self.inner);
        tasks.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(inner.timing.tick_interval);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                tick(&inner).await;
            }
        }));
    }
}

async fn tick<S>(inner: &Inner<S>) {
    let now = (inner.clock)();
    inner
        .session
        .write()
        .await
        .tick(now, inner.engine.estimate_penalty_secs);
}

fn stop(task: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}
