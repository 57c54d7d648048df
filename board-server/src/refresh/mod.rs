//! Keeping the board fresh.
//!
//! A refresh cycle fetches the boards for the current direction and runs
//! the engine over them. The [`Scheduler`] decides when cycles run and
//! publishes their results into the [`Session`], discarding any that a
//! newer cycle has superseded.

mod cycle;
mod scheduler;
mod session;
mod source;
mod store;

pub use cycle::{CycleError, run_cycle};
pub use scheduler::{Clock, Scheduler, SchedulerConfig, Trigger};
pub use session::{CycleOutcome, Session};
pub use source::{BoardSource, Upstream};
pub use store::{DirectionStore, FileDirectionStore, MemoryDirectionStore, StoreError};
