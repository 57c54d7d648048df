//! Application state for the web layer.

use crate::refresh::{Scheduler, Upstream};

/// Shared application state.
///
/// The scheduler owns the session; handlers only read snapshots of it or
/// ask it to refresh.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Scheduler<Upstream>,
}

impl AppState {
    pub fn new(scheduler: Scheduler<Upstream>) -> Self {
        Self { scheduler }
    }
}
