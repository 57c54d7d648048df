//! Web layer for the departure board.
//!
//! Serves the board page and a small JSON API for refreshing it,
//! switching direction and reporting page visibility.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
