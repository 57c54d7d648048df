//! Two-station departure board server.
//!
//! Shows the next few trains between home and the city, ranked by when
//! they actually get you there rather than when they leave, using live
//! departure and arrival boards from Huxley2.

pub mod config;
pub mod darwin;
pub mod domain;
pub mod engine;
pub mod refresh;
pub mod web;
