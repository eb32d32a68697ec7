//! # Four in a Row
//!
//! A gravity-grid four-in-a-row game against a computer opponent. The
//! opponent runs a shallow heuristic search on a background thread so the
//! interactive loop stays responsive.
//!
//! ## Modules
//!
//! - [`game`]: Grid, gravity placement, win detection, match status
//! - [`ai`]: Heuristic evaluation, best-move search, background runner, agents
//! - [`app`]: The match control loop: human moves in, computer moves polled
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod game;
