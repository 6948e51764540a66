//! # Shared Connect Four
//!
//! A two-player Connect Four game for the terminal. Several running
//! instances can show the same game: every move is written to a shared
//! key-value store, and each instance picks up the moves of the others.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, players, session transitions
//! - [`sync`] — Game ids, shared stores, stored format, change propagation
//! - [`ui`] — Terminal UI: lobby, board view, win celebration
//! - [`config`] — TOML configuration loading and validation
//! - [`logging`] — File-based tracing setup
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod sync;
pub mod ui;
