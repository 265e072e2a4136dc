//! pomotui - terminal client for server-backed focus sessions
//!
//! This library provides the core functionality for the pomotui application.

pub mod api;
pub mod app;
pub mod config;
pub mod focus_timing;
pub mod input;
pub mod logging;
pub mod tui;
