//! CLI command handlers

pub mod commands;

pub use commands::{expense, export, income, run_session, session, show, years};
