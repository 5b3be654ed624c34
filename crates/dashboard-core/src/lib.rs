//! Core types for the bot dashboard.
//!
//! Holds the data model shared with the remote backend, the error type,
//! CLI settings, log classification and analysis-CSV parsing, and display
//! formatting helpers.

pub mod error;
pub mod formatting;
pub mod logs;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
