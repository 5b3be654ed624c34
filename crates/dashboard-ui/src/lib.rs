//! Terminal UI layer for the bot dashboard.
//!
//! Provides themes, the header, indicator, progress-bar and popup
//! components, the dashboard, logs and accounts views, the draft and account
//! form editors, and the application event loop built on top of [`ratatui`].

pub mod accounts_view;
pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod forms;
pub mod logs_view;
pub mod themes;

pub use dashboard_core as core;
