//! Runtime layer for the bot dashboard.
//!
//! Owns the client-side view of the remote bot: the monitoring session
//! coordinator with its cooldown and status poller, the logs feed and the
//! accounts roster. Everything here is generic over [`MonitorApi`] so it can
//! run against the HTTP client or an in-memory backend.
//!
//! [`MonitorApi`]: dashboard_api::MonitorApi

pub mod accounts;
pub mod cooldown;
pub mod error;
pub mod logs;
pub mod poller;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use dashboard_api as api;
pub use dashboard_core as core;
pub use error::SessionError;
