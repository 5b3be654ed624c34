//! Network layer for the bot dashboard.
//!
//! [`MonitorApi`] is the seam between the dashboard and the remote bot
//! backend; [`HttpApiClient`] implements it over `reqwest`.

pub mod client;
pub mod error;

pub use client::{HttpApiClient, MonitorApi};
pub use dashboard_core as core;
pub use error::{ApiError, ApiResult};
