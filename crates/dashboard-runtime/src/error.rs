use dashboard_api::ApiError;
use dashboard_core::DashboardError;
use thiserror::Error;

use crate::session::MonitorCommand;

/// Errors surfaced to the operator by runtime actions.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A start/stop was attempted while the post-command cooldown runs.
    #[error("Please wait {remaining} seconds before {} monitoring again", .command.gerund())]
    CooldownActive {
        command: MonitorCommand,
        remaining: u32,
    },

    /// Another start/stop request has not finished yet.
    #[error("A monitoring command is already in progress")]
    Busy,

    /// The backend answered a start/stop with a status this client does not
    /// recognise.
    #[error("Failed to {} monitoring: unexpected response status '{status}'", .command.verb())]
    UnexpectedResponse {
        command: MonitorCommand,
        status: String,
    },

    /// An account record failed client-side checks.
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}
