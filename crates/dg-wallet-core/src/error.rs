use dg_api_types::{ActionKind, AmountError};

pub const INSTALL_WALLET_MESSAGE: &str = "Please install MetaMask to use this feature.";
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect wallet. Please try again.";
pub const NOT_CONNECTED_MESSAGE: &str = "Please connect your wallet first.";

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("no wallet provider detected")]
    ProviderUnavailable,
    #[error("user rejected the wallet request")]
    UserRejected(#[source] anyhow::Error),
    #[error("wallet connection failed")]
    ConnectFailed(#[source] anyhow::Error),
    #[error("invalid amount")]
    InvalidAmount(#[from] AmountError),
    #[error("{kind} transaction failed")]
    TransactionFailed {
        kind: ActionKind,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to read dashboard values")]
    ReadFailure(#[source] anyhow::Error),
    #[error("wallet is not connected")]
    NotConnected,
    #[error("{0} already in progress")]
    ActionInProgress(ActionKind),
    #[error("session was reset by an account or network change")]
    SessionReset,
}

impl ControllerError {
    /// Alert text for the user, or `None` when the failure is only logged.
    /// `action` is the handler the error came from; `None` means connect.
    pub fn user_message(&self, action: Option<ActionKind>) -> Option<&'static str> {
        match self {
            Self::ProviderUnavailable => Some(INSTALL_WALLET_MESSAGE),
            Self::NotConnected => Some(NOT_CONNECTED_MESSAGE),
            Self::InvalidAmount(_) => Some(action.map_or("Please enter a valid amount.", ActionKind::invalid_amount_message)),
            Self::UserRejected(_) | Self::ConnectFailed(_) | Self::TransactionFailed { .. } => {
                Some(action.map_or(CONNECT_FAILED_MESSAGE, ActionKind::failure_message))
            }
            Self::ReadFailure(_) | Self::ActionInProgress(_) | Self::SessionReset => None,
        }
    }
}
