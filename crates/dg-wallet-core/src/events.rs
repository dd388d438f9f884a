use dg_api_types::{ActionKind, Address};

/// Everything the controller reacts to: button clicks and wallet notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Connect,
    Stake,
    Unstake,
    Claim,
    /// Empty when the wallet disconnected.
    AccountsChanged(Vec<Address>),
    ChainChanged(String),
}

impl DashboardEvent {
    pub fn action(&self) -> Option<ActionKind> {
        match self {
            Self::Stake => Some(ActionKind::Stake),
            Self::Unstake => Some(ActionKind::Unstake),
            Self::Claim => Some(ActionKind::Claim),
            _ => None,
        }
    }

    pub fn resets_session(&self) -> bool {
        matches!(self, Self::AccountsChanged(_) | Self::ChainChanged(_))
    }
}
