//! Ordered steps for each vault action.
//!
//! Approval must be mined before the stake is submitted: the vault pulls
//! tokens against the on-chain allowance.

use dg_api_types::ActionKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStep {
    /// Parse the amount input. Never touches the network.
    Validate,
    ReadDecimals,
    Approve,
    ConfirmApproval,
    Submit,
    Confirm,
    /// Confirmation alert, input reset and display refresh.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPhase {
    #[default]
    Idle,
    Validating,
    Approving,
    Submitting,
    Confirming,
}

impl ActionStep {
    pub fn phase(self) -> ActionPhase {
        match self {
            Self::Validate | Self::ReadDecimals => ActionPhase::Validating,
            Self::Approve | Self::ConfirmApproval => ActionPhase::Approving,
            Self::Submit => ActionPhase::Submitting,
            Self::Confirm | Self::Refresh => ActionPhase::Confirming,
        }
    }

    pub fn touches_network(self) -> bool {
        !matches!(self, Self::Validate)
    }
}

impl fmt::Display for ActionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Approving => "approving",
            Self::Submitting => "submitting",
            Self::Confirming => "confirming",
        };
        f.write_str(name)
    }
}

/// The step list for one action kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPipeline {
    steps: Vec<ActionStep>,
}

impl ActionPipeline {
    pub fn for_kind(kind: ActionKind) -> Self {
        let mut steps = Vec::with_capacity(7);
        if kind.takes_amount() {
            steps.extend([ActionStep::Validate, ActionStep::ReadDecimals]);
        }
        if kind.needs_approval() {
            steps.extend([ActionStep::Approve, ActionStep::ConfirmApproval]);
        }
        steps.extend([ActionStep::Submit, ActionStep::Confirm, ActionStep::Refresh]);
        Self { steps }
    }

    pub fn steps(&self) -> &[ActionStep] {
        &self.steps
    }
}
