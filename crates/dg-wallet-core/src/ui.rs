//! The host-rendered surface the controller drives.
//!
//! The controller only reads and writes element text, the disabled flag of
//! buttons and panel visibility. Anything else stays on the host side.

use dg_api_types::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Connect,
    Stake,
    Unstake,
    Claim,
}

impl Button {
    pub fn for_action(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Stake => Self::Stake,
            ActionKind::Unstake => Self::Unstake,
            ActionKind::Claim => Self::Claim,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    WalletAddress,
    WalletBalance,
    Staked,
    Rewards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Staking,
    ConnectPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label: String,
    pub disabled: bool,
}

impl ButtonState {
    pub fn new(label: impl Into<String>, disabled: bool) -> Self {
        Self {
            label: label.into(),
            disabled,
        }
    }
}

pub trait UiSurface {
    fn button_state(&self, button: Button) -> ButtonState;
    fn set_button_state(&self, button: Button, state: &ButtonState);
    fn set_label(&self, label: Label, text: &str);
    fn set_panel_visible(&self, panel: Panel, visible: bool);
    fn amount_input(&self) -> String;
    fn clear_amount_input(&self);
    fn alert(&self, message: &str);
    /// Throw away all application state and start over.
    fn reload(&self);
}

/// Shows a busy button for as long as it lives; restores the captured state on drop.
pub struct ButtonGuard<'a> {
    ui: &'a dyn UiSurface,
    button: Button,
    saved: ButtonState,
}

impl<'a> ButtonGuard<'a> {
    pub fn engage(ui: &'a dyn UiSurface, button: Button, busy_label: &str) -> Self {
        let saved = ui.button_state(button);
        ui.set_button_state(button, &ButtonState::new(busy_label, true));
        Self { ui, button, saved }
    }
}

impl Drop for ButtonGuard<'_> {
    fn drop(&mut self) {
        self.ui.set_button_state(self.button, &self.saved);
    }
}
