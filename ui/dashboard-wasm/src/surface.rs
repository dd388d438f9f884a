use crate::dom::{self, Elements, HIDDEN_CLASS};
use dg_wallet_core::{Button, ButtonState, Label, Panel, UiSurface};
use tracing::warn;
use web_sys::{Element, HtmlButtonElement};

/// The live page, driven by the controller.
pub struct DomSurface {
    els: Elements,
}

impl DomSurface {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }

    fn button(&self, button: Button) -> &HtmlButtonElement {
        match button {
            Button::Connect => &self.els.connect_wallet,
            Button::Stake => &self.els.stake_btn,
            Button::Unstake => &self.els.unstake_btn,
            Button::Claim => &self.els.claim_btn,
        }
    }

    fn label(&self, label: Label) -> &Element {
        match label {
            Label::WalletAddress => &self.els.wallet_address_display,
            Label::WalletBalance => &self.els.dgn_balance,
            Label::Staked => &self.els.user_staked,
            Label::Rewards => &self.els.user_rewards,
        }
    }

    fn panel(&self, panel: Panel) -> &Element {
        match panel {
            Panel::Staking => &self.els.staking_panel,
            Panel::ConnectPrompt => &self.els.connect_prompt,
        }
    }
}

impl UiSurface for DomSurface {
    fn button_state(&self, button: Button) -> ButtonState {
        let el = self.button(button);
        ButtonState::new(el.text_content().unwrap_or_default(), el.disabled())
    }

    fn set_button_state(&self, button: Button, state: &ButtonState) {
        let el = self.button(button);
        dom::set_text(el, &state.label);
        el.set_disabled(state.disabled);
    }

    fn set_label(&self, label: Label, text: &str) {
        dom::set_text(self.label(label), text);
    }

    fn set_panel_visible(&self, panel: Panel, visible: bool) {
        dom::toggle_class(self.panel(panel), HIDDEN_CLASS, !visible);
    }

    fn amount_input(&self) -> String {
        self.els.stake_amount.value()
    }

    fn clear_amount_input(&self) {
        self.els.stake_amount.set_value("");
    }

    fn alert(&self, message: &str) {
        if let Err(err) = gloo_utils::window().alert_with_message(message) {
            warn!(?err, alert = message, "alert suppressed");
        }
    }

    fn reload(&self) {
        if let Err(err) = gloo_utils::window().location().reload() {
            warn!(?err, "page reload failed");
        }
    }
}
