//! DOM element bindings.
//!
//! All fields are resolved once at startup. A missing element aborts
//! initialisation with the offending id.

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement};

pub const HIDDEN_CLASS: &str = "hidden";
pub const CONFIG_SCRIPT_ID: &str = "dashboardConfig";

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

#[derive(Clone)]
pub struct Elements {
    pub connect_wallet: HtmlButtonElement,
    pub staking_panel: Element,
    pub connect_prompt: Element,

    // Account display
    pub wallet_address_display: Element,
    pub dgn_balance: Element,
    pub user_staked: Element,
    pub user_rewards: Element,

    // Actions
    pub stake_amount: HtmlInputElement,
    pub stake_btn: HtmlButtonElement,
    pub unstake_btn: HtmlButtonElement,
    pub claim_btn: HtmlButtonElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_button {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

impl Elements {
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            connect_wallet: get_button!("connectWallet"),
            staking_panel: get_el!("stakingPanel"),
            connect_prompt: get_el!("connectPrompt"),
            wallet_address_display: get_el!("walletAddressDisplay"),
            dgn_balance: get_el!("dgnBalance"),
            user_staked: get_el!("userStaked"),
            user_rewards: get_el!("userRewards"),
            stake_amount: get_input!("stakeAmount"),
            stake_btn: get_button!("stakeBtn"),
            unstake_btn: get_button!("unstakeBtn"),
            claim_btn: get_button!("claimBtn"),
        })
    }
}

/// Text of the optional `<script type="application/json" id="dashboardConfig">`.
pub fn config_script_text() -> Option<String> {
    by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
        .filter(|text| !text.trim().is_empty())
}
