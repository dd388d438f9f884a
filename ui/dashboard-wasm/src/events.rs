//! Event binding.
//!
//! Button clicks and wallet notifications all become a `DashboardEvent`
//! dispatched to the controller on the local executor.

use crate::dom::Elements;
use crate::provider::{self, InjectedEthereum};
use dg_wallet_core::{DashboardController, DashboardEvent};
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn spawn_dispatch(controller: &Rc<DashboardController>, event: DashboardEvent) {
    let controller = Rc::clone(controller);
    wasm_bindgen_futures::spawn_local(async move {
        controller.dispatch(event).await;
    });
}

/// Helper: attach a click handler that dispatches a fixed event.
macro_rules! on_click_dispatch {
    ($el:expr, $controller:expr, $event:expr) => {{
        let controller = Rc::clone($controller);
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            spawn_dispatch(&controller, $event);
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind the connect and action buttons. Call once after init.
pub fn bind_events(els: &Elements, controller: &Rc<DashboardController>) -> Result<(), JsValue> {
    on_click_dispatch!(els.connect_wallet, controller, DashboardEvent::Connect);
    on_click_dispatch!(els.stake_btn, controller, DashboardEvent::Stake);
    on_click_dispatch!(els.unstake_btn, controller, DashboardEvent::Unstake);
    on_click_dispatch!(els.claim_btn, controller, DashboardEvent::Claim);
    Ok(())
}

/// Subscribe to account and network changes on the injected provider.
pub fn bind_wallet_events(
    ethereum: &InjectedEthereum,
    controller: &Rc<DashboardController>,
) -> Result<(), JsValue> {
    {
        let controller = Rc::clone(controller);
        ethereum.on("accountsChanged", move |payload: JsValue| {
            let raw: Vec<String> = serde_wasm_bindgen::from_value(payload).unwrap_or_else(|err| {
                warn!(%err, "unreadable accountsChanged payload");
                Vec::new()
            });
            let accounts = provider::accounts_from_payload(raw);
            debug!(count = accounts.len(), "accounts changed");
            spawn_dispatch(&controller, DashboardEvent::AccountsChanged(accounts));
        })?;
    }
    {
        let controller = Rc::clone(controller);
        ethereum.on("chainChanged", move |payload: JsValue| {
            let chain_id = payload.as_string().unwrap_or_default();
            debug!(%chain_id, "chain changed");
            spawn_dispatch(&controller, DashboardEvent::ChainChanged(chain_id));
        })?;
    }
    Ok(())
}
