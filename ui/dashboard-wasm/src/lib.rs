//! Digna staking dashboard, browser entry point.
//!
//! Binds the page, finds the injected wallet and hands both to the
//! `DashboardController`. Each concern lives in its own module.

pub mod console_log;
pub mod dom;
pub mod events;
pub mod provider;
pub mod surface;

use dg_chain_client::WalletProvider;
use dg_chain_evm::EvmWallet;
use dg_wallet_core::{DashboardConfig, DashboardController, UiSurface};
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init().await
}

/// Page config override, or the built-in deployment when absent or invalid.
fn load_config() -> (DashboardConfig, Option<anyhow::Error>) {
    match dom::config_script_text() {
        None => (DashboardConfig::default(), None),
        Some(raw) => match DashboardConfig::from_json(&raw) {
            Ok(config) => (config, None),
            Err(err) => (DashboardConfig::default(), Some(err)),
        },
    }
}

async fn init() -> Result<(), JsValue> {
    let (config, config_error) = load_config();
    console_log::init(config.log_filter());
    if let Some(err) = config_error {
        warn!(error = ?err, "ignoring #{}, using defaults", dom::CONFIG_SCRIPT_ID);
    }

    let els = dom::Elements::bind()?;

    let ethereum = provider::InjectedEthereum::detect();
    let wallet = ethereum.clone().map(|eth| {
        Rc::new(EvmWallet::new(eth, config.receipt_poll_interval()))
            as Rc<dyn WalletProvider>
    });
    if wallet.is_none() {
        info!("no injected wallet provider");
    }

    info!(
        token = %config.token_address,
        vault = %config.vault_address,
        "dashboard ready"
    );

    let surface = Rc::new(surface::DomSurface::new(els.clone())) as Rc<dyn UiSurface>;
    let controller = Rc::new(DashboardController::new(config, wallet, surface));

    events::bind_events(&els, &controller)?;
    if let Some(eth) = &ethereum {
        events::bind_wallet_events(eth, &controller)?;
    }

    Ok(())
}
