//! The injected `window.ethereum` provider.
//!
//! Requests go through `provider.request({ method, params })`. Rejections
//! carry an EIP-1193 `{ code, message }` object, which is turned into
//! `RpcError` so the controller can tell a declined prompt from a failure.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use dg_api_types::Address;
use dg_chain_client::RpcError;
use dg_chain_evm::Eip1193;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[derive(Serialize)]
struct RequestArgs<'a> {
    method: &'a str,
    params: &'a Value,
}

#[derive(Clone)]
pub struct InjectedEthereum {
    inner: JsValue,
}

impl InjectedEthereum {
    /// `None` when no wallet extension injected a provider.
    pub fn detect() -> Option<Self> {
        let inner = Reflect::get(&gloo_utils::window(), &JsValue::from_str("ethereum")).ok()?;
        if inner.is_undefined() || inner.is_null() {
            return None;
        }
        Some(Self { inner })
    }

    fn method(&self, name: &str) -> Result<Function, JsValue> {
        Reflect::get(&self.inner, &JsValue::from_str(name))?
            .dyn_into::<Function>()
            .map_err(|_| JsValue::from_str(&format!("provider has no {name}()")))
    }

    /// Registers `handler` for a provider notification for the lifetime of the page.
    pub fn on(&self, event: &str, handler: impl FnMut(JsValue) + 'static) -> Result<(), JsValue> {
        let on = self.method("on")?;
        let cb = Closure::<dyn FnMut(JsValue)>::new(handler);
        on.call2(&self.inner, &JsValue::from_str(event), cb.as_ref().unchecked_ref())?;
        cb.forget();
        Ok(())
    }
}

#[async_trait(?Send)]
impl Eip1193 for InjectedEthereum {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        debug!(method, "provider request");
        let args = RequestArgs {
            method,
            params: &params,
        }
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| anyhow!("cannot encode {method} params: {e}"))?;

        let request = self
            .method("request")
            .map_err(|e| anyhow!("{e:?}"))?;
        let promise: Promise = request
            .call1(&self.inner, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("{method} did not return a promise"))?;

        let result = JsFuture::from(promise).await.map_err(js_error)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| anyhow!("cannot decode {method} result: {e}"))
    }

    async fn pause(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

fn js_error(err: JsValue) -> anyhow::Error {
    let field = |name: &str| Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code").and_then(|v| v.as_f64());
    let message = field("message").and_then(|v| v.as_string());
    provider_error(code, message.unwrap_or_else(|| format!("{err:?}")))
}

fn provider_error(code: Option<f64>, message: String) -> anyhow::Error {
    match code {
        Some(code) if code.fract() == 0.0 => RpcError {
            code: code as i64,
            message,
        }
        .into(),
        _ => anyhow!("provider request failed: {message}"),
    }
}

/// Addresses from an `accountsChanged` payload. Entries that do not parse are dropped.
pub fn accounts_from_payload(raw: Vec<String>) -> Vec<Address> {
    raw.iter()
        .filter_map(|a| match Address::parse(a) {
            Ok(address) => Some(address),
            Err(err) => {
                warn!(account = %a, %err, "ignoring malformed account");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_chain_client::is_user_rejection;

    #[test]
    fn rejection_code_survives_conversion() {
        let err = provider_error(Some(4001.0), "User rejected the request.".to_owned());
        assert!(is_user_rejection(&err));

        let other = provider_error(Some(-32603.0), "Internal JSON-RPC error.".to_owned());
        assert!(!is_user_rejection(&other));
        assert!(other.to_string().contains("Internal JSON-RPC error."));
    }

    #[test]
    fn errors_without_a_code_are_plain_failures() {
        let err = provider_error(None, "boom".to_owned());
        assert!(!is_user_rejection(&err));
        assert_eq!(err.to_string(), "provider request failed: boom");
    }

    #[test]
    fn malformed_accounts_are_dropped() {
        let accounts = accounts_from_payload(vec![
            "0x1111111111111111111111111111111111111111".to_owned(),
            "not-an-address".to_owned(),
        ]);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].to_string(), "0x1111111111111111111111111111111111111111");
        assert!(accounts_from_payload(Vec::new()).is_empty());
    }
}
