//! Recording doubles for the wallet, the contracts and the UI surface.

use crate::config::DashboardConfig;
use crate::controller::DashboardController;
use crate::ui::{Button, ButtonState, Label, Panel, UiSurface};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use dg_api_types::{Address, TokenAmount, TxHash, TxReceipt};
use dg_chain_client::{
    ContractAddresses, ContractHandles, PendingTx, RpcError, SignerHandle, TokenContract,
    TransactionReverted, USER_REJECTED_CODE, VaultContract, WalletProvider,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub const USER: Address = Address::from_literal("0x1111111111111111111111111111111111111111");

/// Chain state and failure switches shared by every double.
#[derive(Default)]
pub struct FakeChain {
    calls: RefCell<Vec<String>>,
    pub decimals: Cell<u8>,
    pub balance: Cell<u128>,
    pub staked: Cell<u128>,
    pub rewards: Cell<u128>,
    pub reject_accounts: Cell<bool>,
    pub reject_submissions: Cell<bool>,
    pub revert_on_wait: Cell<bool>,
    pub fail_reads: Cell<bool>,
}

impl FakeChain {
    fn new() -> Self {
        let chain = Self::default();
        chain.decimals.set(18);
        chain
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn read(&self, call: &str, value: u128) -> Result<TokenAmount> {
        self.record(call);
        if self.fail_reads.get() {
            return Err(anyhow!("{call}: execution timeout"));
        }
        Ok(TokenAmount::from_u128(value))
    }

    fn submit(self: &Rc<Self>, call: String, label: &'static str) -> Result<Box<dyn PendingTx>> {
        self.record(call);
        if self.reject_submissions.get() {
            return Err(RpcError {
                code: USER_REJECTED_CODE,
                message: "User denied transaction signature.".to_owned(),
            }
            .into());
        }
        Ok(Box::new(FakeTx {
            chain: Rc::clone(self),
            hash: TxHash(format!("0x{label}")),
            label,
        }))
    }
}

struct FakeTx {
    chain: Rc<FakeChain>,
    hash: TxHash,
    label: &'static str,
}

#[async_trait(?Send)]
impl PendingTx for FakeTx {
    fn tx_hash(&self) -> &TxHash {
        &self.hash
    }

    async fn wait(&self) -> Result<TxReceipt> {
        self.chain.record(format!("wait {}", self.label));
        tokio::task::yield_now().await;
        if self.chain.revert_on_wait.get() {
            return Err(TransactionReverted(self.hash.clone()).into());
        }
        Ok(TxReceipt {
            tx_hash: self.hash.clone(),
            block_number: Some(1),
        })
    }
}

struct FakeToken {
    chain: Rc<FakeChain>,
    address: Address,
}

#[async_trait(?Send)]
impl TokenContract for FakeToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn approve(&self, spender: &Address, amount: TokenAmount) -> Result<Box<dyn PendingTx>> {
        self.chain
            .submit(format!("token.approve {spender} {amount}"), "approve")
    }

    async fn balance_of(&self, _owner: &Address) -> Result<TokenAmount> {
        self.chain.read("token.balance_of", self.chain.balance.get())
    }

    async fn decimals(&self) -> Result<u8> {
        self.chain.record("token.decimals");
        if self.chain.fail_reads.get() {
            return Err(anyhow!("decimals: execution timeout"));
        }
        Ok(self.chain.decimals.get())
    }
}

struct FakeVault {
    chain: Rc<FakeChain>,
    address: Address,
}

#[async_trait(?Send)]
impl VaultContract for FakeVault {
    fn address(&self) -> Address {
        self.address
    }

    async fn stake(&self, amount: TokenAmount) -> Result<Box<dyn PendingTx>> {
        self.chain.submit(format!("vault.stake {amount}"), "stake")
    }

    async fn unstake(&self, amount: TokenAmount) -> Result<Box<dyn PendingTx>> {
        self.chain.submit(format!("vault.unstake {amount}"), "unstake")
    }

    async fn claim(&self) -> Result<Box<dyn PendingTx>> {
        self.chain.submit("vault.claim".to_owned(), "claim")
    }

    async fn staked_of(&self, _account: &Address) -> Result<TokenAmount> {
        self.chain.read("vault.staked_of", self.chain.staked.get())
    }

    async fn pending_rewards(&self, _account: &Address) -> Result<TokenAmount> {
        self.chain.read("vault.pending_rewards", self.chain.rewards.get())
    }
}

struct FakeWallet {
    chain: Rc<FakeChain>,
}

#[async_trait(?Send)]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.chain.record("request_accounts");
        if self.chain.reject_accounts.get() {
            return Err(RpcError {
                code: USER_REJECTED_CODE,
                message: "User rejected the request.".to_owned(),
            }
            .into());
        }
        Ok(vec![USER])
    }

    async fn signer(&self) -> Result<SignerHandle> {
        self.chain.record("signer");
        Ok(SignerHandle { address: USER })
    }

    fn bind_contracts(&self, _signer: &SignerHandle, addresses: &ContractAddresses) -> ContractHandles {
        self.chain.record("bind_contracts");
        ContractHandles::new(
            Rc::new(FakeToken {
                chain: Rc::clone(&self.chain),
                address: addresses.token,
            }),
            Rc::new(FakeVault {
                chain: Rc::clone(&self.chain),
                address: addresses.vault,
            }),
        )
    }
}

pub struct FakeUi {
    buttons: RefCell<HashMap<Button, ButtonState>>,
    labels: RefCell<HashMap<Label, String>>,
    panels: RefCell<HashMap<Panel, bool>>,
    input: RefCell<String>,
    alerts: RefCell<Vec<String>>,
    history: RefCell<Vec<(Button, ButtonState)>>,
    reloads: Cell<u32>,
}

impl Default for FakeUi {
    fn default() -> Self {
        let buttons = [
            (Button::Connect, "Connect Wallet"),
            (Button::Stake, "Stake"),
            (Button::Unstake, "Unstake"),
            (Button::Claim, "Claim Rewards"),
        ]
        .into_iter()
        .map(|(button, label)| (button, ButtonState::new(label, false)))
        .collect();

        Self {
            buttons: RefCell::new(buttons),
            labels: RefCell::default(),
            panels: RefCell::default(),
            input: RefCell::default(),
            alerts: RefCell::default(),
            history: RefCell::default(),
            reloads: Cell::new(0),
        }
    }
}

impl FakeUi {
    pub fn set_input(&self, value: &str) {
        *self.input.borrow_mut() = value.to_owned();
    }

    pub fn input(&self) -> String {
        self.input.borrow().clone()
    }

    pub fn button(&self, button: Button) -> ButtonState {
        self.button_state(button)
    }

    pub fn label(&self, label: Label) -> Option<String> {
        self.labels.borrow().get(&label).cloned()
    }

    pub fn panel(&self, panel: Panel) -> Option<bool> {
        self.panels.borrow().get(&panel).copied()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    /// Every state change on the action buttons, in order.
    pub fn button_history(&self) -> Vec<(Button, ButtonState)> {
        self.history
            .borrow()
            .iter()
            .filter(|(button, _)| *button != Button::Connect)
            .cloned()
            .collect()
    }

    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }

    fn reset_records(&self) {
        self.alerts.borrow_mut().clear();
        self.history.borrow_mut().clear();
    }
}

impl UiSurface for FakeUi {
    fn button_state(&self, button: Button) -> ButtonState {
        self.buttons
            .borrow()
            .get(&button)
            .cloned()
            .unwrap_or_else(|| ButtonState::new("", false))
    }

    fn set_button_state(&self, button: Button, state: &ButtonState) {
        self.history.borrow_mut().push((button, state.clone()));
        self.buttons.borrow_mut().insert(button, state.clone());
    }

    fn set_label(&self, label: Label, text: &str) {
        self.labels.borrow_mut().insert(label, text.to_owned());
    }

    fn set_panel_visible(&self, panel: Panel, visible: bool) {
        self.panels.borrow_mut().insert(panel, visible);
    }

    fn amount_input(&self) -> String {
        self.input()
    }

    fn clear_amount_input(&self) {
        self.input.borrow_mut().clear();
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

pub struct Harness {
    pub chain: Rc<FakeChain>,
    pub ui: Rc<FakeUi>,
    pub controller: DashboardController,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(true)
    }

    pub fn without_provider() -> Self {
        Self::build(false)
    }

    /// A harness that has already connected, with call and alert logs cleared.
    pub async fn connected() -> Self {
        let harness = Self::new();
        harness
            .controller
            .connect()
            .await
            .expect("fake wallet connects");
        harness.chain.clear_calls();
        harness.ui.reset_records();
        harness
    }

    fn build(with_provider: bool) -> Self {
        let chain = Rc::new(FakeChain::new());
        let ui = Rc::new(FakeUi::default());
        let provider: Option<Rc<dyn WalletProvider>> = with_provider.then(|| {
            Rc::new(FakeWallet {
                chain: Rc::clone(&chain),
            }) as Rc<dyn WalletProvider>
        });
        let controller = DashboardController::new(
            DashboardConfig::default(),
            provider,
            Rc::clone(&ui) as Rc<dyn UiSurface>,
        );
        Self { chain, ui, controller }
    }

    pub fn calls(&self) -> Vec<String> {
        self.chain.calls.borrow().clone()
    }
}
