use crate::config::DashboardConfig;
use crate::error::ControllerError;
use crate::events::DashboardEvent;
use crate::pipeline::{ActionPhase, ActionPipeline, ActionStep};
use crate::session::Session;
use crate::ui::{Button, ButtonGuard, ButtonState, Label, Panel, UiSurface};
use anyhow::anyhow;
use dg_api_types::{ActionKind, DecimalAmount, DisplaySnapshot, TokenAmount};
use dg_chain_client::{PendingTx, WalletProvider, is_user_rejection};
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Owns the wallet session and routes every dashboard event to its handler.
///
/// Single-threaded: all state sits behind `Cell`/`RefCell` and no borrow is
/// held across an await point.
pub struct DashboardController {
    config: DashboardConfig,
    provider: Option<Rc<dyn WalletProvider>>,
    ui: Rc<dyn UiSurface>,
    session: RefCell<Option<Session>>,
    in_flight: Cell<Option<ActionKind>>,
    phase: Cell<ActionPhase>,
    connecting: Cell<bool>,
    reloading: Cell<bool>,
}

/// Scratch values carried from one pipeline step to the next.
#[derive(Default)]
struct ActionState {
    entered: Option<DecimalAmount>,
    amount: Option<TokenAmount>,
    approval: Option<Box<dyn PendingTx>>,
    submitted: Option<Box<dyn PendingTx>>,
}

/// Holds the single action slot. Frees it and returns to idle on drop.
struct InFlight<'a> {
    owner: &'a DashboardController,
    kind: ActionKind,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.owner.set_phase(self.kind, ActionPhase::Idle);
        self.owner.in_flight.set(None);
    }
}

struct ConnectAttempt<'a>(&'a Cell<bool>);

impl Drop for ConnectAttempt<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl DashboardController {
    pub fn new(
        config: DashboardConfig,
        provider: Option<Rc<dyn WalletProvider>>,
        ui: Rc<dyn UiSurface>,
    ) -> Self {
        Self {
            config,
            provider,
            ui,
            session: RefCell::new(None),
            in_flight: Cell::new(None),
            phase: Cell::new(ActionPhase::Idle),
            connecting: Cell::new(false),
            reloading: Cell::new(false),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase.get()
    }

    pub async fn dispatch(&self, event: DashboardEvent) {
        if self.reloading.get() {
            debug!(?event, "reload pending, event ignored");
            return;
        }

        let outcome = if event.resets_session() {
            self.reset_session(&event);
            Ok(())
        } else if let Some(kind) = event.action() {
            self.submit_action(kind).await
        } else {
            self.connect().await
        };

        if let Err(err) = outcome {
            debug!(?event, %err, "event handled with error");
        }
    }

    pub async fn connect(&self) -> Result<(), ControllerError> {
        let result = self.run_connect().await;
        if let Err(err) = &result {
            self.report(None, err);
        }
        result
    }

    async fn run_connect(&self) -> Result<(), ControllerError> {
        let provider = self
            .provider
            .clone()
            .ok_or(ControllerError::ProviderUnavailable)?;

        if self.connecting.replace(true) {
            debug!("connect already pending");
            return Ok(());
        }
        let _attempt = ConnectAttempt(&self.connecting);

        provider.request_accounts().await.map_err(connect_failure)?;
        let signer = provider.signer().await.map_err(connect_failure)?;
        if self.reloading.get() {
            return Err(ControllerError::SessionReset);
        }

        let contracts = provider.bind_contracts(&signer, &self.config.contract_addresses());
        let session = Session::new(signer, contracts);
        let address = session.address();
        *self.session.borrow_mut() = Some(session);

        self.ui.set_label(Label::WalletAddress, &address.short());
        self.ui
            .set_button_state(Button::Connect, &ButtonState::new("Connected", true));
        self.ui.set_panel_visible(Panel::Staking, true);
        self.ui.set_panel_visible(Panel::ConnectPrompt, false);
        info!(%address, "wallet connected");

        self.refresh_display().await;
        Ok(())
    }

    /// Re-reads the four display values. Read failures are logged and the
    /// previous values stay on screen.
    pub async fn refresh_display(&self) -> Option<DisplaySnapshot> {
        let snapshot = match self.read_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(?err, "display refresh failed, keeping previous values");
                return None;
            }
        };
        if self.ensure_current().is_err() {
            return None;
        }

        let text = snapshot.format(&self.config.token_symbol);
        self.ui.set_label(Label::WalletBalance, &text.wallet_balance);
        self.ui.set_label(Label::Staked, &text.staked_amount);
        self.ui.set_label(Label::Rewards, &text.pending_rewards);
        debug!(?snapshot, "display refreshed");
        Some(snapshot)
    }

    pub async fn read_snapshot(&self) -> Result<DisplaySnapshot, ControllerError> {
        let session = self.current_session()?;
        let owner = session.address();
        let contracts = session.contracts();

        let wallet_balance = self.guarded_read(contracts.token.balance_of(&owner)).await?;
        let staked_amount = self.guarded_read(contracts.vault.staked_of(&owner)).await?;
        let pending_rewards = self.guarded_read(contracts.vault.pending_rewards(&owner)).await?;
        let decimals = self.guarded_read(contracts.token.decimals()).await?;

        Ok(DisplaySnapshot {
            wallet_balance,
            staked_amount,
            pending_rewards,
            decimals,
        })
    }

    async fn guarded_read<T>(
        &self,
        read: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, ControllerError> {
        self.ensure_current()?;
        read.await.map_err(ControllerError::ReadFailure)
    }

    /// Runs one action end to end: validate, optionally approve, submit,
    /// confirm, refresh. The triggering button is restored on every exit path.
    pub async fn submit_action(&self, kind: ActionKind) -> Result<(), ControllerError> {
        let result = self.run_action(kind).await;
        if let Err(err) = &result {
            self.report(Some(kind), err);
        }
        result
    }

    async fn run_action(&self, kind: ActionKind) -> Result<(), ControllerError> {
        let _slot = self.enter_action(kind)?;
        let session = self.current_session()?;
        let mut state = ActionState::default();
        let mut busy: Option<ButtonGuard<'_>> = None;

        let pipeline = ActionPipeline::for_kind(kind);
        for &step in pipeline.steps() {
            self.set_phase(kind, step.phase());
            if step.touches_network() {
                self.ensure_current()?;
                if busy.is_none() {
                    busy = Some(ButtonGuard::engage(
                        self.ui.as_ref(),
                        Button::for_action(kind),
                        kind.busy_label(),
                    ));
                }
            }
            self.run_step(kind, step, &session, &mut state).await?;
        }

        Ok(())
    }

    async fn run_step(
        &self,
        kind: ActionKind,
        step: ActionStep,
        session: &Session,
        state: &mut ActionState,
    ) -> Result<(), ControllerError> {
        let contracts = session.contracts();
        let failed = move |source: anyhow::Error| tx_failure(kind, source);

        match step {
            ActionStep::Validate => {
                state.entered = Some(DecimalAmount::parse(&self.ui.amount_input())?);
            }
            ActionStep::ReadDecimals => {
                let decimals = contracts.token.decimals().await.map_err(failed)?;
                let entered = state.entered.as_ref().ok_or_else(|| out_of_order(kind, step))?;
                state.amount = Some(entered.to_base_units(decimals)?);
            }
            ActionStep::Approve => {
                let amount = state.amount.ok_or_else(|| out_of_order(kind, step))?;
                let spender = contracts.vault.address();
                let pending = contracts.token.approve(&spender, amount).await.map_err(failed)?;
                debug!(%kind, tx_hash = %pending.tx_hash(), "approval submitted");
                state.approval = Some(pending);
            }
            ActionStep::ConfirmApproval => {
                let pending = state.approval.take().ok_or_else(|| out_of_order(kind, step))?;
                let receipt = pending.wait().await.map_err(failed)?;
                debug!(%kind, tx_hash = %receipt.tx_hash, "approval confirmed");
            }
            ActionStep::Submit => {
                let pending = match kind {
                    ActionKind::Stake | ActionKind::Unstake => {
                        let amount = state.amount.ok_or_else(|| out_of_order(kind, step))?;
                        if kind == ActionKind::Stake {
                            contracts.vault.stake(amount).await
                        } else {
                            contracts.vault.unstake(amount).await
                        }
                    }
                    ActionKind::Claim => contracts.vault.claim().await,
                }
                .map_err(failed)?;
                info!(%kind, tx_hash = %pending.tx_hash(), "transaction submitted");
                state.submitted = Some(pending);
            }
            ActionStep::Confirm => {
                let pending = state.submitted.take().ok_or_else(|| out_of_order(kind, step))?;
                let receipt = pending.wait().await.map_err(failed)?;
                info!(%kind, tx_hash = %receipt.tx_hash, block = ?receipt.block_number, "transaction confirmed");
            }
            ActionStep::Refresh => {
                self.ui.alert(kind.success_message());
                if kind.takes_amount() {
                    self.ui.clear_amount_input();
                }
                self.refresh_display().await;
            }
        }

        Ok(())
    }

    /// Drops the session and its contract handles, then asks the host to
    /// reload. Nothing is reconciled in place.
    pub fn reset_session(&self, reason: &DashboardEvent) {
        if self.reloading.replace(true) {
            return;
        }
        let dropped = self.session.borrow_mut().take();
        info!(?reason, had_session = dropped.is_some(), "wallet identity changed, reloading");
        self.ui.reload();
    }

    fn enter_action(&self, kind: ActionKind) -> Result<InFlight<'_>, ControllerError> {
        if let Some(running) = self.in_flight.get() {
            return Err(ControllerError::ActionInProgress(running));
        }
        self.in_flight.set(Some(kind));
        Ok(InFlight { owner: self, kind })
    }

    fn current_session(&self) -> Result<Session, ControllerError> {
        if self.reloading.get() {
            return Err(ControllerError::SessionReset);
        }
        self.session.borrow().clone().ok_or(ControllerError::NotConnected)
    }

    fn ensure_current(&self) -> Result<(), ControllerError> {
        if self.reloading.get() || self.session.borrow().is_none() {
            return Err(ControllerError::SessionReset);
        }
        Ok(())
    }

    fn set_phase(&self, kind: ActionKind, phase: ActionPhase) {
        let previous = self.phase.replace(phase);
        if previous != phase {
            debug!(%kind, from = %previous, to = %phase, "action phase");
        }
    }

    fn report(&self, action: Option<ActionKind>, err: &ControllerError) {
        let handler = action.map_or_else(|| "connect".to_owned(), |kind| kind.to_string());
        match err {
            ControllerError::ActionInProgress(_) | ControllerError::SessionReset => {
                warn!(%handler, %err, "handler abandoned");
            }
            ControllerError::InvalidAmount(_) | ControllerError::NotConnected => {
                info!(%handler, ?err, "handler rejected input");
            }
            _ => error!(%handler, ?err, "handler failed"),
        }

        if let Some(message) = err.user_message(action) {
            self.ui.alert(message);
        }
    }
}

fn connect_failure(source: anyhow::Error) -> ControllerError {
    if is_user_rejection(&source) {
        ControllerError::UserRejected(source)
    } else {
        ControllerError::ConnectFailed(source)
    }
}

fn tx_failure(kind: ActionKind, source: anyhow::Error) -> ControllerError {
    if is_user_rejection(&source) {
        ControllerError::UserRejected(source)
    } else {
        ControllerError::TransactionFailed { kind, source }
    }
}

fn out_of_order(kind: ActionKind, step: ActionStep) -> ControllerError {
    ControllerError::TransactionFailed {
        kind,
        source: anyhow!("{step:?} ran before its input was prepared"),
    }
}
