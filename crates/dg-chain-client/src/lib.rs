use anyhow::Result;
use async_trait::async_trait;
use dg_api_types::{Address, TokenAmount, TxHash, TxReceipt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// EIP-1193 code for "the user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Error object returned by the injected wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provider error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_CODE
    }
}

/// A mined transaction whose receipt reports failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transaction {0} reverted")]
pub struct TransactionReverted(pub TxHash);

/// True when anything in the error chain is a user rejection from the wallet.
pub fn is_user_rejection(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<RpcError>())
        .any(RpcError::is_user_rejection)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub token: Address,
    pub vault: Address,
}

/// The account the wallet signs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerHandle {
    pub address: Address,
}

/// A submitted transaction that can be awaited until mined.
#[async_trait(?Send)]
pub trait PendingTx {
    fn tx_hash(&self) -> &TxHash;

    /// Resolves after one confirmation. No timeout beyond the provider's own.
    async fn wait(&self) -> Result<TxReceipt>;
}

#[async_trait(?Send)]
pub trait TokenContract {
    fn address(&self) -> Address;
    async fn approve(&self, spender: &Address, amount: TokenAmount) -> Result<Box<dyn PendingTx>>;
    async fn balance_of(&self, owner: &Address) -> Result<TokenAmount>;
    async fn decimals(&self) -> Result<u8>;
}

#[async_trait(?Send)]
pub trait VaultContract {
    fn address(&self) -> Address;
    async fn stake(&self, amount: TokenAmount) -> Result<Box<dyn PendingTx>>;
    async fn unstake(&self, amount: TokenAmount) -> Result<Box<dyn PendingTx>>;
    async fn claim(&self) -> Result<Box<dyn PendingTx>>;
    async fn staked_of(&self, account: &Address) -> Result<TokenAmount>;
    async fn pending_rewards(&self, account: &Address) -> Result<TokenAmount>;
}

/// Host-injected wallet (e.g. `window.ethereum`).
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Prompts the user for account access.
    async fn request_accounts(&self) -> Result<Vec<Address>>;
    async fn signer(&self) -> Result<SignerHandle>;
    fn bind_contracts(&self, signer: &SignerHandle, addresses: &ContractAddresses) -> ContractHandles;
}

/// Token and vault bound to one signer. Rebuilt whenever the session changes.
#[derive(Clone)]
pub struct ContractHandles {
    pub token: Rc<dyn TokenContract>,
    pub vault: Rc<dyn VaultContract>,
}

impl ContractHandles {
    pub fn new(token: Rc<dyn TokenContract>, vault: Rc<dyn VaultContract>) -> Self {
        Self { token, vault }
    }
}

impl fmt::Debug for ContractHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandles")
            .field("token", &self.token.address())
            .field("vault", &self.vault.address())
            .finish()
    }
}
