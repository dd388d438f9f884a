use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use dg_api_types::{Address, TokenAmount, TxHash, TxReceipt};
use dg_chain_client::{
    ContractAddresses, ContractHandles, PendingTx, SignerHandle, TokenContract, TransactionReverted,
    VaultContract, WalletProvider,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

pub mod abi;

use abi::Token;

/// Request channel to an EIP-1193 provider (`provider.request({ method, params })`).
///
/// `pause` is how receipt polling waits between attempts, so the adapter
/// stays free of any particular timer implementation.
#[async_trait(?Send)]
pub trait Eip1193 {
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
    async fn pause(&self, duration: Duration);
}

/// Wallet provider backed by an injected EIP-1193 object.
pub struct EvmWallet<T> {
    transport: Rc<T>,
    poll_interval: Duration,
}

impl<T: Eip1193 + 'static> EvmWallet<T> {
    /// `poll_interval` is the wait between receipt lookups.
    pub fn new(transport: T, poll_interval: Duration) -> Self {
        Self {
            transport: Rc::new(transport),
            poll_interval,
        }
    }

    async fn accounts(&self, method: &str) -> Result<Vec<Address>> {
        let value = self
            .transport
            .request(method, json!([]))
            .await
            .with_context(|| format!("{method} failed"))?;
        let raw: Vec<String> =
            serde_json::from_value(value).with_context(|| format!("{method} returned a non-list"))?;
        raw.iter()
            .map(|a| Address::parse(a).with_context(|| format!("{method} returned bad address {a}")))
            .collect()
    }
}

#[async_trait(?Send)]
impl<T: Eip1193 + 'static> WalletProvider for EvmWallet<T> {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.accounts("eth_requestAccounts").await
    }

    async fn signer(&self) -> Result<SignerHandle> {
        let address = self
            .accounts("eth_accounts")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("wallet exposes no accounts"))?;
        Ok(SignerHandle { address })
    }

    fn bind_contracts(&self, signer: &SignerHandle, addresses: &ContractAddresses) -> ContractHandles {
        let caller = |address| ContractCaller {
            transport: Rc::clone(&self.transport),
            address,
            from: signer.address,
            poll_interval: self.poll_interval,
        };
        ContractHandles::new(
            Rc::new(EvmToken(caller(addresses.token))),
            Rc::new(EvmVault(caller(addresses.vault))),
        )
    }
}

/// One contract address plus the signer that sends to it.
struct ContractCaller<T> {
    transport: Rc<T>,
    address: Address,
    from: Address,
    poll_interval: Duration,
}

impl<T: Eip1193 + 'static> ContractCaller<T> {
    async fn call(&self, signature: &str, args: &[Token]) -> Result<String> {
        let data = abi::encode_call(signature, args);
        let params = json!([
            { "from": self.from.to_string(), "to": self.address.to_string(), "data": data },
            "latest"
        ]);
        let value = self
            .transport
            .request("eth_call", params)
            .await
            .with_context(|| format!("eth_call {signature}"))?;
        value
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| anyhow!("eth_call {signature} returned {value}"))
    }

    async fn read_amount(&self, signature: &str, args: &[Token]) -> Result<TokenAmount> {
        let raw = self.call(signature, args).await?;
        abi::decode_uint(&raw).map(TokenAmount)
    }

    async fn send(&self, signature: &str, args: &[Token]) -> Result<Box<dyn PendingTx>> {
        let data = abi::encode_call(signature, args);
        let params = json!([
            { "from": self.from.to_string(), "to": self.address.to_string(), "data": data }
        ]);
        let value = self
            .transport
            .request("eth_sendTransaction", params)
            .await
            .with_context(|| format!("eth_sendTransaction {signature}"))?;
        let hash = value
            .as_str()
            .ok_or_else(|| anyhow!("eth_sendTransaction {signature} returned {value}"))?;
        debug!(tx_hash = hash, call = signature, "transaction submitted");

        Ok(Box::new(EvmPendingTx {
            transport: Rc::clone(&self.transport),
            tx_hash: TxHash(hash.to_owned()),
            poll_interval: self.poll_interval,
        }))
    }
}

pub struct EvmToken<T>(ContractCaller<T>);

#[async_trait(?Send)]
impl<T: Eip1193 + 'static> TokenContract for EvmToken<T> {
    fn address(&self) -> Address {
        self.0.address
    }

    async fn approve(&self, spender: &Address, amount: TokenAmount) -> Result<Box<dyn PendingTx>> {
        self.0
            .send(abi::APPROVE, &[Token::Address(*spender), Token::Uint(amount.0)])
            .await
    }

    async fn balance_of(&self, owner: &Address) -> Result<TokenAmount> {
        self.0.read_amount(abi::BALANCE_OF, &[Token::Address(*owner)]).await
    }

    async fn decimals(&self) -> Result<u8> {
        let raw = self.0.call(abi::DECIMALS, &[]).await?;
        abi::decode_u8(&raw)
    }
}

pub struct EvmVault<T>(ContractCaller<T>);

#[async_trait(?Send)]
impl<T: Eip1193 + 'static> VaultContract for EvmVault<T> {
    fn address(&self) -> Address {
        self.0.address
    }

    async fn stake(&self, amount: TokenAmount) -> Result<Box<dyn PendingTx>> {
        self.0.send(abi::STAKE, &[Token::Uint(amount.0)]).await
    }

    async fn unstake(&self, amount: TokenAmount) -> Result<Box<dyn PendingTx>> {
        self.0.send(abi::UNSTAKE, &[Token::Uint(amount.0)]).await
    }

    async fn claim(&self) -> Result<Box<dyn PendingTx>> {
        self.0.send(abi::CLAIM, &[]).await
    }

    async fn staked_of(&self, account: &Address) -> Result<TokenAmount> {
        self.0.read_amount(abi::STAKED_OF, &[Token::Address(*account)]).await
    }

    async fn pending_rewards(&self, account: &Address) -> Result<TokenAmount> {
        self.0
            .read_amount(abi::PENDING_REWARDS, &[Token::Address(*account)])
            .await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    block_number: Option<String>,
}

pub struct EvmPendingTx<T> {
    transport: Rc<T>,
    tx_hash: TxHash,
    poll_interval: Duration,
}

#[async_trait(?Send)]
impl<T: Eip1193 + 'static> PendingTx for EvmPendingTx<T> {
    fn tx_hash(&self) -> &TxHash {
        &self.tx_hash
    }

    async fn wait(&self) -> Result<TxReceipt> {
        loop {
            let value = self
                .transport
                .request("eth_getTransactionReceipt", json!([self.tx_hash.0]))
                .await
                .with_context(|| format!("receipt lookup for {}", self.tx_hash))?;

            if value.is_null() {
                debug!(tx_hash = %self.tx_hash, "receipt not yet available");
                self.transport.pause(self.poll_interval).await;
                continue;
            }

            let receipt: RawReceipt =
                serde_json::from_value(value).context("malformed transaction receipt")?;

            // Receipts without a status field predate EIP-658 and are treated as mined.
            if receipt.status.as_deref().is_some_and(|s| abi::parse_quantity(s).ok() == Some(0)) {
                return Err(TransactionReverted(self.tx_hash.clone()).into());
            }

            let block_number = receipt
                .block_number
                .as_deref()
                .map(abi::parse_quantity)
                .transpose()?;
            debug!(tx_hash = %self.tx_hash, ?block_number, "transaction confirmed");

            return Ok(TxReceipt {
                tx_hash: self.tx_hash.clone(),
                block_number,
            });
        }
    }
}
