use dg_api_types::Address;
use dg_chain_client::{ContractHandles, SignerHandle};

/// A connected wallet and the contracts bound to its signer.
///
/// Only ever held by the controller; dropped wholesale on account or network change.
#[derive(Debug, Clone)]
pub struct Session {
    signer: SignerHandle,
    contracts: ContractHandles,
}

impl Session {
    pub fn new(signer: SignerHandle, contracts: ContractHandles) -> Self {
        Self { signer, contracts }
    }

    pub fn address(&self) -> Address {
        self.signer.address
    }

    pub fn contracts(&self) -> &ContractHandles {
        &self.contracts
    }
}
