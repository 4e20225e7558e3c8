//! Handle to the ATM contract, bound to an authorized account.
use std::time::Duration;

use ethers_core::types::{Address, U256};

use engine::abi;

use super::{ClientError, Provider};

/// Read/write handle to the contract, carrying the signing account.
///
/// The app derives this from the session machine once it reaches
/// `ContractBound`; constructing it earlier is impossible because the
/// session exposes no account/contract before then.
#[derive(Debug, Clone, Copy)]
pub struct Contract {
    account: Address,
    address: Address,
}

impl Contract {
    #[must_use]
    pub fn bind(account: Address, address: Address) -> Self {
        Self { account, address }
    }

    /// Fetches the contract-reported balance.
    pub async fn balance(&self, provider: &Provider) -> Result<U256, ClientError> {
        let raw = provider.call(self.address, abi::get_balance()).await?;
        abi::decode_uint(&raw).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Deposits `amount`, returning only once the transaction is confirmed.
    ///
    /// The caller refetches the balance after this resolves; sequencing the
    /// read strictly after confirmation is the only ordering guarantee.
    pub async fn deposit(
        &self,
        provider: &Provider,
        amount: U256,
        poll: Duration,
        attempts: u32,
    ) -> Result<(), ClientError> {
        let hash = provider
            .send_transaction(self.account, self.address, abi::deposit(amount))
            .await?;
        tracing::debug!(?hash, "deposit submitted, awaiting confirmation");
        provider.wait_for_receipt(hash, poll, attempts).await?;
        Ok(())
    }

    /// Withdraws `amount`, returning only once the transaction is confirmed.
    pub async fn withdraw(
        &self,
        provider: &Provider,
        amount: U256,
        poll: Duration,
        attempts: u32,
    ) -> Result<(), ClientError> {
        let hash = provider
            .send_transaction(self.account, self.address, abi::withdraw(amount))
            .await?;
        tracing::debug!(?hash, "withdraw submitted, awaiting confirmation");
        provider.wait_for_receipt(hash, poll, attempts).await?;
        Ok(())
    }
}
