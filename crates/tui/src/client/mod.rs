//! JSON-RPC client for the wallet provider.
//!
//! The wallet daemon plays the role a browser-injected provider plays for a
//! web page: it reports already-authorized accounts, prompts the user on
//! `eth_requestAccounts` and `eth_sendTransaction`, and relays reads to the
//! node. All signing happens wallet-side; this client never touches keys.
pub mod contract;
mod types;

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use ethers_core::types::{Address, Bytes, H256};
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};

pub use types::Receipt;
use types::{CallRequest, RpcRequest, RpcResponse};

// EIP-1193 provider error codes.
const CODE_USER_REJECTED: i64 = 4001;
const CODE_UNAUTHORIZED: i64 = 4100;
const CODE_UNSUPPORTED_METHOD: i64 = 4200;
const CODE_DISCONNECTED: i64 = 4900;
const CODE_CHAIN_DISCONNECTED: i64 = 4901;

const NO_PARAMS: [(); 0] = [];

#[derive(Debug)]
pub enum ClientError {
    /// The user refused the wallet prompt.
    Rejected,
    Unauthorized,
    UnsupportedMethod,
    Disconnected,
    /// The transaction was mined but reverted.
    Reverted,
    /// No receipt arrived within the polling budget.
    Timeout,
    Rpc { code: i64, message: String },
    Transport(reqwest::Error),
    Decode(String),
}

#[derive(Debug)]
pub struct Provider {
    url: Url,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl Provider {
    pub fn new(wallet_url: &str) -> Result<Self> {
        let url = Url::parse(wallet_url)
            .map_err(|err| AppError::Terminal(format!("invalid wallet_url: {err}")))?;
        Ok(Self {
            url,
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn request<P, R>(&self, method: &str, params: P) -> std::result::Result<R, ClientError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let res = self
            .http
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let body = res
            .json::<RpcResponse>()
            .await
            .map_err(ClientError::Transport)?;

        if let Some(error) = body.error {
            tracing::debug!(method, code = error.code, "wallet refused the request");
            return Err(map_rpc_error(error.code, error.message));
        }

        serde_json::from_value(body.result)
            .map_err(|err| ClientError::Decode(format!("{method}: {err}")))
    }

    /// Silent provider discovery: probes the endpoint without user prompts.
    ///
    /// An unreachable endpoint means no wallet is installed; that is an
    /// informational condition, not an error.
    pub async fn detect(&self) -> bool {
        self.request::<_, String>("eth_chainId", NO_PARAMS)
            .await
            .is_ok()
    }

    /// Already-authorized accounts; non-interactive, possibly empty.
    pub async fn accounts(&self) -> std::result::Result<Vec<Address>, ClientError> {
        self.request("eth_accounts", NO_PARAMS).await
    }

    /// Interactive authorization; the wallet prompts the user, who may
    /// refuse ([`ClientError::Rejected`]).
    pub async fn request_accounts(&self) -> std::result::Result<Vec<Address>, ClientError> {
        self.request("eth_requestAccounts", NO_PARAMS).await
    }

    /// Read-only contract call against the latest block.
    pub async fn call(&self, to: Address, data: Bytes) -> std::result::Result<Bytes, ClientError> {
        let call = CallRequest {
            from: None,
            to,
            data,
        };
        self.request("eth_call", (call, "latest")).await
    }

    /// Submits a state-changing call; the wallet signs and broadcasts.
    pub async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> std::result::Result<H256, ClientError> {
        let call = CallRequest {
            from: Some(from),
            to,
            data,
        };
        self.request("eth_sendTransaction", (call,)).await
    }

    pub async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> std::result::Result<Option<Receipt>, ClientError> {
        self.request("eth_getTransactionReceipt", (hash,)).await
    }

    /// Polls until the transaction is mined ("await confirmation").
    ///
    /// There is no cancellation once a transaction is in flight; the attempt
    /// budget only bounds how long an unmined transaction is waited on. A
    /// mined receipt with status 0 is a revert.
    pub async fn wait_for_receipt(
        &self,
        hash: H256,
        poll: Duration,
        attempts: u32,
    ) -> std::result::Result<Receipt, ClientError> {
        for _ in 0..attempts {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    return Err(ClientError::Reverted);
                }
                return Ok(receipt);
            }
            tokio::time::sleep(poll).await;
        }
        Err(ClientError::Timeout)
    }
}

fn map_rpc_error(code: i64, message: String) -> ClientError {
    match code {
        CODE_USER_REJECTED => ClientError::Rejected,
        CODE_UNAUTHORIZED => ClientError::Unauthorized,
        CODE_UNSUPPORTED_METHOD => ClientError::UnsupportedMethod,
        CODE_DISCONNECTED | CODE_CHAIN_DISCONNECTED => ClientError::Disconnected,
        _ if message.contains("revert") => ClientError::Reverted,
        _ => ClientError::Rpc { code, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eip1193_codes_map_to_dedicated_variants() {
        assert!(matches!(
            map_rpc_error(4001, "User rejected the request.".to_string()),
            ClientError::Rejected
        ));
        assert!(matches!(
            map_rpc_error(4100, String::new()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            map_rpc_error(4200, String::new()),
            ClientError::UnsupportedMethod
        ));
        assert!(matches!(
            map_rpc_error(4900, String::new()),
            ClientError::Disconnected
        ));
        assert!(matches!(
            map_rpc_error(4901, String::new()),
            ClientError::Disconnected
        ));
    }

    #[test]
    fn revert_messages_map_to_reverted() {
        assert!(matches!(
            map_rpc_error(-32000, "execution reverted: no funds".to_string()),
            ClientError::Reverted
        ));
    }

    #[test]
    fn other_codes_stay_generic() {
        let err = map_rpc_error(-32601, "method not found".to_string());
        assert!(matches!(err, ClientError::Rpc { code: -32601, .. }));
    }
}
