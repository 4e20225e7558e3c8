//! Wire types for the wallet provider's JSON-RPC surface.
use ethers_core::types::{Address, Bytes, H256, U64};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    /// Left as raw JSON: `eth_getTransactionReceipt` legitimately returns
    /// `null` while the transaction is unmined.
    #[serde(default)]
    pub result: Value,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

/// Call object for `eth_call` and `eth_sendTransaction`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

/// The subset of a transaction receipt the client needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: H256,
    /// 1 on success, 0 on revert (post-Byzantium).
    pub status: Option<U64>,
    pub block_number: Option<U64>,
}

impl Receipt {
    /// Whether the mined transaction succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|status| !status.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_the_jsonrpc_envelope() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_accounts",
            params: [(); 0],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "eth_accounts",
                "params": [],
            })
        );
    }

    #[test]
    fn call_request_omits_from_when_absent() {
        let call = CallRequest {
            from: None,
            to: Address::from_low_u64_be(1),
            data: Bytes::from(vec![0x12, 0x06, 0x5f, 0xe0]),
        };
        let json = serde_json::to_value(&call).unwrap();
        assert!(json.get("from").is_none());
        assert_eq!(json["data"], "0x12065fe0");
    }

    #[test]
    fn receipt_parses_camel_case_and_status() {
        let json = serde_json::json!({
            "transactionHash": format!("0x{}", "11".repeat(32)),
            "status": "0x1",
            "blockNumber": "0x2a",
        });
        let receipt: Receipt = serde_json::from_value(json).unwrap();
        assert!(receipt.succeeded());
        assert_eq!(receipt.block_number, Some(U64::from(42)));
    }

    #[test]
    fn reverted_receipt_reports_failure() {
        let json = serde_json::json!({
            "transactionHash": format!("0x{}", "22".repeat(32)),
            "status": "0x0",
            "blockNumber": "0x2b",
        });
        let receipt: Receipt = serde_json::from_value(json).unwrap();
        assert!(!receipt.succeeded());
    }

    #[test]
    fn response_tolerates_null_result() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(response.result.is_null());
        assert!(response.error.is_none());
    }
}
