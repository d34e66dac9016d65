//! Stacks node RPC client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::StacksAddress;
use crate::encoding::ClarityValue;
use crate::error::{Error, Result};
use crate::transaction::StacksTransaction;
use crate::types::{NetworkTarget, ReadOnlyCallRequest, Txid};

/// What the scripts need from a node. Implemented over HTTP by [`HttpNode`]; tests supply fakes.
#[async_trait]
pub trait StacksNode: Send + Sync {
    /// Endpoint and chain parameters transactions for this node are signed with.
    fn network(&self) -> &NetworkTarget;

    /// Submit a signed transaction; not idempotent.
    async fn broadcast(&self, tx: &StacksTransaction) -> Result<Txid>;

    /// Evaluate a read-only function against current chain state.
    async fn call_read_only(&self, call: &ReadOnlyCallRequest) -> Result<ClarityValue>;

    /// The next nonce the node expects from `address`.
    async fn account_nonce(&self, address: &StacksAddress) -> Result<u64>;
}

pub struct HttpNode {
    client: Client,
    network: NetworkTarget,
}

impl HttpNode {
    pub fn new(network: NetworkTarget, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, network })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.network.url.trim_end_matches('/'), path)
    }
}

/// Body of `POST /v2/contracts/call-read/...`. Only a caller address travels with it.
#[derive(Debug, Serialize)]
pub struct ReadOnlyBody {
    pub sender: String,
    pub arguments: Vec<String>,
}

impl ReadOnlyBody {
    pub fn from_request(call: &ReadOnlyCallRequest) -> Result<Self> {
        Ok(Self {
            sender: call.sender.to_string(),
            arguments: call.function_args.iter().map(ClarityValue::to_hex).collect::<Result<_>>()?,
        })
    }
}

pub fn read_only_path(call: &ReadOnlyCallRequest) -> String {
    format!(
        "/v2/contracts/call-read/{}/{}/{}",
        call.contract.address, call.contract.name, call.function_name
    )
}

#[derive(Debug, Deserialize)]
struct ReadOnlyResponse {
    okay: bool,
    result: Option<String>,
    cause: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    nonce: u64,
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    error: Option<String>,
    reason: Option<String>,
    reason_data: Option<serde_json::Value>,
    txid: Option<String>,
}

/// Interpret the answer to `POST /v2/transactions`.
pub fn parse_broadcast_response(status: StatusCode, body: &str) -> Result<Txid> {
    if status.is_success() {
        let txid: String = serde_json::from_str(body).unwrap_or_else(|_| body.trim().to_string());
        return Txid::from_hex(&txid);
    }
    // only a client error means the node looked at the transaction and refused it
    if !status.is_client_error() {
        return Err(Error::UnexpectedResponse { status: status.as_u16(), body: body.to_string() });
    }
    match serde_json::from_str::<RejectionBody>(body) {
        Ok(rej) if rej.reason.is_some() || rej.error.is_some() => Err(Error::Rejected {
            reason: rej.reason.or(rej.error).unwrap_or_default(),
            reason_data: rej.reason_data,
            txid: rej.txid,
        }),
        _ => Err(Error::UnexpectedResponse { status: status.as_u16(), body: body.to_string() }),
    }
}

pub fn parse_read_only_response(status: StatusCode, body: &str) -> Result<ClarityValue> {
    if !status.is_success() {
        return Err(Error::UnexpectedResponse { status: status.as_u16(), body: body.to_string() });
    }
    let resp: ReadOnlyResponse = serde_json::from_str(body)
        .map_err(|_| Error::UnexpectedResponse { status: status.as_u16(), body: body.to_string() })?;
    match (resp.okay, resp.result) {
        (true, Some(hex)) => ClarityValue::from_hex(&hex),
        _ => Err(Error::ReadOnlyFailed(resp.cause.unwrap_or_else(|| "no cause given".into()))),
    }
}

pub fn parse_account_response(status: StatusCode, body: &str) -> Result<u64> {
    if !status.is_success() {
        return Err(Error::UnexpectedResponse { status: status.as_u16(), body: body.to_string() });
    }
    serde_json::from_str::<AccountResponse>(body)
        .map(|a| a.nonce)
        .map_err(|_| Error::UnexpectedResponse { status: status.as_u16(), body: body.to_string() })
}

#[async_trait]
impl StacksNode for HttpNode {
    fn network(&self) -> &NetworkTarget {
        &self.network
    }

    async fn broadcast(&self, tx: &StacksTransaction) -> Result<Txid> {
        let url = self.url("/v2/transactions");
        let bytes = tx.serialize()?;
        debug!(%url, len = bytes.len(), "broadcasting transaction");
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        parse_broadcast_response(status, &body)
    }

    async fn call_read_only(&self, call: &ReadOnlyCallRequest) -> Result<ClarityValue> {
        let url = self.url(&read_only_path(call));
        let body = ReadOnlyBody::from_request(call)?;
        debug!(%url, args = body.arguments.len(), "read-only call");
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        parse_read_only_response(status, &text)
    }

    async fn account_nonce(&self, address: &StacksAddress) -> Result<u64> {
        let url = self.url(&format!("/v2/accounts/{address}?proof=0"));
        debug!(%url, "fetching account nonce");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        parse_account_response(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{uint_cv, ClarityName};
    use crate::error::ErrorKind;

    const TXID: &str = "f1d1a07ef6e1f05c4ab0c1cf78d1d5bb4b7b0bd6b0f0f5c5d0e8a9b9c0d1e2f3";

    fn get_owner(sender: &str) -> ReadOnlyCallRequest {
        ReadOnlyCallRequest {
            contract: "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.simple-nft-l1".parse().unwrap(),
            function_name: ClarityName::new("get-owner").unwrap(),
            function_args: vec![uint_cv(5)],
            sender: sender.parse().unwrap(),
        }
    }

    #[test]
    fn accepted_broadcast_yields_txid() {
        let body = format!("\"{TXID}\"");
        let txid = parse_broadcast_response(StatusCode::OK, &body).unwrap();
        assert_eq!(txid.to_string(), TXID);
        let prefixed = format!("\"0x{TXID}\"");
        assert_eq!(parse_broadcast_response(StatusCode::OK, &prefixed).unwrap(), txid);
    }

    #[test]
    fn conflicting_nonce_is_a_rejection() {
        let body = format!(
            r#"{{"error":"transaction rejected","reason":"ConflictingNonceInMempool","txid":"{TXID}"}}"#
        );
        let err = parse_broadcast_response(StatusCode::BAD_REQUEST, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejection);
        match err {
            Error::Rejected { reason, txid, .. } => {
                assert_eq!(reason, "ConflictingNonceInMempool");
                assert_eq!(txid.as_deref(), Some(TXID));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn gateway_error_is_a_network_error() {
        let err = parse_broadcast_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn server_error_with_json_body_is_still_network() {
        let body = r#"{"error":"internal error","reason":"ServerError"}"#;
        let err = parse_broadcast_response(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(matches!(err, Error::UnexpectedResponse { status: 500, .. }));
    }

    #[test]
    fn read_only_results_and_failures() {
        let ok = r#"{"okay":true,"result":"0x0a0100000000000000000000000000000005"}"#;
        let v = parse_read_only_response(StatusCode::OK, ok).unwrap();
        assert_eq!(v.to_string(), "(some u5)");

        let failed = r#"{"okay":false,"cause":"Unchecked(NoSuchContract(\"x\"))"}"#;
        let err = parse_read_only_response(StatusCode::OK, failed).unwrap_err();
        assert!(matches!(err, Error::ReadOnlyFailed(ref c) if c.contains("NoSuchContract")));
    }

    #[test]
    fn read_only_body_has_only_sender_and_arguments() {
        let call = get_owner("ST000000000000000000002AMW42H");
        let json = serde_json::to_value(ReadOnlyBody::from_request(&call).unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["arguments", "sender"]);
        assert_eq!(obj["arguments"][0], "0x0100000000000000000000000000000005");
        assert_eq!(
            read_only_path(&call),
            "/v2/contracts/call-read/ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM/simple-nft-l1/get-owner"
        );
    }

    #[test]
    fn account_nonce_parses() {
        let body = r#"{"balance":"0x0","locked":"0x0","unlock_height":0,"nonce":7,"balance_proof":"","nonce_proof":""}"#;
        assert_eq!(parse_account_response(StatusCode::OK, body).unwrap(), 7);
        assert!(parse_account_response(StatusCode::NOT_FOUND, "").is_err());
    }

    #[test]
    fn url_joins_without_double_slash() {
        let node = HttpNode::new(NetworkTarget::testnet("http://localhost:3999/", 1), Duration::from_secs(1)).unwrap();
        assert_eq!(node.url("/v2/transactions"), "http://localhost:3999/v2/transactions");
    }
}
