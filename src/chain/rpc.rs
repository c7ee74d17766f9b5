//! HTTP [`ChainReader`] backed by a Stacks-style node API.
//!
//! Two endpoints are used:
//! * `POST /v2/contracts/call-read/{address}/{name}/{function}` for
//!   read-only calls,
//! * `GET /v2/info` for the chain tip height.
//!
//! Transport failures, unexpected statuses, and undecodable bodies are all
//! mapped into [`QueryError`]; nothing here panics.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::chain::traits::ChainReader;
use crate::chain::types::ReadOnlyCall;
use crate::config::NetworkConfig;
use crate::error::QueryError;

/// Read-only chain access over the node's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpChainReader {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct CallReadResponse {
    okay: bool,
    result: Option<Value>,
    cause: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoreInfoResponse {
    stacks_tip_height: u64,
}

impl HttpChainReader {
    /// Build a reader from the network section of the config.
    pub fn new(config: &NetworkConfig) -> Result<Self, QueryError> {
        let mut base_url: Url = config
            .rpc_url
            .parse()
            .map_err(|e| QueryError::Network(format!("invalid RPC URL '{}': {}", config.rpc_url, e)))?;

        // `Url::join` treats a non-slash-terminated path as a file and
        // replaces its last segment; keep configured prefixes intact.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| QueryError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, QueryError> {
        self.base_url
            .join(path)
            .map_err(|e| QueryError::Network(format!("invalid endpoint '{}': {}", path, e)))
    }
}

#[async_trait]
impl ChainReader for HttpChainReader {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<Value, QueryError> {
        let path = format!(
            "v2/contracts/call-read/{}/{}/{}",
            call.contract_address, call.contract_name, call.function_name
        );
        let url = self.endpoint(&path)?;

        let response = self
            .client
            .post(url)
            .json(&json!({
                "sender": call.sender_address,
                "arguments": call.function_args,
            }))
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(QueryError::ContractNotFound(format!(
                "{}.{}",
                call.contract_address, call.contract_name
            )));
        }
        if !response.status().is_success() {
            return Err(QueryError::Network(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let body: CallReadResponse = response
            .json()
            .await
            .map_err(|e| QueryError::MalformedResponse(e.to_string()))?;

        if !body.okay {
            let cause = body.cause.unwrap_or_else(|| "unspecified".to_string());
            if cause.contains("NoSuchContract") {
                return Err(QueryError::ContractNotFound(cause));
            }
            return Err(QueryError::MalformedResponse(format!(
                "read-only call rejected: {}",
                cause
            )));
        }

        body.result
            .ok_or_else(|| QueryError::MalformedResponse("missing result field".to_string()))
    }

    async fn current_block_height(&self) -> Result<u64, QueryError> {
        let url = self.endpoint("v2/info")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QueryError::Network(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let info: CoreInfoResponse = response
            .json()
            .await
            .map_err(|e| QueryError::MalformedResponse(e.to_string()))?;

        Ok(info.stacks_tip_height)
    }
}
