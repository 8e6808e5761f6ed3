use http::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use std::sync::{
    atomic::{AtomicU64, Ordering},
    RwLock,
};

use lib_utils::{
    headers::{apply_json_content_type, bearer, HeaderKey},
    model::jsonrpc::RpcRequest,
    now,
};

use super::{
    interface::ToolT,
    tools::{AutoBindCoupons, AvailableCoupons, MyCoupons, NowTimeInfo},
};
use crate::{client::rest::RestRequest, utils::Upstream, Credential, RpcError, ToolResult};

/// JSON-RPC method for every MCP tool invocation
const METHOD_TOOLS_CALL: &str = "tools/call";

/// Last issued request id
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp, bumped past the last issued id so ids from the
/// same millisecond never collide within a process.
fn next_id() -> u64 {
    let ts = now!().as_millis() as u64;
    let prev = LAST_ID
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(ts.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    ts.max(prev + 1)
}

/// Client of the MCD MCP server, usually reached through the local proxy.
#[derive(Debug)]
pub struct McpClient {
    endpoint: Upstream<'static>,
    token: RwLock<Option<Credential>>,
    /// Headers sent with every call, `authorization` included once a token is set
    default_headers: RwLock<HeaderMap>,
}

impl Default for McpClient {
    fn default() -> Self {
        Self::new(Upstream::LOCAL_PROXY_DEFAULT)
    }
}

impl McpClient {
    pub fn new(endpoint: Upstream<'static>) -> Self {
        let mut default_headers = HeaderMap::new();
        apply_json_content_type(&mut default_headers);
        Self {
            endpoint,
            token: RwLock::new(None),
            default_headers: RwLock::new(default_headers),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn set_token(&self, credential: Credential) {
        match bearer(credential.expose()) {
            Ok(value) => {
                write_lock(&self.default_headers).insert(HeaderKey::Authorization.name(), value);
            }
            Err(e) => {
                // Still sent explicitly per call, where the error surfaces
                tracing::warn!("Token is not a valid header value: {}", e);
            }
        }
        *write_lock(&self.token) = Some(credential);
    }

    #[tracing::instrument(skip(self))]
    pub fn clear_token(&self) {
        *write_lock(&self.token) = None;
        write_lock(&self.default_headers).remove(HeaderKey::Authorization.name());
    }

    pub fn token(&self) -> Option<Credential> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Call a MCP tool by name.
    ///
    /// Fails with [`RpcError::CredentialMissing`] before touching the network
    /// when no token is set.
    #[tracing::instrument(skip(self, arguments), fields(endpoint = %self.endpoint.str()))]
    pub async fn call(&self, tool_name: &str, arguments: Value) -> Result<ToolResult, RpcError> {
        let credential = self.token().ok_or(RpcError::CredentialMissing)?;

        let request = RpcRequest::new(
            next_id(),
            METHOD_TOOLS_CALL,
            Some(json!({
                "name": tool_name,
                "arguments": arguments,
            })),
        );
        let body = serde_json::to_vec(&request).map_err(|e| RpcError::Other(e.to_string()))?;

        let headers = {
            let mut headers = self
                .default_headers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone();
            let authorization: HeaderValue =
                bearer(credential.expose()).map_err(|e| RpcError::Other(e.to_string()))?;
            headers.insert(HeaderKey::Authorization.name(), authorization);
            headers
        };

        let response = RestRequest::builder()
            .url(self.endpoint.str())
            .headers(Some(headers))
            .body(Some(body))
            .build()
            .map_err(RpcError::from_transport)?
            .post()
            .await
            .map_err(RpcError::from_transport)?;

        let (_, status, _, body) = response
            .bytes_any()
            .await
            .map_err(RpcError::from_transport)?
            .into_parts();
        let body = body.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!("MCP call [{}] failed with HTTP {}", tool_name, status);
            return Err(RpcError::from_status(status, &body));
        }

        // A non JSON body is handed back as is
        let envelope = serde_json::from_slice::<Value>(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

        ToolResult::from_envelope(envelope).inspect_err(|e| {
            tracing::warn!("MCP call [{}] returned error envelope: {}", tool_name, e);
        })
    }

    /// Call a pre-defined tool.
    pub async fn call_tool<T: ToolT>(&self) -> Result<ToolResult, RpcError> {
        T::call(self).await
    }

    pub async fn available_coupons(&self) -> Result<ToolResult, RpcError> {
        self.call_tool::<AvailableCoupons>().await
    }

    pub async fn auto_bind_coupons(&self) -> Result<ToolResult, RpcError> {
        self.call_tool::<AutoBindCoupons>().await
    }

    pub async fn my_coupons(&self) -> Result<ToolResult, RpcError> {
        self.call_tool::<MyCoupons>().await
    }

    pub async fn now_time_info(&self) -> Result<ToolResult, RpcError> {
        self.call_tool::<NowTimeInfo>().await
    }

    /// Set `credential` and probe it with `now-time-info`.
    ///
    /// The previous token is restored when the probe fails.
    #[tracing::instrument(skip(self))]
    pub async fn verify_token(&self, credential: Credential) -> Result<(), RpcError> {
        let previous = self.token();
        self.set_token(credential);

        match self.now_time_info().await {
            Ok(_) => Ok(()),
            Err(e) => {
                match previous {
                    Some(previous) => self.set_token(previous),
                    None => self.clear_token(),
                }
                Err(e)
            }
        }
    }
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
