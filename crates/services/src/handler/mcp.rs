//! `/api/mcp`: forwards JSON-RPC calls to the MCD MCP server so that
//! browsers and other clients avoid cross-origin restrictions.

use anyhow::{anyhow, Result};
use axum::{
    extract::Request as AxumRequest,
    http::{Method, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
    Json,
};
use http::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use std::future::Future;

use lib_rpc::utils::Upstream;
use lib_rpc_client::client::rest::RestRequest;
use lib_utils::{
    headers::{apply_json_content_type, authorization_of, HeaderKey},
    model::jsonrpc::{RpcResponse, CODE_METHOD_NOT_FOUND, CODE_SERVER_ERROR},
};

use super::HandlerT;

/// Where the proxy sends the call.
pub trait UpstreamT: 'static + std::fmt::Debug + Clone + Send + Sync {
    /// POST `body` with the given `Authorization` value, as received, returning
    /// the upstream status and its JSON body.
    ///
    /// Any failure, a non JSON upstream body included, is an error.
    fn forward(
        &self,
        body: Value,
        authorization: HeaderValue,
    ) -> impl Future<Output = Result<(StatusCode, Value)>> + Send;
}

/// The real upstream, through the shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    upstream: Upstream<'static>,
}

impl Default for ReqwestUpstream {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ReqwestUpstream {
    /// The fixed MCD server, or `custom` when given.
    pub fn new(custom: Option<String>) -> Self {
        let upstream = match custom {
            Some(custom) => Upstream::MCD_DEFAULT.with_custom(custom),
            None => Upstream::MCD_DEFAULT,
        };
        Self { upstream }
    }

    pub fn url(&self) -> &str {
        self.upstream.str()
    }
}

impl UpstreamT for ReqwestUpstream {
    #[tracing::instrument(skip_all, fields(upstream = %self.upstream.str()), err)]
    async fn forward(
        &self,
        body: Value,
        authorization: HeaderValue,
    ) -> Result<(StatusCode, Value)> {
        let mut headers = HeaderMap::new();
        apply_json_content_type(&mut headers);
        headers.insert(HeaderKey::Authorization.name(), authorization);

        let (_, status, _, data) = RestRequest::builder()
            .url(self.upstream.str())
            .headers(Some(headers))
            .body(Some(serde_json::to_vec(&body)?))
            .build()?
            .post()
            .await?
            .json_any::<Value>()
            .await?
            .into_parts();

        Ok((status, data.unwrap_or_default()))
    }
}

/// The proxy handler, stateless apart from its upstream.
#[derive(Debug, Clone)]
pub struct McpProxyHandler<U: UpstreamT = ReqwestUpstream> {
    upstream: U,
}

impl<U: UpstreamT> McpProxyHandler<U> {
    pub fn new(upstream: U) -> Self {
        Self { upstream }
    }

    async fn forward(&self, req: AxumRequest) -> Result<AxumResponse> {
        let (parts, body) = req.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| anyhow!("Read request body failed: {e}"))?;

        let authorization = authorization_of(&parts.headers);
        let (status, data) = self
            .upstream
            .forward(parse_body(&body), authorization)
            .await?;

        // Any 2xx is reported as 200
        let status = if status.is_success() {
            StatusCode::OK
        } else {
            tracing::debug!("Upstream responded with HTTP {}", status);
            status
        };

        Ok((status, Json(data)).into_response())
    }
}

impl<U: UpstreamT> HandlerT for McpProxyHandler<U> {
    type Response = AxumResponse;

    #[tracing::instrument(level = "debug", name = "McpProxyHandler.call", skip_all, fields(method = %req.method()))]
    async fn call(self, req: AxumRequest) -> Result<Self::Response> {
        match *req.method() {
            Method::OPTIONS => return Ok(StatusCode::OK.into_response()),
            Method::POST => {}
            _ => {
                return Ok((
                    StatusCode::METHOD_NOT_ALLOWED,
                    Json(RpcResponse::new_error(CODE_METHOD_NOT_FOUND, "Method Not Allowed")),
                )
                    .into_response())
            }
        }

        Ok(self.forward(req).await.unwrap_or_else(|e| {
            tracing::error!("Proxy error: {:?}", e);
            let message = match e.to_string() {
                m if m.is_empty() => "Unknown error".to_owned(),
                m => m,
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcResponse::new_error(
                    CODE_SERVER_ERROR,
                    format!("Proxy Error: {message}"),
                )),
            )
                .into_response()
        }))
    }
}

/// Request body as JSON, `{}` when empty or malformed.
fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return json!({});
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::warn!("Malformed request body, forwarded as {{}}: {}", e);
        json!({})
    })
}
