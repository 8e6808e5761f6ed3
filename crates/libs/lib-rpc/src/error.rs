use http::StatusCode;
use serde_json::Value;

use crate::client::TransportError;

/// Errors surfaced by [`McpClient`](crate::McpClient), each displays as a
/// message ready to be shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// No token set before a call
    #[error("请先设置 MCP Token")]
    CredentialMissing,

    /// Empty token input
    #[error("请输入 MCP Token")]
    CredentialEmpty,

    /// Token too short to be real
    #[error("Token 格式不正确")]
    CredentialMalformed,

    /// No response received at all
    #[error("网络连接失败：可能是 CORS 跨域问题。MCP Server 可能需要通过代理服务器访问，或者需要在服务器端调用。")]
    NetworkFailure,

    /// HTTP 429
    #[error("请求频率过高，请稍后再试（每分钟最多 600 次请求）")]
    RateLimited,

    /// HTTP 401
    #[error("Token 无效或已过期，请重新设置")]
    Unauthorized,

    /// HTTP 403
    #[error("Token 权限不足")]
    Forbidden,

    /// HTTP 404
    #[error("API 端点不存在，请检查 MCP Server 地址是否正确")]
    NotFound,

    /// HTTP 500
    #[error("服务器内部错误，请稍后重试")]
    UpstreamInternal,

    /// Any other non-2xx HTTP status
    #[error("请求失败 ({status}): {message}")]
    UpstreamOther { status: u16, message: String },

    /// The RPC envelope carries an `error` field
    #[error("{0}")]
    ProtocolError(String),

    /// Anything else, message passed through
    #[error("{0}")]
    Other(String),
}

impl RpcError {
    /// Map a non-2xx HTTP status with its (maybe JSON) body.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        match status.as_u16() {
            429 => Self::RateLimited,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::UpstreamInternal,
            code => {
                let body_message = serde_json::from_slice::<Value>(body)
                    .ok()
                    .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
                    .filter(|m| !m.is_empty());
                let message = body_message
                    .or_else(|| status.canonical_reason().map(str::to_owned))
                    .unwrap_or_else(|| "未知错误".to_owned());
                Self::UpstreamOther {
                    status: code,
                    message,
                }
            }
        }
    }

    /// Map a transport level failure.
    pub fn from_transport(err: anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<TransportError>() {
            if e.is_no_response() {
                return Self::NetworkFailure;
            }
        }

        let message = err.to_string();
        if message.is_empty() {
            Self::Other("网络请求失败，请检查网络连接和 MCP Server 地址".to_owned())
        } else {
            Self::Other(message)
        }
    }

    /// Envelope `error.message`, or the generic failure text when empty.
    pub fn from_protocol(message: Option<&str>) -> Self {
        match message {
            Some(m) if !m.is_empty() => Self::ProtocolError(m.to_owned()),
            _ => Self::ProtocolError("请求失败".to_owned()),
        }
    }
}

#[cfg(test)]
mod test {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_from_status_specific() {
        assert!(matches!(
            RpcError::from_status(StatusCode::TOO_MANY_REQUESTS, b""),
            RpcError::RateLimited
        ));
        assert_eq!(
            RpcError::from_status(StatusCode::UNAUTHORIZED, b"{}").to_string(),
            "Token 无效或已过期，请重新设置"
        );
        assert!(matches!(
            RpcError::from_status(StatusCode::FORBIDDEN, b""),
            RpcError::Forbidden
        ));
        assert!(matches!(
            RpcError::from_status(StatusCode::NOT_FOUND, b""),
            RpcError::NotFound
        ));
        assert!(matches!(
            RpcError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b""),
            RpcError::UpstreamInternal
        ));
    }

    #[test]
    fn test_from_status_other() {
        assert_eq!(
            RpcError::from_status(StatusCode::BAD_GATEWAY, br#"{"message":"upstream down"}"#)
                .to_string(),
            "请求失败 (502): upstream down"
        );
        assert_eq!(
            RpcError::from_status(StatusCode::BAD_GATEWAY, b"<html></html>").to_string(),
            "请求失败 (502): Bad Gateway"
        );
        assert_eq!(
            RpcError::from_status(StatusCode::from_u16(599).unwrap(), br#"{"message":""}"#)
                .to_string(),
            "请求失败 (599): 未知错误"
        );
    }

    #[test]
    fn test_from_transport() {
        assert_eq!(
            RpcError::from_transport(anyhow!("expected value at line 1")).to_string(),
            "expected value at line 1"
        );
        assert_eq!(
            RpcError::from_transport(anyhow!("")).to_string(),
            "网络请求失败，请检查网络连接和 MCP Server 地址"
        );
    }

    #[test]
    fn test_from_protocol() {
        assert_eq!(RpcError::from_protocol(Some("bad tool")).to_string(), "bad tool");
        assert_eq!(RpcError::from_protocol(Some("")).to_string(), "请求失败");
        assert_eq!(RpcError::from_protocol(None).to_string(), "请求失败");
    }
}
