pub mod handler;
pub mod intercept;

use axum::{routing::any, Router};
use serde_json::json;

use handler::{
    mcp::{McpProxyHandler, UpstreamT},
    DefaultHandler, InterceptHandler,
};
use intercept::CorsInterceptor;
use lib_utils::model::response::GeneralResponse;

pub type HandlerFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = axum::response::Response> + Send>>;

/// Proxy path
pub const MCP_PATH: &str = "/api/mcp";

/// All routes of the server, the proxy forwarding to `upstream`.
pub fn router<U: UpstreamT>(upstream: U) -> Router {
    Router::new()
        .route(
            MCP_PATH,
            any::<_, (), _>(InterceptHandler::new(
                Some(CorsInterceptor),
                McpProxyHandler::new(upstream),
                "MCP proxy",
            )),
        )
        .route(
            "/health",
            any(|| async { GeneralResponse::new(json!({ "status": "ok" })) }),
        )
        .fallback::<_, ()>(InterceptHandler::new(
            Some(CorsInterceptor),
            DefaultHandler,
            "Fallback",
        ))
}

#[cfg(test)]
mod test {
    use axum::{body::Body, http::StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use handler::mcp::ReqwestUpstream;

    #[tokio::test]
    async fn test_health() {
        let req = http::Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router(ReqwestUpstream::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["status"], "ok");
    }
}
