pub mod available;
pub mod mine;
pub mod scan;
pub mod validity;

use std::time::Duration;

use lib_rpc::{McpClient, RpcError};

use available::{parse_available, AvailableCoupon};
use mine::{parse_mine, ClaimedCoupon};

/// Shown after a bulk claim, the upstream reports nothing per coupon
pub const CLAIM_DONE_MESSAGE: &str = "领取完成，请前往「已领取」中查看。";

/// Wait before refreshing the list after a claim
pub const CLAIM_REFRESH_DELAY: Duration = Duration::from_secs(1);

#[tracing::instrument(skip(client))]
pub async fn fetch_available(client: &McpClient) -> Result<Vec<AvailableCoupon>, RpcError> {
    let text = client.available_coupons().await?.text();
    let coupons = parse_available(&text);
    tracing::debug!("Got {} available coupons", coupons.len());
    Ok(coupons)
}

#[tracing::instrument(skip(client))]
pub async fn fetch_mine(client: &McpClient) -> Result<Vec<ClaimedCoupon>, RpcError> {
    let text = client.my_coupons().await?.text();
    let coupons = parse_mine(&text);
    tracing::debug!("Got {} claimed coupons", coupons.len());
    Ok(coupons)
}

/// Claim every available coupon, then refresh the available list after
/// [`CLAIM_REFRESH_DELAY`].
///
/// A failed refresh does not fail the claim.
#[tracing::instrument(skip(client))]
pub async fn claim_all(client: &McpClient) -> Result<ClaimOutcome, RpcError> {
    client.auto_bind_coupons().await?;
    tracing::info!("Bulk claim done");

    tokio::time::sleep(CLAIM_REFRESH_DELAY).await;

    let refreshed = fetch_available(client).await.inspect_err(|e| {
        tracing::warn!("Refresh after claim failed: {}", e);
    });

    Ok(ClaimOutcome {
        message: CLAIM_DONE_MESSAGE,
        refreshed,
    })
}

#[derive(Debug)]
pub struct ClaimOutcome {
    pub message: &'static str,
    /// Available coupons fetched after the claim
    pub refreshed: Result<Vec<AvailableCoupon>, RpcError>,
}

#[cfg(test)]
mod test {
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    use lib_rpc::{utils::Upstream, Credential};

    use super::*;

    /// Fake MCP endpoint answering each tool with a canned text
    async fn spawn() -> McpClient {
        let app = Router::new().route(
            "/api/mcp",
            post(|Json(body): Json<Value>| async move {
                let text = match body["params"]["name"].as_str() {
                    Some("available-coupons") => "- 优惠券标题：满30减5\n状态：未领取",
                    Some("my-coupons") => "## 薯条\n**优惠**: 5元 (限堂食)\n**标签**: 小食",
                    Some("auto-bind-coupons") => "已领取 1 张",
                    _ => "",
                };
                Json(json!({
                    "jsonrpc": "2.0",
                    "id": body["id"],
                    "result": {"content": [{"type": "text", "text": text}]}
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = McpClient::new(
            Upstream::LOCAL_PROXY_DEFAULT.with_custom(format!("http://{addr}/api/mcp")),
        );
        client.set_token(Credential::new("abcdefghijklmnop").unwrap());
        client
    }

    #[tokio::test]
    async fn test_fetch() {
        let client = spawn().await;

        let available = fetch_available(&client).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].title, "满30减5");

        let mine = fetch_mine(&client).await.unwrap();
        assert_eq!(mine[0].price, "5元");
        assert_eq!(mine[0].tags, vec!["小食".to_owned()]);
    }

    #[tokio::test]
    async fn test_claim_all() {
        let client = spawn().await;

        let started = std::time::Instant::now();
        let outcome = claim_all(&client).await.unwrap();
        assert!(started.elapsed() >= CLAIM_REFRESH_DELAY);
        assert_eq!(outcome.message, CLAIM_DONE_MESSAGE);
        assert_eq!(outcome.refreshed.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_without_token() {
        let client = McpClient::default();
        assert!(matches!(
            fetch_available(&client).await,
            Err(RpcError::CredentialMissing)
        ));
        assert!(matches!(
            claim_all(&client).await,
            Err(RpcError::CredentialMissing)
        ));
    }
}
