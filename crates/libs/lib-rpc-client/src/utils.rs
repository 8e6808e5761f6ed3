use anyhow::Result;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::CrateError;

#[derive(Debug)]
pub struct ResponseExt<H, D> {
    /// Original request
    o_req: reqwest::Request,
    /// Response status
    resp_status: StatusCode,
    /// Original response headers, when `T` is actually `reqwest::Response`,
    /// this field will be `()` since `reqwest::Response` will not be consumed
    /// actively.
    resp_headers: H,
    /// Response `data`
    resp_data: D,
}

/// Raw response from upstream with original response.
pub type RawResponseExt = ResponseExt<(), reqwest::Response>;
/// Consumed response from upstream.
pub type ConsumedResponseExt<D = serde_json::Value> = ResponseExt<HeaderMap, Option<D>>;

impl RawResponseExt {
    pub fn new(o_req: reqwest::Request, resp_headers: (), resp_data: reqwest::Response) -> Self {
        Self {
            o_req,
            resp_status: resp_data.status(),
            resp_headers,
            resp_data,
        }
    }

    /// Consumes reqwest::Response and return `ConsumedResponseExt` with headers
    /// and simple Bytes, whatever the status is.
    #[tracing::instrument(skip(self))]
    pub async fn bytes_any(self) -> Result<ConsumedResponseExt<Bytes>> {
        let mut response = self.resp_data;
        let resp_headers = std::mem::take(response.headers_mut());
        let resp_data = response.bytes().await.map_err(CrateError::from)?;
        Ok(ConsumedResponseExt {
            o_req: self.o_req,
            resp_status: self.resp_status,
            resp_headers,
            resp_data: Some(resp_data),
        })
    }

    /// Consumes reqwest::Response and return `ConsumedResponseExt` with headers
    /// and deserialized JSON data, whatever the status is.
    ///
    /// Generic `D` defaults to be `serde_json::Value`, or you can specify one
    #[tracing::instrument(skip(self))]
    pub async fn json_any<D>(self) -> Result<ConsumedResponseExt<D>>
    where
        D: for<'de> serde::Deserialize<'de>,
    {
        let ResponseExt {
            o_req,
            resp_status,
            resp_headers,
            resp_data,
        } = self.bytes_any().await?;

        let resp_data = match resp_data {
            Some(bytes) => Some(serde_json::from_slice::<D>(&bytes).map_err(|e| {
                tracing::error!(
                    "Invalid JSON response with HTTP StatusCode [{}]: {}",
                    resp_status.as_u16(),
                    e
                );
                CrateError::from(e)
            })?),
            None => None,
        };

        Ok(ConsumedResponseExt {
            o_req,
            resp_status,
            resp_headers,
            resp_data,
        })
    }
}

// ======== impl for ConsumedResponseExt ========

impl<D> ConsumedResponseExt<D> {
    /// Break [`ConsumedResponseExt`] into parts
    pub fn into_parts(self) -> (reqwest::Request, StatusCode, HeaderMap, Option<D>) {
        (self.o_req, self.resp_status, self.resp_headers, self.resp_data)
    }
}

#[cfg(test)]
mod test {
    use axum::{routing::post, Router};
    use serde_json::Value;

    use crate::client::rest::RestRequest;

    use super::*;

    async fn spawn(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/", post(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/")
    }

    async fn post_to(url: &str) -> RawResponseExt {
        RestRequest::builder()
            .url(url)
            .build()
            .unwrap()
            .post()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_any_keeps_status() {
        let url = spawn(StatusCode::TOO_MANY_REQUESTS, r#"{"message":"slow down"}"#).await;

        let (_, status, _, data) = post_to(&url)
            .await
            .json_any::<Value>()
            .await
            .unwrap()
            .into_parts();
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(data.unwrap()["message"], "slow down");
    }

    #[tokio::test]
    async fn test_json_any_invalid_body() {
        let url = spawn(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await;

        let err = post_to(&url).await.json_any::<Value>().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CrateError>(),
            Some(CrateError::Json(_))
        ));

        let (_, _, _, data) = post_to(&url).await.bytes_any().await.unwrap().into_parts();
        assert_eq!(data.unwrap().as_ref(), b"<html>bad gateway</html>");
    }
}
