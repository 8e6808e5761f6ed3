use anyhow::{anyhow, Result};
use http::{HeaderMap, Method};
use reqwest::Client;
use url::Url;

use std::{sync::OnceLock, time::Duration};

use crate::{utils::RawResponseExt, CrateError};

/// Shared client, internally pooled
static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Init the shared client.
///
/// Return error if CLIENT is already inited.
#[tracing::instrument]
pub fn init_reqwest_client() -> Result<()> {
    CLIENT.set(gen_client()?).map_err(|_| {
        tracing::error!("CLIENT should be initialized only once");
        anyhow!("CLIENT should be initialized only once")
    })
}

/// Generate reqwest::Client
#[tracing::instrument]
fn gen_client() -> Result<reqwest::Client> {
    Client::builder()
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .tcp_keepalive(Some(Duration::from_secs(3600)))
        .tcp_nodelay(true)
        .pool_idle_timeout(Duration::from_secs(90))
        .http2_keep_alive_interval(Some(Duration::from_secs(18)))
        .http2_keep_alive_while_idle(true)
        .http2_keep_alive_timeout(Duration::from_secs(16))
        .build()
        .map_err(|e| anyhow!(CrateError::from(e)))
}

/// Get the shared reqwest::Client, building one on first use
#[tracing::instrument]
fn get_client() -> Result<reqwest::Client> {
    if let Some(client) = CLIENT.get() {
        tracing::trace!("Got reqwest::Client from cache");
        return Ok(client.clone());
    }

    tracing::warn!("CLIENT should be initialized before get_client!!!");
    let client = gen_client()?;
    Ok(CLIENT.get_or_init(|| client).clone())
}

/// [`RestRequest`] with ideal url, headers and body.
///
/// **Recommended** Use [`RestRequestBuilder`] to build [`RestRequest`]
#[derive(Debug)]
pub struct RestRequest {
    pub url: Url,
    pub headers: Option<HeaderMap>,
    pub body: Option<reqwest::Body>,
}

impl RestRequest {
    #[inline]
    pub fn builder<'c>() -> RestRequestBuilder<'c> {
        RestRequestBuilder::default()
    }

    /// POST request with given url, headers and body.
    ///
    /// Jsut a shortcut for `execute` a POST request
    #[inline]
    pub async fn post(self) -> Result<RawResponseExt> {
        self.execute(Method::POST).await
    }

    /// Execute request with given method, url, headers and body.
    ///
    /// A failure before any response arrives is returned as
    /// [`CrateError::Request`].
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn execute(self, method: Method) -> Result<RawResponseExt> {
        let client = get_client()?;

        let request = {
            let mut r = reqwest::Request::new(method, self.url);
            if let Some(headers) = self.headers {
                *r.headers_mut() = headers;
            }
            *r.body_mut() = self.body;
            r
        };

        let o_req = request
            .try_clone()
            .ok_or_else(|| anyhow!(CrateError::BodyNotCloneable))?;

        let response = client.execute(request).await.map_err(|e| {
            tracing::error!("Request to upstream failed: {}", e);
            anyhow!(CrateError::Request { source: e })
        })?;

        Ok(RawResponseExt::new(o_req, (), response))
    }
}

#[derive(Default)]
pub struct RestRequestBuilder<'r> {
    url: Option<&'r str>,
    headers: Option<HeaderMap>,
    body: Option<reqwest::Body>,
}

impl<'c> RestRequestBuilder<'c> {
    /// Configure url for the request
    #[inline]
    pub fn url(mut self, url: &'c str) -> Self {
        self.url = Some(url);
        self
    }

    /// Configure headers for the request
    ///
    /// DO NOT pass expr `None` directly here, or you have to specify the type of Option<T>
    #[inline]
    pub fn headers(mut self, headers: Option<impl Into<HeaderMap>>) -> Self {
        self.headers = headers.map(|h| h.into());
        self
    }

    /// Configure body for the request
    ///
    /// DO NOT pass expr `None` directly here, or you have to specify the type of Option<T>
    #[inline]
    pub fn body(mut self, body: Option<impl Into<reqwest::Body>>) -> Self {
        self.body = body.map(|b| b.into());
        self
    }

    /// Build RestRequest
    #[inline]
    pub fn build(self) -> Result<RestRequest> {
        let url = self
            .url
            .ok_or_else(|| anyhow!("url is required for RestRequest"))?;
        let url: Url = url.parse().map_err(|e| CrateError::UrlParse {
            url: url.to_owned(),
            source: e,
        })?;

        Ok(RestRequest {
            url,
            headers: self.headers,
            body: self.body,
        })
    }
}

#[cfg(test)]
mod test {
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;

    async fn spawn_echo() -> String {
        let app = Router::new().route(
            "/echo",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                (StatusCode::ACCEPTED, Json(json!({"auth": auth, "body": body})))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/echo")
    }

    #[tokio::test]
    async fn test_post_json() {
        let url = spawn_echo().await;

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc".parse().unwrap());
        headers.insert("content-type", "application/json".parse().unwrap());

        let response = RestRequest::builder()
            .url(&url)
            .headers(Some(headers))
            .body(Some(r#"{"id":1}"#))
            .build()
            .unwrap()
            .post()
            .await
            .unwrap();

        let (_, status, _, data) = response.json_any::<Value>().await.unwrap().into_parts();
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(data.unwrap(), json!({"auth": "Bearer abc", "body": {"id": 1}}));
    }

    #[tokio::test]
    async fn test_no_response() {
        // Bind then drop to get a port nobody listens on
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let url = format!("http://{addr}/");

        let err = RestRequest::builder()
            .url(&url)
            .build()
            .unwrap()
            .post()
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<CrateError>().unwrap().is_no_response());
    }

    #[test]
    fn test_build_invalid_url() {
        let err = RestRequest::builder().url("not a url").build().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CrateError>(),
            Some(CrateError::UrlParse { .. })
        ));
    }
}
