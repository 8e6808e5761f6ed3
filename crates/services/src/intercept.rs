use std::future::Future;

use anyhow::Result;
use axum::extract::Request as AxumRequest;
use axum::response::Response as AxumResponse;

use lib_utils::headers::apply_cors;

pub trait InterceptT: 'static + std::fmt::Debug + Clone + Send + Sync {
    /// Intercept request headers or body, return `Ok(())` to continue
    /// or error stop the request.
    fn intercept_request(
        &self,
        _request: &mut AxumRequest,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Intercept response headers or bodys, modify original response,
    /// return new [AxumResponse] or error.
    fn intercept_response(
        &self,
        _response: &mut AxumResponse,
    ) -> impl Future<Output = Result<Option<AxumResponse>>> + Send {
        async { Ok(None) }
    }
}

/// Adds the permissive CORS headers to every response, errors included.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorsInterceptor;

impl InterceptT for CorsInterceptor {
    #[tracing::instrument(level = "trace", skip_all, name = "CorsInterceptor")]
    async fn intercept_response(&self, response: &mut AxumResponse) -> Result<Option<AxumResponse>> {
        apply_cors(response.headers_mut());
        Ok(None)
    }
}
