use anyhow::Result;
use axum::response::IntoResponse;
use bytes::{BufMut, BytesMut};
use http::{header, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;

use std::{collections::HashMap, fmt::Debug as StdDebug};

use crate::error::{ServerError, ServerErrorExt, TError};

/// `{code, message, data}` body for the server's own (non-proxied) routes.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralResponse<T: StdDebug + Serialize> {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(bound(deserialize = "T: Deserialize<'de> + Clone"))]
    data: Option<T>,

    /// Tracing information
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    logger: HashMap<String, String>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: StdDebug + Serialize> Default for GeneralResponse<T> {
    fn default() -> Self {
        Self {
            code: 0,
            message: "".to_owned(),
            data: None,
            logger: HashMap::with_capacity(4),
            status: StatusCode::OK,
        }
    }
}

impl<T: StdDebug + Serialize> IntoResponse for GeneralResponse<T> {
    #[tracing::instrument(level = "debug", name = "GeneralResponse into_response")]
    fn into_response(self) -> axum::response::Response {
        let mut buf = BytesMut::with_capacity(128).writer();
        serde_json::to_writer(&mut buf, &self).map_or_else(
            |e| {
                error!("serde_json::to_writer error: {}", e);
                ServerError::Serialization.into_response()
            },
            |_| {
                (
                    self.status,
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )],
                    buf.into_inner().freeze(),
                )
                    .into_response()
            },
        )
    }
}

impl<T: StdDebug + Serialize> From<Result<T>> for GeneralResponse<T> {
    fn from(service_result: Result<T>) -> Self {
        match service_result {
            Ok(data) => Self::new(data),
            Err(err) => {
                let err = ServerErrorExt::from(err);
                Self::new_error(err.e_code(), err.e_message()).with_status(err.e_status())
            }
        }
    }
}

impl<T: StdDebug + Serialize> GeneralResponse<T> {
    /// Create a new [GeneralResponse] with data.
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    /// Create a new [GeneralResponse] with error tracing infos.
    pub fn new_error(code: i64, message: impl ToString) -> Self {
        let mut response = Self {
            code,
            message: message.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            ..Default::default()
        };

        let context = {
            use tracing_opentelemetry::OpenTelemetrySpanExt;
            // OpenTelemetry Context is propagation inside code is done via tracing crate
            tracing::Span::current().context()
        };

        opentelemetry::global::get_text_map_propagator(|propagator| {
            propagator.inject_context(&context, &mut response.logger);
        });

        response
    }

    /// Override the HTTP status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}
