use axum::response::IntoResponse;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::error;

#[derive(Serialize, Deserialize, Clone)]
struct ErrorResponse {
    pub code: i64,
    pub message: String,
}

pub trait TError<'e>: Sized + std::error::Error {
    fn e_code(&self) -> i64 {
        5_500_000
    }
    fn e_message(&'e self) -> std::borrow::Cow<'e, str> {
        Cow::Borrowed("服务器内部错误")
    }
    /// HTTP status of the error response, derived from the middle three
    /// digits of `e_code`.
    fn e_status(&self) -> StatusCode {
        let code = self.e_code().unsigned_abs();
        u16::try_from(code / 1_000 % 1_000)
            .ok()
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
    fn e_response(&'e self) -> axum::response::Response {
        (
            self.e_status(),
            axum::response::Json(ErrorResponse {
                code: self.e_code(),
                message: self.e_message().to_string(),
            }),
        )
            .into_response()
    }
}

/// Coded errors of the server itself, `x_sss_yyy` where `sss` is the HTTP status.
#[derive(
    Copy,
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    num_enum::FromPrimitive,
    num_enum::IntoPrimitive,
    thiserror::Error,
)]
#[repr(i64)]
pub enum ServerError {
    /// OK 不是错误, 占位
    #[error("OK")]
    Ok = 0,
    /// 请求路径不存在
    #[error("请求路径不存在")]
    NotFound = 4_404_000,
    #[num_enum(default)]
    /// 服务器内部错误(兜底)
    #[error("服务器内部错误")]
    General = 5_500_000,
    /// 序列化相关错误
    #[error("服务器内部错误: 序列化错误")]
    Serialization = 5_500_101,
    /// 不支持的服务: 未知路径
    #[error("服务器内部错误: 不支持的服务")]
    ServicesUnsupported = 5_501_201,
}

impl<'e> TError<'e> for ServerError {
    fn e_code(&self) -> i64 {
        Into::<i64>::into(*self)
    }
    fn e_message(&self) -> Cow<'e, str> {
        self.to_string().into()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        self.e_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerErrorExt {
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error(transparent)]
    Any { source: anyhow::Error },
    #[error("{message}")]
    Custom { code: i64, message: String },
}

impl<'e> TError<'e> for ServerErrorExt {
    fn e_code(&self) -> i64 {
        match self {
            Self::Server(e) => e.e_code(),
            Self::Any { source } => {
                if let Some(e) = source.downcast_ref::<Self>() {
                    e.e_code()
                } else if let Some(e) = source.downcast_ref::<ServerError>() {
                    e.e_code()
                } else {
                    5_500_000
                }
            }
            Self::Custom { code, .. } => *code,
        }
    }
    fn e_message(&'e self) -> Cow<'e, str> {
        match self {
            Self::Server(e) => e.e_message(),
            Self::Any { source } => {
                if let Some(e) = source.downcast_ref::<Self>() {
                    e.e_message()
                } else if let Some(e) = source.downcast_ref::<ServerError>() {
                    e.e_message()
                } else {
                    error!("Unknown anyhow error: {:?}", source);
                    "服务器内部错误".into()
                }
            }
            Self::Custom { message, .. } => message.into(),
        }
    }
}

impl IntoResponse for ServerErrorExt {
    fn into_response(self) -> axum::response::Response {
        self.e_response()
    }
}

impl From<anyhow::Error> for ServerErrorExt {
    fn from(e: anyhow::Error) -> Self {
        let err = match e.downcast::<ServerError>() {
            Ok(err) => return Self::Server(err),
            Err(err) => err,
        };

        Self::Any { source: err }
    }
}
