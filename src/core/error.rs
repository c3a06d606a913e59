//! 核心错误处理模块

use std::num::ParseIntError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;
use validator::ValidationErrors;

use super::response::ErrorEnvelope;

/// 持久化层错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("product name {0:?} already exists")]
    DuplicateName(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// 请求处理过程中的错误
///
/// 所有类型对外都表现为 `400 Bad Request` 加统一的 `{"message"}` 响应体。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求体不是合法的产品 JSON
    #[error("{0}")]
    Decode(String),

    /// JSON 合法但字段不满足约束
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// 路径参数无法解析为 id
    #[error(transparent)]
    PathParam(#[from] ParseIntError),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Decode(_) => "decode",
            ApiError::Validation(_) => "validation",
            ApiError::Storage(_) => "storage",
            ApiError::PathParam(_) => "path_param",
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let reason = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    format!("{}: {}", field, reason)
                })
            })
            .collect();
        messages.sort();

        ApiError::Validation(messages.join(", "))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Storage(StorageError::Database(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        warn!(kind = self.kind(), %message, "request rejected");

        (StatusCode::BAD_REQUEST, Json(ErrorEnvelope::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::Product;
    use validator::Validate;

    #[test]
    fn test_validation_message_lists_fields_in_order() {
        let err: ApiError = Product::new("", 0.0).validate().unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "name: must not be empty, price: must be greater than 0"
        );
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_parse_error_kept_verbatim() {
        let parse_err = "99999999999999999999".parse::<i64>().unwrap_err();
        let expected = parse_err.to_string();
        let err = ApiError::from(parse_err);
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.kind(), "path_param");
    }

    #[test]
    fn test_every_kind_is_bad_request() {
        let errors = vec![
            ApiError::Decode("EOF while parsing a value".into()),
            ApiError::Validation("name: must not be empty".into()),
            ApiError::Storage(StorageError::DuplicateName("chair".into())),
            ApiError::from(sqlx::Error::PoolTimedOut),
        ];
        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }
}
