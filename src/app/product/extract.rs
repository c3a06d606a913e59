//! 产品请求提取器
//!
//! `ValidProduct` 在处理器运行前完成请求体的解码和校验，
//! 失败时直接返回错误响应，处理器不会被调用。

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use validator::Validate;

use super::model::Product;
use crate::core::error::ApiError;

/// 已解码并通过校验的产品
#[derive(Debug)]
pub struct ValidProduct(pub Product);

#[async_trait]
impl<S> FromRequest<S> for ValidProduct
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Decode(e.body_text()))?;

        let product = decode_product(&body)?;
        product.validate()?;

        Ok(ValidProduct(product))
    }
}

/// 请求体必须是 JSON 对象；数组和标量即使能按字段顺序填充也拒绝
fn decode_product(body: &[u8]) -> Result<Product, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::Decode(format!(
            "expected a JSON object, found {}",
            json_type_name(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `{id}` 路径段，路由守卫已保证只含数字
#[derive(Debug)]
pub struct NumericId(pub String);

impl NumericId {
    pub fn parse(&self) -> Result<i64, ApiError> {
        Ok(self.0.parse::<i64>()?)
    }
}

fn is_numeric_segment(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
impl<S> FromRequestParts<S> for NumericId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(NumericId(raw))
    }
}

/// `/products/{id}` 的路由守卫，在方法分发之前执行
///
/// `{id}` 不是纯数字时视为路由未匹配：任何方法都返回不带响应体和内容类型的 404。
pub async fn numeric_id_guard(Path(raw): Path<String>, req: Request, next: Next) -> Response {
    if !is_numeric_segment(&raw) {
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(req).await
}
