//! 核心中间件模块

use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::infrastructure::config::{ConfigError, CorsConfig};

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}

/// 为响应补上 JSON 内容类型，已设置的保持不变
pub async fn json_content_type(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .entry(header::CONTENT_TYPE)
        .or_insert(HeaderValue::from_static("application/json"));

    response
}

/// 根据配置构建 CORS 层；三项都未配置时返回 `None`
pub fn cors_layer(config: &CorsConfig) -> Result<Option<CorsLayer>, ConfigError> {
    if config.is_empty() {
        return Ok(None);
    }

    let mut layer = CorsLayer::new();

    let origins = split_list(&config.allowed_origins);
    if !origins.is_empty() {
        layer = if origins.contains(&"*") {
            layer.allow_origin(Any)
        } else {
            let values = origins
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin).map_err(|e| {
                        ConfigError::Validation(format!("invalid CORS origin {origin:?}: {e}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer.allow_origin(AllowOrigin::list(values))
        };
    }

    let headers = split_list(&config.allowed_headers);
    if !headers.is_empty() {
        layer = if headers.contains(&"*") {
            layer.allow_headers(Any)
        } else {
            let names = headers
                .iter()
                .map(|name| {
                    name.parse::<header::HeaderName>().map_err(|e| {
                        ConfigError::Validation(format!("invalid CORS header {name:?}: {e}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer.allow_headers(AllowHeaders::list(names))
        };
    }

    let methods = split_list(&config.allowed_methods);
    if !methods.is_empty() {
        layer = if methods.contains(&"*") {
            layer.allow_methods(Any)
        } else {
            let methods = methods
                .iter()
                .map(|method| {
                    Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|e| {
                        ConfigError::Validation(format!("invalid CORS method {method:?}: {e}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer.allow_methods(AllowMethods::list(methods))
        };
    }

    Ok(Some(layer))
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_skips_blanks() {
        assert_eq!(
            split_list(" http://a.test , ,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_cors_disabled_when_unconfigured() {
        assert!(cors_layer(&CorsConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_cors_layer_from_lists() {
        let config = CorsConfig {
            allowed_origins: "http://localhost:3000".to_string(),
            allowed_headers: "content-type,authorization".to_string(),
            allowed_methods: "get,post,put,delete".to_string(),
        };
        assert!(cors_layer(&config).unwrap().is_some());
    }

    #[test]
    fn test_cors_rejects_bad_header_name() {
        let config = CorsConfig {
            allowed_headers: "bad header".to_string(),
            ..CorsConfig::default()
        };
        assert!(matches!(
            cors_layer(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
