//! 应用层

pub mod product;

use std::{sync::Arc, time::Duration};

use axum::{middleware, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::core::middleware::{cors_layer, request_logging_middleware};
use crate::infrastructure::config::{AppConfig, ConfigError};
use product::{AppState, ProductRepository};

/// 组装完整的应用：产品路由加上日志、超时和 CORS 中间件
pub fn build_app(
    repository: Arc<dyn ProductRepository>,
    config: &AppConfig,
) -> Result<Router, ConfigError> {
    let mut app = product::routes::router(AppState::new(repository))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_seconds,
        )));

    if let Some(cors) = cors_layer(&config.cors)? {
        app = app.layer(cors);
    }

    Ok(app)
}
