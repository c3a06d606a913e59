//! 产品路由

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use super::extract::numeric_id_guard;
use super::handler::{self, AppState};
use crate::core::middleware::json_content_type;

pub const PRODUCTS_PATH: &str = "/products";

/// 注册产品的四个路由
///
/// | 方法 | 路径 |
/// |---|---|
/// | GET | `/products` |
/// | POST | `/products` |
/// | PUT | `/products` |
/// | DELETE | `/products/{id}` |
///
/// `{id}` 只匹配数字，由 `numeric_id_guard` 包在整个方法路由外层实现，
/// 因此非数字路径对所有方法都是 404 而不是 405。
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            PRODUCTS_PATH,
            get(handler::all)
                .post(handler::create)
                .put(handler::update)
                .route_layer(middleware::from_fn(json_content_type)),
        )
        .route(
            &format!("{PRODUCTS_PATH}/:id"),
            delete(handler::delete)
                .route_layer(middleware::from_fn(json_content_type))
                .layer(middleware::from_fn(numeric_id_guard)),
        )
        .with_state(state)
}
