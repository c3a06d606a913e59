//! # Product API
//!
//! 基于 Axum + SQLx 的产品 CRUD 服务：
//! - `GET /products` 列出全部产品
//! - `POST /products` 创建产品
//! - `PUT /products` 按 id 更新产品
//! - `DELETE /products/{id}` 按 id 删除产品
//!
//! 所有失败都以 `400` 和 `{"message": "..."}` 返回。

pub mod app;
pub mod core;
pub mod infrastructure;

pub use crate::app::build_app;
pub use crate::app::product::{PgProductRepository, Product, ProductRepository};
pub use crate::core::error::{ApiError, StorageError};
pub use crate::infrastructure::config::AppConfig;
