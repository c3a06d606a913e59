//! 产品资源：模型、持久化、提取器、处理器与路由

pub mod extract;
pub mod handler;
pub mod model;
pub mod repository;
pub mod routes;

pub use handler::AppState;
pub use model::Product;
pub use repository::{PgProductRepository, ProductRepository};
