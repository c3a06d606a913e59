//! 测试用的仓储实现与请求辅助函数

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use product_api::{build_app, AppConfig, Product, ProductRepository, StorageError};
use tokio::sync::RwLock;
use tower::ServiceExt;

/// 内存仓储，行为与 `products` 表一致：自增 id，名称唯一
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    inner: Arc<RwLock<Store>>,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    rows: Vec<Product>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self) -> Vec<Product> {
        self.inner.read().await.rows.clone()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        Ok(self.inner.read().await.rows.clone())
    }

    async fn create(&self, product: &Product) -> Result<(), StorageError> {
        let mut store = self.inner.write().await;
        if store.rows.iter().any(|p| p.name == product.name) {
            return Err(StorageError::DuplicateName(product.name.clone()));
        }

        store.next_id += 1;
        let row = product.clone().with_id(store.next_id);
        store.rows.push(row);
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), StorageError> {
        let mut store = self.inner.write().await;
        if store
            .rows
            .iter()
            .any(|p| p.id != product.id && p.name == product.name)
        {
            return Err(StorageError::DuplicateName(product.name.clone()));
        }

        if let Some(row) = store.rows.iter_mut().find(|p| p.id == product.id) {
            row.name = product.name.clone();
            row.price = product.price;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.inner.write().await.rows.retain(|p| p.id != id);
        Ok(())
    }
}

/// 所有操作都失败的仓储，模拟数据库不可用
pub struct UnavailableRepository;

#[async_trait]
impl ProductRepository for UnavailableRepository {
    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn create(&self, _product: &Product) -> Result<(), StorageError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn update(&self, _product: &Product) -> Result<(), StorageError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn delete(&self, _id: i64) -> Result<(), StorageError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

pub fn app_with(repository: Arc<dyn ProductRepository>) -> Router {
    build_app(repository, &AppConfig::default()).unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap().to_string()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}
