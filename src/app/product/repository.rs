//! 产品持久化
//!
//! 每个操作对应一条 SQL 语句，不使用事务，不重试。

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::model::Product;
use crate::core::error::StorageError;

/// 产品持久化接口
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 读取全部产品，顺序由数据库决定
    async fn find_all(&self) -> Result<Vec<Product>, StorageError>;

    /// 插入新产品，忽略 `product.id`
    async fn create(&self, product: &Product) -> Result<(), StorageError>;

    /// 按 `product.id` 覆盖名称和价格；没有匹配的行也视为成功
    async fn update(&self, product: &Product) -> Result<(), StorageError>;

    /// 按 id 删除；没有匹配的行也视为成功
    async fn delete(&self, id: i64) -> Result<(), StorageError>;
}

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 唯一约束冲突映射为 `DuplicateName`，其余原样保留
fn map_write_error(err: sqlx::Error, product: &Product) -> StorageError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::DuplicateName(product.name.clone())
        }
        _ => StorageError::Database(err),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        let products = sqlx::query_as::<_, Product>("SELECT id, name, price FROM products")
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn create(&self, product: &Product) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO products (name, price) VALUES ($1, $2)")
            .bind(&product.name)
            .bind(product.price)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, product))?;

        debug!(name = %product.name, "product inserted");
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE products SET name = $1, price = $2 WHERE id = $3")
            .bind(&product.name)
            .bind(product.price)
            .bind(product.id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, product))?;

        debug!(id = product.id, rows = result.rows_affected(), "product updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, rows = result.rows_affected(), "product deleted");
        Ok(())
    }
}
