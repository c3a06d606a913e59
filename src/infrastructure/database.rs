//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;

use super::config::DatasourceConfig;

const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    price DOUBLE PRECISION NOT NULL
)
"#;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatasourceConfig) -> Result<Self, Error> {
        info!("Connecting to database: {}", config.redacted_url());
        Self::new(&config.url(), config.max_connections).await
    }

    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(120))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 查询服务端版本，同时验证连接可用
    pub async fn server_version(&self) -> Result<String, Error> {
        let (version,): (String,) = sqlx::query_as("SELECT version()")
            .fetch_one(&self.pool)
            .await?;

        Ok(version)
    }

    /// 创建 `products` 表（已存在时不做任何事）
    pub async fn ensure_schema(&self) -> Result<(), Error> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&self.pool)
            .await?;

        info!("Table products is ready");
        Ok(())
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
