//! 应用配置
//!
//! 先读取 `<dir>/application.toml`，再按激活的 profile 依次叠加
//! `<dir>/application-<profile>.toml`，后读取的值覆盖先读取的值。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// 配置目录的环境变量
pub const CONFIG_DIR_ENV: &str = "APP_CONFIG_DIR";
/// 激活 profile 的环境变量，优先于配置文件中的 `profiles`
pub const PROFILES_ENV: &str = "APP_PROFILES";

const DEFAULT_CONFIG_DIR: &str = "config";
const BASE_NAME: &str = "application";

/// 应用配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub datasource: DatasourceConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    /// 逗号分隔的 profile 列表
    pub profiles: String,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 单个请求的超时时间（秒）
    pub timeout_seconds: u64,
    /// 停机时等待连接池关闭的时间（秒）
    pub shutdown_timeout_seconds: u64,
}

/// 数据库配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// 启动时是否创建 `products` 表
    pub create_schema: bool,
}

/// CORS 配置，各项均为逗号分隔的列表，空字符串表示不设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: String,
    pub allowed_headers: String,
    pub allowed_methods: String,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 日志文件目录，未设置时只输出到控制台
    pub log_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            timeout_seconds: 10,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: String::new(),
            password: String::new(),
            database: String::new(),
            max_connections: 10,
            create_schema: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "product-api".to_string(),
        }
    }
}

impl DatasourceConfig {
    /// 连接串
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    /// 隐藏密码后的连接串，用于日志
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }
}

impl CorsConfig {
    pub fn is_empty(&self) -> bool {
        self.allowed_origins.trim().is_empty()
            && self.allowed_headers.trim().is_empty()
            && self.allowed_methods.trim().is_empty()
    }
}

impl AppConfig {
    /// 从环境变量指定的目录加载配置
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        let profiles = std::env::var(PROFILES_ENV).ok();
        Self::load(dir, profiles.as_deref())
    }

    /// 从目录加载配置并叠加 profile
    ///
    /// `profiles_override` 不为 `None` 时替代文件中的 `profiles` 键。
    pub fn load<P: AsRef<Path>>(
        dir: P,
        profiles_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let mut table = Table::new();

        let base = dir.join(format!("{BASE_NAME}.toml"));
        if base.exists() {
            merge_tables(&mut table, read_table(&base)?);
        }

        let profiles = match profiles_override {
            Some(raw) => raw.to_string(),
            None => match table.get("profiles") {
                Some(Value::String(raw)) => raw.clone(),
                _ => String::new(),
            },
        };

        for profile in profiles.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let path = dir.join(format!("{BASE_NAME}-{profile}.toml"));
            merge_tables(&mut table, read_table(&path)?);
        }

        let mut config: AppConfig = Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        config.profiles = profiles;
        config.validate()?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasource.database.is_empty() {
            return Err(ConfigError::Validation(
                "database is not set, please set datasource.database".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be greater than 0".to_string()));
        }
        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "server.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.datasource.max_connections == 0 {
            return Err(ConfigError::Validation(
                "datasource.max_connections must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid log level: {}, expected one of {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }

    /// 激活的 profile 列表
    pub fn active_profiles(&self) -> Vec<&str> {
        self.profiles
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

fn read_table(path: &Path) -> Result<Table, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::FileRead(format!("{}: {}", path.display(), e)))?;

    toml::from_str::<Table>(&content)
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
}

/// 深度合并，`overlay` 中的值覆盖 `base`
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match value {
            Value::Table(incoming) => match base.get_mut(&key) {
                Some(Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Validation(String),
}
