//! 产品数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 产品记录，对应 `products` 表中的一行
///
/// 反序列化时缺失的字段取零值，由校验规则而不是 JSON 解码来拒绝。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Product {
    /// 主键，创建时由数据库分配
    pub id: i64,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}
