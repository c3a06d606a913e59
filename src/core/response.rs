//! 核心响应处理模块

use serde::{Deserialize, Serialize};

/// 统一的错误响应体: `{"message": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
