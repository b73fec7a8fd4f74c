// ==========================================
// 防洪闸泵群实时调度 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::ParameterError;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置值错误 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("环境变量格式错误 ({key}={value})")]
    InvalidOverride { key: String, value: String },

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl ConfigError {
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
