// ==========================================
// 防洪闸泵群实时调度 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 行号均从 1 开始,与文本编辑器一致
// ==========================================

use crate::engine::WeightingError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    ReadError(String),

    // ===== 内容解析错误 =====
    #[error("数值解析失败 (行 {line}): {token}")]
    InvalidNumber { line: usize, token: String },

    #[error("时间标记格式错误 (行 {line}): {value}")]
    InvalidTimeMarker { line: usize, value: String },

    #[error("输入为空: {0}")]
    EmptyInput(String),

    // ===== 数据质量错误 =====
    #[error("指标矩阵不合法: {0}")]
    InvalidMatrix(#[from] WeightingError),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::ReadError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
