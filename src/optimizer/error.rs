// ==========================================
// 防洪闸泵群实时调度 - 优化器错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::simulator::SimulatorError;
use thiserror::Error;

/// 优化器错误类型
///
/// 单个候选解的模型失败不会出现在这里（按哨兵目标值处理）
#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("优化器配置非法: {0}")]
    InvalidConfig(String),

    #[error("种群为空")]
    EmptyPopulation,

    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

/// Result 类型别名
pub type OptimizerResult<T> = Result<T, OptimizerError>;
