// ==========================================
// 防洪闸泵群实时调度 - 水力模型错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 水力模型调用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulatorError {
    #[error("模型配置失败: {0}")]
    ConfigureFailed(String),

    #[error("模型计算失败: {0}")]
    RunFailed(String),

    #[error("配置回写失败: {0}")]
    RegenerateFailed(String),

    #[error("结果序列不存在: entity={entity}, variable={variable}")]
    SeriesNotFound { entity: String, variable: String },

    #[error("结果序列为空: entity={entity}, variable={variable}")]
    EmptySeries { entity: String, variable: String },

    #[error("曲线缺失: structure={0}")]
    CurveMissing(String),

    #[error("模型实例池为空")]
    EmptyPool,

    #[error("并行求值线程异常退出: worker={0}")]
    WorkerPanicked(usize),
}

/// Result 类型别名
pub type SimResult<T> = Result<T, SimulatorError>;
