// ==========================================
// 防洪闸泵群实时调度 - 领域模型层
// ==========================================
// 职责: 定义控制参数、调度轨迹、曲线、时间序列等领域对象
// 红线: 不含模拟调用,不含优化逻辑
// ==========================================

pub mod control;
pub mod curve;
pub mod series;
pub mod types;

// 重导出核心类型
pub use control::{
    BoundaryState, ControlParameters, ControlTrajectory, DecisionBounds, ParameterError,
    SimulationWindow,
};
pub use curve::{CurveData, CurveError, StorageCurve};
pub use series::{TimeSeries, MIN_LEAD_TIME_MINUTES};
pub use types::{ControllerPhase, OptimizationMode, PriorityLabel};
