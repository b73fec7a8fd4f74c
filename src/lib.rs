// ==========================================
// 防洪闸泵群实时调度 - 核心库
// ==========================================
// 系统定位: 闸泵群滚动时域优化控制 (预测 -> 优化 -> 提交 -> 前移)
// 技术栈: Rust + 外部水力模型 (Simulator trait)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 控制参数、轨迹、曲线、时间序列
pub mod domain;

// 配置层 - 运行配置
pub mod config;

// 水力模型协作接口
pub mod simulator;

// 优化层 - NSGA-II 与单目标进化
pub mod optimizer;

// 引擎层 - 目标评价、优先级判定、熵权、滚动控制
pub mod engine;

// 导入层 - 外部文本数据
pub mod importer;

// 提交日志输出
pub mod report;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    BoundaryState, ControlParameters, ControlTrajectory, ControllerPhase, CurveData,
    DecisionBounds, OptimizationMode, PriorityLabel, SimulationWindow, StorageCurve, TimeSeries,
};

// 配置
pub use config::{ConfigManager, MpcConfig};

// 水力模型
pub use simulator::{ResultStore, Simulator, SimulatorError, SimulatorPool};

// 优化器
pub use optimizer::{DecisionPolicy, MultiObjectiveOptimizer, ParetoFront, SingleObjectiveOptimizer};

// 引擎
pub use engine::{
    entropy_weights, ControlError, ControlRunReport, FloodRiskObjectives, IterationReport,
    PriorityClassifier, RollingHorizonController,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "防洪闸泵群实时调度";
