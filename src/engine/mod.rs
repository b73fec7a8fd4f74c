// ==========================================
// 防洪闸泵群实时调度 - 引擎层
// ==========================================
// 职责: 目标评价、优先子流域判定、熵权计算、滚动时域控制
// 红线: 引擎只经 Simulator trait 访问水力模型
// ==========================================

pub mod controller;
pub mod events;
pub mod objective;
pub mod priority;
pub mod weighting;

// 重导出核心引擎
pub use controller::{
    quantize, round_half_up, ControlError, ControlResult, ControlRunReport, IterationReport,
    RollingHorizonController, QUANTIZE_SCALE,
};
pub use events::{
    ControlEvent, ControlEventPublisher, ControlEventType, NoOpEventPublisher,
    OptionalEventPublisher,
};
pub use objective::FloodRiskObjectives;
pub use priority::{BasinIndicators, ClassifierResult, PriorityAssessment, PriorityClassifier};
pub use weighting::{
    entropy_weights, format_weights, IndicatorMatrix, WeightVector, WeightingError,
    WeightingResult,
};
