// ==========================================
// 防洪闸泵群实时调度 - 滚动时域控制器
// ==========================================
// 用途: 协调 预测 -> 优化 -> 量化 -> 提交 -> 回写 的滚动执行顺序
// 周期数: T - H (T 为时间标记数, H 为预测时段数), T <= H 时不执行
// 状态: Idle -> Predicting -> Optimizing -> Committing -> Advancing -> (Predicting | Done)
// 红线: 只提交近端时段; 模型级失败中止整个运行,不重试
// ==========================================

use super::events::{ControlEvent, ControlEventType, OptionalEventPublisher};
use super::objective::FloodRiskObjectives;
use super::priority::PriorityClassifier;
use crate::config::{ConfigError, MpcConfig};
use crate::domain::{
    BoundaryState, ControlTrajectory, ControllerPhase, CurveData, OptimizationMode,
    PriorityLabel, SimulationWindow,
};
use crate::importer::ImportError;
use crate::optimizer::{
    seeded_rng, MultiObjectiveOptimizer, ObjectiveModel, ObjectiveVector, OptimizationContext,
    OptimizerError, OptimizerRng, SingleObjectiveOptimizer, TerminationReason,
    SENTINEL_OBJECTIVES,
};
use crate::perf::PerfGuard;
use crate::simulator::{simulate, ResultStore, Simulator, SimulatorError, SimulatorPool};
use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn, Span};
use uuid::Uuid;

/// 下发值保留的小数位数
pub const QUANTIZE_SCALE: u32 = 2;

// ==========================================
// ControlError - 控制层错误
// ==========================================
#[derive(Error, Debug)]
pub enum ControlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Simulator(#[from] SimulatorError),

    #[error(transparent)]
    Optimizer(#[from] OptimizerError),

    #[error("时间标记不足: 起点 {start_index} 之后需要 {segments} 个时段, 共 {markers} 个标记")]
    WindowOutOfRange {
        start_index: usize,
        segments: usize,
        markers: usize,
    },

    #[error("第 {iteration} 周期没有可下发的决策（全部候选解失败）")]
    NoDecision { iteration: usize },

    #[error("决策向量长度 {actual} 与布局 {expected} 不符")]
    LayoutMismatch { expected: usize, actual: usize },
}

/// Result 类型别名
pub type ControlResult<T> = Result<T, ControlError>;

// ==========================================
// 报告
// ==========================================

/// 单个周期的执行报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationReport {
    pub iteration: usize,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub mode: OptimizationMode,
    /// 单目标模式下的优先子流域
    pub label: Option<PriorityLabel>,
    /// 基准工况（无控制轨迹）的目标值
    pub baseline_objectives: Option<ObjectiveVector>,
    /// 选中决策的目标值
    pub chosen_objectives: Option<ObjectiveVector>,
    /// 多目标模式下的前沿规模
    pub front_size: usize,
    pub generations: u64,
    pub evaluations: usize,
    pub termination: TerminationReason,
    /// 优化耗时（毫秒）
    pub elapsed_ms: u64,
    /// 量化后的完整决策（设备优先布局）
    pub decision: Vec<f64>,
    /// 实际提交的 (时刻, 各设备开度)
    pub committed: Vec<(NaiveDateTime, Vec<f64>)>,
}

/// 一次滚动调度的完整报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlRunReport {
    pub run_id: String,
    pub iterations: Vec<IterationReport>,
    pub schedule: BoundaryState,
}

// ==========================================
// 量化
// ==========================================

/// 十进制四舍五入（半数远离零）
///
/// 按最短十进制表示取整: `round_half_up(1.005, 2) == 1.01`
pub fn round_half_up(value: f64, scale: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(scale as i32);
    // 移位在十进制文本上完成，避免 1.005 * 100 = 100.49999... 的二进制误差
    let shifted = format!("{}e{}", value, scale)
        .parse::<f64>()
        .unwrap_or(value * factor);
    shifted.signum() * (shifted.abs() + 0.5).floor() / factor
}

/// 决策值换算为下发开度: round_half_up(value / scale, 2)
pub fn quantize(value: f64, device_scale: f64) -> f64 {
    round_half_up(value / device_scale, QUANTIZE_SCALE)
}

// ==========================================
// RollingHorizonController - 滚动时域控制器
// ==========================================
pub struct RollingHorizonController<S, M = FloodRiskObjectives>
where
    S: Simulator,
    M: ObjectiveModel,
{
    config: MpcConfig,
    pool: SimulatorPool<S>,
    curves: CurveData,
    model: M,
    classifier: PriorityClassifier,
    moea: MultiObjectiveOptimizer,
    single: SingleObjectiveOptimizer,
    boundary: BoundaryState,
    phase: ControllerPhase,
    rng: OptimizerRng,
    events: OptionalEventPublisher,
    span: Span,
}

impl<S: Simulator> RollingHorizonController<S, FloodRiskObjectives> {
    /// 使用洪水风险目标模型构造
    ///
    /// # 参数
    /// - config: 运行配置（构造时校验）
    /// - pool: 模型实例池,主实例用于预测与回写
    /// - curves: 库容曲线
    /// - span: 调用方注入的追踪上下文
    pub fn new(
        config: MpcConfig,
        pool: SimulatorPool<S>,
        curves: CurveData,
        span: Span,
    ) -> ControlResult<Self> {
        let model = FloodRiskObjectives::new(config.network.clone());
        Self::with_model(config, pool, curves, model, span)
    }
}

impl<S, M> RollingHorizonController<S, M>
where
    S: Simulator,
    M: ObjectiveModel,
{
    pub fn with_model(
        config: MpcConfig,
        pool: SimulatorPool<S>,
        curves: CurveData,
        model: M,
        span: Span,
    ) -> ControlResult<Self> {
        config.validate()?;

        Ok(Self {
            classifier: PriorityClassifier::new(config.network.clone()),
            moea: MultiObjectiveOptimizer::new(config.optimizer.clone(), span.clone()),
            single: SingleObjectiveOptimizer::new(config.optimizer.clone(), span.clone()),
            rng: seeded_rng(config.optimizer.seed),
            config,
            pool,
            curves,
            model,
            boundary: BoundaryState::new(),
            phase: ControllerPhase::Idle,
            events: OptionalEventPublisher::none(),
            span,
        })
    }

    /// 设置控制事件发布者
    pub fn with_events(mut self, events: OptionalEventPublisher) -> Self {
        self.events = events;
        self
    }

    /// 以已有调度作为初始边界状态（热启动）
    pub fn with_boundary(mut self, boundary: BoundaryState) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn boundary(&self) -> &BoundaryState {
        &self.boundary
    }

    pub fn config(&self) -> &MpcConfig {
        &self.config
    }

    pub fn pool(&self) -> &SimulatorPool<S> {
        &self.pool
    }

    fn set_phase(&mut self, phase: ControllerPhase) {
        debug!(parent: &self.span, from = %self.phase, to = %phase, "控制器状态切换");
        self.phase = phase;
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 在给定时间标记上执行完整滚动调度
    ///
    /// # 返回
    /// T - H 个周期报告与最终调度
    ///
    /// # 错误
    /// 预测计算、配置回写等模型级失败立即中止
    pub fn run(&mut self, markers: &[NaiveDateTime]) -> ControlResult<ControlRunReport> {
        let run_id = Uuid::new_v4().to_string();
        let segments = self.config.control.segments();
        let iterations = markers.len().saturating_sub(segments);

        info!(
            parent: &self.span,
            %run_id,
            markers = markers.len(),
            segments,
            iterations,
            mode = %self.config.mode,
            workers = self.pool.len(),
            "滚动调度开始"
        );
        if iterations == 0 {
            warn!(
                parent: &self.span,
                markers = markers.len(),
                segments,
                "时间标记数不超过预测时段数, 不执行滚动"
            );
        }
        self.events
            .publish(ControlEvent::run(&run_id, ControlEventType::RunStarted));

        let mut reports = Vec::with_capacity(iterations);
        for iteration in 0..iterations {
            let report = self.step(&run_id, markers, iteration)?;
            reports.push(report);
        }

        self.set_phase(ControllerPhase::Done);
        self.events
            .publish(ControlEvent::run(&run_id, ControlEventType::RunFinished));
        info!(
            parent: &self.span,
            %run_id,
            iterations = reports.len(),
            committed = self.boundary.len(),
            "滚动调度完成"
        );

        Ok(ControlRunReport {
            run_id,
            iterations: reports,
            schedule: self.boundary.clone(),
        })
    }

    /// 执行单个周期
    fn step(
        &mut self,
        run_id: &str,
        markers: &[NaiveDateTime],
        iteration: usize,
    ) -> ControlResult<IterationReport> {
        let segments = self.config.control.segments();
        let device_count = self.config.control.device_count as usize;

        // 1. 预测: 构造窗口并计算基准工况
        self.set_phase(ControllerPhase::Predicting);
        let window = SimulationWindow::from_markers(
            markers,
            iteration,
            segments,
            self.config.segment_minutes,
        )
        .ok_or(ControlError::WindowOutOfRange {
            start_index: iteration,
            segments,
            markers: markers.len(),
        })?;
        let baseline = simulate(self.pool.primary(), &window, &self.boundary, None)?;
        let baseline_objectives = self.model.objectives(&baseline, &self.curves).ok();

        // 2. 优化
        self.set_phase(ControllerPhase::Optimizing);
        let perf = PerfGuard::new("optimize_iteration");
        let decision = self.optimize(iteration, &window, &baseline)?;
        let elapsed_ms = perf.elapsed_ms();
        drop(perf);

        // 3. 量化并提交近端时段
        self.set_phase(ControllerPhase::Committing);
        let settings: Vec<f64> = decision
            .genes
            .iter()
            .map(|v| quantize(*v, self.config.device_scale))
            .collect();
        let trajectory = ControlTrajectory::new(device_count, segments, settings.clone()).ok_or(
            ControlError::LayoutMismatch {
                expected: device_count * segments,
                actual: settings.len(),
            },
        )?;
        let commit_segments = self
            .config
            .control
            .commit_segments(self.config.segment_minutes);
        let written = self
            .boundary
            .commit(markers, &window, &trajectory, commit_segments);
        let committed: Vec<(NaiveDateTime, Vec<f64>)> = markers[iteration..iteration + written]
            .iter()
            .enumerate()
            .map(|(segment, marker)| (*marker, trajectory.segment_settings(segment)))
            .collect();

        // 4. 回写模型配置
        self.pool.primary().regenerate(&self.boundary)?;
        self.events.publish(ControlEvent::committed(
            run_id,
            iteration,
            committed.clone(),
        ));

        info!(
            parent: &self.span,
            iteration,
            window_start = %window.start,
            elapsed_ms,
            committed = written,
            label = ?decision.label,
            "滚动周期完成"
        );
        self.set_phase(ControllerPhase::Advancing);

        Ok(IterationReport {
            iteration,
            window_start: window.start,
            window_end: window.end,
            mode: self.config.mode,
            label: decision.label,
            baseline_objectives,
            chosen_objectives: decision.objectives,
            front_size: decision.front_size,
            generations: decision.generations,
            evaluations: decision.evaluations,
            termination: decision.termination,
            elapsed_ms,
            decision: settings,
            committed,
        })
    }

    /// 按优化模式求出本周期的决策向量（未量化）
    fn optimize(
        &mut self,
        iteration: usize,
        window: &SimulationWindow,
        baseline: &ResultStore,
    ) -> ControlResult<Decision> {
        let context = OptimizationContext {
            curves: &self.curves,
            parameters: &self.config.control,
            window,
            boundary: &self.boundary,
            baseline,
        };

        match self.config.mode {
            OptimizationMode::MultiObjective => {
                let outcome = self
                    .moea
                    .optimize(&mut self.pool, &self.model, context, &mut self.rng)?;
                let chosen = self
                    .config
                    .policy
                    .select(&outcome.best)
                    .ok_or(ControlError::NoDecision { iteration })?;
                Ok(Decision {
                    genes: chosen.genes.clone(),
                    objectives: Some(chosen.objectives),
                    label: None,
                    front_size: outcome.best.len(),
                    generations: outcome.generations,
                    evaluations: outcome.evaluations,
                    termination: outcome.termination,
                })
            }
            OptimizationMode::SingleObjective => {
                let assessment = self.classifier.classify(baseline)?;
                debug!(
                    parent: &self.span,
                    iteration,
                    scores = ?assessment.scores(),
                    label = %assessment.label,
                    "优先子流域"
                );
                let outcome = self.single.optimize(
                    &mut self.pool,
                    &self.model,
                    context,
                    assessment.label,
                    &mut self.rng,
                )?;
                if outcome.best.fitness == SENTINEL_OBJECTIVES[0] {
                    return Err(ControlError::NoDecision { iteration });
                }
                Ok(Decision {
                    genes: outcome.best.genes,
                    objectives: None,
                    label: Some(assessment.label),
                    front_size: 0,
                    generations: outcome.generations,
                    evaluations: outcome.evaluations,
                    termination: outcome.termination,
                })
            }
        }
    }
}

/// 本周期求出的决策（量化前）
struct Decision {
    genes: Vec<f64>,
    objectives: Option<ObjectiveVector>,
    label: Option<PriorityLabel>,
    front_size: usize,
    generations: u64,
    evaluations: usize,
    termination: TerminationReason,
}
