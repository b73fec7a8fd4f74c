// ==========================================
// 防洪闸泵群实时调度 - 适应度求值
// ==========================================
// 职责: 候选轨迹 -> 模型计算 -> 目标向量
// 失败策略: 单个候选解的模型失败记为哨兵目标值并告警,本代继续
// ==========================================

use super::error::OptimizerResult;
use super::individual::{ObjectiveVector, SENTINEL_OBJECTIVES};
use crate::domain::{BoundaryState, ControlParameters, ControlTrajectory, CurveData, SimulationWindow};
use crate::perf;
use crate::simulator::{simulate, ResultStore, SimResult, Simulator, SimulatorError, SimulatorPool};
use std::time::Instant;
use tracing::{warn, Span};

// ==========================================
// ObjectiveModel Trait
// ==========================================
// 实现者: engine::objective::FloodRiskObjectives
pub trait ObjectiveModel: Sync {
    /// 由一次模型结果计算目标向量
    fn objectives(&self, results: &ResultStore, curves: &CurveData) -> SimResult<ObjectiveVector>;
}

/// 一次优化调用的上下文
#[derive(Debug, Clone, Copy)]
pub struct OptimizationContext<'a> {
    pub curves: &'a CurveData,
    pub parameters: &'a ControlParameters,
    pub window: &'a SimulationWindow,
    pub boundary: &'a BoundaryState,
    /// 无控制轨迹的基准工况结果
    pub baseline: &'a ResultStore,
}

/// 适应度求值器
pub struct FitnessEvaluator<'a, M: ObjectiveModel> {
    model: &'a M,
    context: OptimizationContext<'a>,
    span: &'a Span,
}

impl<'a, M: ObjectiveModel> FitnessEvaluator<'a, M> {
    pub fn new(model: &'a M, context: OptimizationContext<'a>, span: &'a Span) -> Self {
        Self {
            model,
            context,
            span,
        }
    }

    /// 对一批候选解求值，结果按候选下标排列
    pub fn evaluate<S: Simulator>(
        &self,
        pool: &mut SimulatorPool<S>,
        candidates: &[Vec<f64>],
    ) -> OptimizerResult<Vec<ObjectiveVector>> {
        let objectives =
            pool.map_exclusive(candidates, |simulator, index, genes| {
                self.evaluate_one(simulator, index, genes)
            })?;
        Ok(objectives)
    }

    fn evaluate_one<S: Simulator>(
        &self,
        simulator: &mut S,
        index: usize,
        genes: &[f64],
    ) -> ObjectiveVector {
        let started = Instant::now();
        let outcome = self.try_evaluate(simulator, genes);
        perf::record_evaluation(self.span, index, started.elapsed());

        match outcome {
            Ok(objectives) if objectives.iter().all(|o| o.is_finite()) => objectives,
            Ok(objectives) => {
                warn!(parent: self.span, candidate = index, ?objectives, "目标值非有限数, 按最差处理");
                SENTINEL_OBJECTIVES
            }
            Err(e) => {
                warn!(parent: self.span, candidate = index, error = %e, "候选解模型计算失败, 按最差处理");
                SENTINEL_OBJECTIVES
            }
        }
    }

    fn try_evaluate<S: Simulator>(
        &self,
        simulator: &mut S,
        genes: &[f64],
    ) -> SimResult<ObjectiveVector> {
        let parameters = self.context.parameters;
        let trajectory = ControlTrajectory::new(
            parameters.device_count as usize,
            parameters.segments(),
            genes.to_vec(),
        )
        .ok_or_else(|| {
            SimulatorError::ConfigureFailed(format!("决策向量长度 {} 与布局不符", genes.len()))
        })?;

        let results = simulate(
            simulator,
            self.context.window,
            self.context.boundary,
            Some(&trajectory),
        )?;
        self.model.objectives(&results, self.context.curves)
    }

    /// 基准工况的目标向量（仅用于日志与报告）
    pub fn baseline_objectives(&self) -> Option<ObjectiveVector> {
        self.model
            .objectives(self.context.baseline, self.context.curves)
            .ok()
    }
}
