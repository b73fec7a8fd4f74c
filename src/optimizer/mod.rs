// ==========================================
// 防洪闸泵群实时调度 - 进化优化层
// ==========================================
// 职责: 多目标 (NSGA-II) 与单目标进化优化
// 接缝: Alterer / Selector / Termination / ObjectiveModel
// 随机数: ChaCha8Rng, 配置了种子时结果可复现
// ==========================================

pub mod archive;
pub mod error;
pub mod evaluator;
pub mod individual;
pub mod moea;
pub mod nsga2;
pub mod operators;
pub mod policy;
pub mod selection;
pub mod single;
pub mod termination;

// 重导出核心类型
pub use archive::{ArchiveUpdate, ParetoArchive};
pub use error::{OptimizerError, OptimizerResult};
pub use evaluator::{FitnessEvaluator, ObjectiveModel, OptimizationContext};
pub use individual::{dominates, Individual, ObjectiveVector, ParetoFront, SENTINEL_OBJECTIVES};
pub use moea::MultiObjectiveOptimizer;
pub use operators::{
    Alterer, FineMutator, SimulatedBinaryCrossover, SinglePointCrossover, UniformMutator,
};
pub use policy::DecisionPolicy;
pub use selection::{Selector, TournamentOrder, TournamentSelector};
pub use single::{SingleObjectiveBest, SingleObjectiveOptimizer};
pub use termination::{SteadyFitnessLimit, Termination, TerminationReason};

use crate::domain::DecisionBounds;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 优化器随机数发生器
pub type OptimizerRng = ChaCha8Rng;

/// 有种子时确定性构造，否则取系统熵
pub fn seeded_rng(seed: Option<u64>) -> OptimizerRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// 一次优化调用的结果与进化统计
#[derive(Debug, Clone)]
pub struct OptimizationOutcome<T> {
    pub best: T,
    /// 实际进化代数
    pub generations: u64,
    /// 模型求值次数
    pub evaluations: usize,
    pub termination: TerminationReason,
}

/// 上下界内独立均匀采样的初始种群
pub(crate) fn random_population(
    size: usize,
    variable_count: usize,
    bounds: &DecisionBounds,
    rng: &mut OptimizerRng,
) -> Vec<Vec<f64>> {
    (0..size)
        .map(|_| {
            (0..variable_count)
                .map(|_| rng.gen_range(bounds.lower..=bounds.upper))
                .collect()
        })
        .collect()
}
