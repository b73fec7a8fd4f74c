// ==========================================
// 进化优化器集成测试
// ==========================================
// 测试目标: Pareto 前沿互不支配、决策变量在范围内、哨兵策略
// 覆盖范围: MultiObjectiveOptimizer / SingleObjectiveOptimizer
// ==========================================

mod helpers;

use flood_mpc::domain::{BoundaryState, OptimizationMode, PriorityLabel, SimulationWindow};
use flood_mpc::engine::FloodRiskObjectives;
use flood_mpc::optimizer::{
    seeded_rng, MultiObjectiveOptimizer, ObjectiveModel, ObjectiveVector, OptimizationContext,
    OptimizerError, SingleObjectiveOptimizer, TerminationReason,
};
use flood_mpc::simulator::{simulate, ResultStore, SimResult};
use helpers::mock_simulator::{lake_curves, markers, FailureMode, MockSimulator};
use helpers::{mock_pool, small_config};
use tracing::Span;

// ==========================================
// 测试辅助函数
// ==========================================

struct Fixture {
    config: flood_mpc::MpcConfig,
    window: SimulationWindow,
    boundary: BoundaryState,
    baseline: ResultStore,
    curves: flood_mpc::CurveData,
    model: FloodRiskObjectives,
}

fn fixture(simulator: &mut MockSimulator) -> Fixture {
    let config = small_config(OptimizationMode::MultiObjective);
    let markers = markers(8);
    let window =
        SimulationWindow::from_markers(&markers, 2, config.control.segments(), 10).unwrap();
    let boundary = BoundaryState::new();
    let baseline = simulate(simulator, &window, &boundary, None).unwrap();
    Fixture {
        model: FloodRiskObjectives::new(config.network.clone()),
        config,
        window,
        boundary,
        baseline,
        curves: lake_curves(),
    }
}

impl Fixture {
    fn context(&self) -> OptimizationContext<'_> {
        OptimizationContext {
            curves: &self.curves,
            parameters: &self.config.control,
            window: &self.window,
            boundary: &self.boundary,
            baseline: &self.baseline,
        }
    }
}

// ==========================================
// 多目标
// ==========================================

#[test]
fn test_front_is_mutually_non_dominated_and_within_bounds() {
    let mut simulator = MockSimulator::new(1.5);
    let f = fixture(&mut simulator);
    let mut pool = mock_pool(simulator, 2);
    let mut rng = seeded_rng(Some(7));

    let optimizer = MultiObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none());
    let outcome = optimizer
        .optimize(&mut pool, &f.model, f.context(), &mut rng)
        .unwrap();

    let front = outcome.best;
    assert!(!front.is_empty());
    assert!(front.len() <= f.config.optimizer.archive_size);
    assert!(front.is_mutually_non_dominated());

    let bounds = f.config.optimizer.bounds;
    for member in front.iter() {
        assert_eq!(member.genes.len(), 8);
        assert!(member.genes.iter().all(|g| bounds.contains(*g)));
        assert!(!member.is_sentinel());
        assert!(member.objectives.iter().all(|o| o.is_finite() && *o >= 0.0));
    }

    assert!(outcome.generations >= 1 && outcome.generations <= 15);
    assert_eq!(outcome.evaluations as u64, 16 * (outcome.generations + 1));
}

#[test]
fn test_front_improves_on_baseline() {
    let mut simulator = MockSimulator::new(1.5);
    let f = fixture(&mut simulator);
    let mut pool = mock_pool(simulator, 1);
    let mut rng = seeded_rng(Some(11));

    let baseline = f.model.objectives(&f.baseline, &f.curves).unwrap();
    let outcome = MultiObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none())
        .optimize(&mut pool, &f.model, f.context(), &mut rng)
        .unwrap();

    // 无控制工况下解放溪超警戒, 前沿中至少一个解降低了该风险
    assert!(baseline[0] > 0.0);
    assert!(outcome.best.iter().any(|m| m.objectives[0] < baseline[0]));
}

#[test]
fn test_partial_failures_are_excluded_from_front() {
    let mut simulator = MockSimulator::new(1.5).with_failure(FailureMode::EveryNthCandidate(3));
    let f = fixture(&mut simulator);
    let mut pool = mock_pool(simulator, 1);
    let mut rng = seeded_rng(Some(3));

    let outcome = MultiObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none())
        .optimize(&mut pool, &f.model, f.context(), &mut rng)
        .unwrap();

    assert!(!outcome.best.is_empty());
    assert!(outcome.best.iter().all(|m| !m.is_sentinel()));
    assert!(outcome.best.is_mutually_non_dominated());
}

#[test]
fn test_all_failures_give_empty_front_after_stall() {
    let mut simulator = MockSimulator::new(1.5).with_failure(FailureMode::Candidates);
    let f = fixture(&mut simulator);
    let mut pool = mock_pool(simulator, 2);
    let mut rng = seeded_rng(Some(5));

    let outcome = MultiObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none())
        .optimize(&mut pool, &f.model, f.context(), &mut rng)
        .unwrap();

    assert!(outcome.best.is_empty());
    assert_eq!(outcome.termination, TerminationReason::SteadyFitness);
    assert_eq!(outcome.generations, f.config.optimizer.steady_generations);
}

#[test]
fn test_zero_devices_is_rejected() {
    let mut simulator = MockSimulator::new(1.0);
    let mut f = fixture(&mut simulator);
    f.config.control.device_count = 0;
    let mut pool = mock_pool(simulator, 1);
    let mut rng = seeded_rng(Some(1));

    let err = MultiObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none())
        .optimize(&mut pool, &f.model, f.context(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, OptimizerError::EmptyPopulation));
}

/// 目标值取整到粗网格的洪水风险模型, 可达前沿为有限集合
struct GridObjectives {
    inner: FloodRiskObjectives,
    grid: [f64; 3],
}

impl ObjectiveModel for GridObjectives {
    fn objectives(
        &self,
        results: &ResultStore,
        curves: &flood_mpc::CurveData,
    ) -> SimResult<ObjectiveVector> {
        let mut objectives = self.inner.objectives(results, curves)?;
        for (value, step) in objectives.iter_mut().zip(self.grid.iter()) {
            *value = (*value / step).round() * step;
        }
        Ok(objectives)
    }
}

#[test]
fn test_converged_front_stops_on_steady_fitness() {
    let mut simulator = MockSimulator::new(1.5);
    let mut f = fixture(&mut simulator);
    f.config.optimizer.population_size = 40;
    f.config.optimizer.steady_generations = 20;
    f.config.optimizer.max_generations = 3000;
    f.config.optimizer.archive_size = 200;
    let mut pool = mock_pool(simulator, 2);
    let mut rng = seeded_rng(Some(7));

    let model = GridObjectives {
        inner: FloodRiskObjectives::new(f.config.network.clone()),
        grid: [10.0, 10.0, 1.0e8],
    };
    let outcome = MultiObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none())
        .optimize(&mut pool, &model, f.context(), &mut rng)
        .unwrap();

    // 前沿不再推进后按稳定代数停止, 远早于最大代数
    assert_eq!(outcome.termination, TerminationReason::SteadyFitness);
    assert!(outcome.generations < 3000);
    assert!(outcome.generations >= 20);
    assert!(!outcome.best.is_empty());
    assert!(outcome.best.is_mutually_non_dominated());
}

// ==========================================
// 单目标
// ==========================================

#[test]
fn test_single_objective_respects_lower_bound() {
    let mut simulator = MockSimulator::new(1.5);
    let f = fixture(&mut simulator);
    let mut pool = mock_pool(simulator, 2);
    let mut rng = seeded_rng(Some(9));

    let optimizer = SingleObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none());
    let outcome = optimizer
        .optimize(
            &mut pool,
            &f.model,
            f.context(),
            PriorityLabel::Basin3,
            &mut rng,
        )
        .unwrap();

    let best = outcome.best;
    assert_eq!(best.label, PriorityLabel::Basin3);
    assert_eq!(best.genes.len(), 8);

    let bounds = f.config.optimizer.single_objective_bounds();
    assert_eq!(bounds.lower, 0.1);
    assert!(best.genes.iter().all(|g| bounds.contains(*g)));
    assert!(best.fitness.is_finite() && best.fitness >= 0.0);
    assert!(outcome.evaluations >= f.config.optimizer.population_size);
}

#[test]
fn test_single_objective_is_reproducible_with_seed() {
    let run = || {
        let mut simulator = MockSimulator::new(1.5);
        let f = fixture(&mut simulator);
        let mut pool = mock_pool(simulator, 2);
        let mut rng = seeded_rng(Some(21));
        SingleObjectiveOptimizer::new(f.config.optimizer.clone(), Span::none())
            .optimize(&mut pool, &f.model, f.context(), PriorityLabel::Basin1, &mut rng)
            .unwrap()
            .best
    };

    let a = run();
    let b = run();
    assert_eq!(a.genes, b.genes);
    assert_eq!(a.fitness.to_bits(), b.fitness.to_bits());
}
