// ==========================================
// 防洪闸泵群实时调度 - 多目标进化优化器 (NSGA-II)
// ==========================================
// 流程:
// 1) 均匀随机初始化种群并求值
// 2) 锦标赛选父代 -> 算子流水线 -> 子代求值
// 3) 父代 ∪ 子代 做 NSGA-II 生存选择,保持种群规模 P
// 4) 子代整体并入 Pareto 存档; 前沿推进（支配原有成员或刷新理想点）视为本代改进
// 5) 稳定代数或最大代数终止
// ==========================================

use super::archive::ParetoArchive;
use super::error::{OptimizerError, OptimizerResult};
use super::evaluator::{FitnessEvaluator, ObjectiveModel, OptimizationContext};
use super::individual::{Individual, ParetoFront};
use super::nsga2::{assign_rank_and_crowding, select_survivors};
use super::operators::{default_pipeline, Alterer};
use super::selection::{Selector, TournamentOrder, TournamentSelector};
use super::termination::{SteadyFitnessLimit, Termination};
use super::{random_population, OptimizationOutcome, OptimizerRng};
use crate::config::OptimizerConfig;
use crate::simulator::{Simulator, SimulatorPool};
use tracing::{debug, info, Span};

pub struct MultiObjectiveOptimizer {
    config: OptimizerConfig,
    span: Span,
}

impl MultiObjectiveOptimizer {
    /// # 参数
    /// - config: 进化算法参数
    /// - span: 调用方注入的追踪上下文,本优化器的事件都挂在其下
    pub fn new(config: OptimizerConfig, span: Span) -> Self {
        Self { config, span }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// 运行一次多目标优化，返回有界 Pareto 存档
    pub fn optimize<S, M>(
        &self,
        pool: &mut SimulatorPool<S>,
        model: &M,
        context: OptimizationContext<'_>,
        rng: &mut OptimizerRng,
    ) -> OptimizerResult<OptimizationOutcome<ParetoFront>>
    where
        S: Simulator,
        M: ObjectiveModel,
    {
        self.config
            .validate()
            .map_err(|e| OptimizerError::InvalidConfig(e.to_string()))?;
        let variable_count = context.parameters.variable_count();
        let population_size = self.config.population_size;
        if variable_count == 0 || population_size == 0 {
            return Err(OptimizerError::EmptyPopulation);
        }

        let bounds = self.config.bounds;
        let evaluator = FitnessEvaluator::new(model, context, &self.span);
        if let Some(baseline) = evaluator.baseline_objectives() {
            debug!(parent: &self.span, ?baseline, "基准工况目标值");
        }

        let alterers: Vec<Box<dyn Alterer>> = default_pipeline(&self.config, variable_count);
        let selector = TournamentSelector::new(self.config.tournament_size, TournamentOrder::Crowded);
        let mut termination =
            SteadyFitnessLimit::new(self.config.steady_generations, self.config.max_generations);
        let mut archive = ParetoArchive::new(self.config.archive_size);

        // 初始种群
        let genes = random_population(population_size, variable_count, &bounds, rng);
        let objectives = evaluator.evaluate(pool, &genes)?;
        let mut population: Vec<Individual> = genes
            .into_iter()
            .zip(objectives)
            .map(|(g, o)| Individual::evaluated(g, o))
            .collect();
        assign_rank_and_crowding(&mut population);
        archive.merge_generation(&population);
        let mut evaluations = population.len();

        let mut generation: u64 = 0;
        let reason = loop {
            generation += 1;

            let parents = selector.select(&population, population_size, rng);
            let mut offspring: Vec<Vec<f64>> = parents
                .iter()
                .map(|&i| population[i].genes.clone())
                .collect();
            for alterer in &alterers {
                alterer.alter(&mut offspring, &bounds, rng);
            }

            let objectives = evaluator.evaluate(pool, &offspring)?;
            evaluations += offspring.len();
            let children: Vec<Individual> = offspring
                .into_iter()
                .zip(objectives)
                .map(|(g, o)| Individual::evaluated(g, o))
                .collect();

            let update = archive.merge_generation(&children);

            let mut combined = population;
            combined.extend(children);
            population = select_survivors(combined, population_size);

            if generation % 50 == 0 {
                debug!(
                    parent: &self.span,
                    generation,
                    archive_size = archive.len(),
                    accepted = update.accepted,
                    evicted = update.evicted,
                    "多目标进化进度"
                );
            }

            if let Some(reason) = termination.check(generation, update.advanced) {
                break reason;
            }
        };

        info!(
            parent: &self.span,
            generations = generation,
            evaluations,
            front_size = archive.len(),
            termination = %reason,
            "多目标优化完成"
        );

        Ok(OptimizationOutcome {
            best: archive.into_front(),
            generations: generation,
            evaluations,
            termination: reason,
        })
    }
}

