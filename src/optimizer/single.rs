// ==========================================
// 防洪闸泵群实时调度 - 单目标进化优化器
// ==========================================
// 适应度: 优先子流域对应的目标分量 (label - 1),越小越好
// 生存选择: 父代 ∪ 子代按适应度保留前 P 个（同值按下标稳定）
// 改进判定: 最优适应度严格下降
// ==========================================

use super::error::{OptimizerError, OptimizerResult};
use super::evaluator::{FitnessEvaluator, ObjectiveModel, OptimizationContext};
use super::individual::Individual;
use super::operators::{default_pipeline, Alterer};
use super::selection::{Selector, TournamentOrder, TournamentSelector};
use super::termination::{SteadyFitnessLimit, Termination};
use super::{random_population, OptimizationOutcome, OptimizerRng};
use crate::config::OptimizerConfig;
use crate::domain::PriorityLabel;
use crate::simulator::{Simulator, SimulatorPool};
use std::cmp::Ordering;
use tracing::{debug, info, Span};

/// 单目标优化结果
#[derive(Debug, Clone, PartialEq)]
pub struct SingleObjectiveBest {
    pub genes: Vec<f64>,
    pub fitness: f64,
    pub label: PriorityLabel,
}

pub struct SingleObjectiveOptimizer {
    config: OptimizerConfig,
    span: Span,
}

impl SingleObjectiveOptimizer {
    pub fn new(config: OptimizerConfig, span: Span) -> Self {
        Self { config, span }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// 以优先子流域的风险为唯一目标优化
    pub fn optimize<S, M>(
        &self,
        pool: &mut SimulatorPool<S>,
        model: &M,
        context: OptimizationContext<'_>,
        label: PriorityLabel,
        rng: &mut OptimizerRng,
    ) -> OptimizerResult<OptimizationOutcome<SingleObjectiveBest>>
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

        let index = label.objective_index();
        let bounds = self.config.single_objective_bounds();
        let evaluator = FitnessEvaluator::new(model, context, &self.span);
        if let Some(baseline) = evaluator.baseline_objectives() {
            debug!(parent: &self.span, %label, baseline = baseline[index], "基准工况优先目标值");
        }

        let alterers: Vec<Box<dyn Alterer>> = default_pipeline(&self.config, variable_count);
        let selector =
            TournamentSelector::new(self.config.tournament_size, TournamentOrder::Objective(index));
        let mut termination =
            SteadyFitnessLimit::new(self.config.steady_generations, self.config.max_generations);

        let genes = random_population(population_size, variable_count, &bounds, rng);
        let objectives = evaluator.evaluate(pool, &genes)?;
        let mut population: Vec<Individual> = genes
            .into_iter()
            .zip(objectives)
            .map(|(g, o)| Individual::evaluated(g, o))
            .collect();
        sort_by_fitness(&mut population, index);
        let mut best_fitness = population[0].objectives[index];
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

            population.extend(
                offspring
                    .into_iter()
                    .zip(objectives)
                    .map(|(g, o)| Individual::evaluated(g, o)),
            );
            sort_by_fitness(&mut population, index);
            population.truncate(population_size);

            let current = population[0].objectives[index];
            let improved = current < best_fitness;
            if improved {
                best_fitness = current;
            }

            if generation % 50 == 0 {
                debug!(parent: &self.span, generation, best_fitness, "单目标进化进度");
            }

            if let Some(reason) = termination.check(generation, improved) {
                break reason;
            }
        };

        info!(
            parent: &self.span,
            %label,
            generations = generation,
            evaluations,
            best_fitness,
            termination = %reason,
            "单目标优化完成"
        );

        let best = population.swap_remove(0);
        Ok(OptimizationOutcome {
            best: SingleObjectiveBest {
                genes: best.genes,
                fitness: best_fitness,
                label,
            },
            generations: generation,
            evaluations,
            termination: reason,
        })
    }
}

/// 按适应度升序稳定排序
fn sort_by_fitness(population: &mut [Individual], index: usize) {
    population.sort_by(|a, b| {
        a.objectives[index]
            .partial_cmp(&b.objectives[index])
            .unwrap_or(Ordering::Equal)
    });
}
