// ==========================================
// 防洪闸泵群实时调度 - 父代选择
// ==========================================

use super::individual::Individual;
use super::nsga2::crowded_comparison;
use super::OptimizerRng;
use rand::Rng;
use std::cmp::Ordering;

/// 锦标赛比较方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentOrder {
    /// 多目标: rank 升序, 拥挤距离降序
    Crowded,
    /// 单目标: 指定目标分量越小越好
    Objective(usize),
}

impl TournamentOrder {
    fn compare(&self, a: &Individual, b: &Individual) -> Ordering {
        match self {
            TournamentOrder::Crowded => crowded_comparison(a, b),
            TournamentOrder::Objective(index) => a.objectives[*index]
                .partial_cmp(&b.objectives[*index])
                .unwrap_or(Ordering::Equal),
        }
    }
}

// ==========================================
// Selector Trait
// ==========================================
pub trait Selector: Send + Sync {
    /// 从种群中选出 `count` 个父代，返回下标
    fn select(&self, population: &[Individual], count: usize, rng: &mut OptimizerRng)
        -> Vec<usize>;
}

/// 锦标赛选择（有放回抽取 k 个，取最优）
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelector {
    size: usize,
    order: TournamentOrder,
}

impl TournamentSelector {
    pub fn new(size: usize, order: TournamentOrder) -> Self {
        Self {
            size: size.max(1),
            order,
        }
    }
}

impl Selector for TournamentSelector {
    fn select(
        &self,
        population: &[Individual],
        count: usize,
        rng: &mut OptimizerRng,
    ) -> Vec<usize> {
        if population.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let mut winner = rng.gen_range(0..population.len());
                for _ in 1..self.size {
                    let challenger = rng.gen_range(0..population.len());
                    if self
                        .order
                        .compare(&population[challenger], &population[winner])
                        == Ordering::Less
                    {
                        winner = challenger;
                    }
                }
                winner
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::seeded_rng;

    #[test]
    fn test_large_tournament_finds_best_objective() {
        let population: Vec<Individual> = (0..5)
            .map(|i| Individual::evaluated(vec![], [10.0 - i as f64, i as f64, 0.0]))
            .collect();
        let mut rng = seeded_rng(Some(11));

        // k 远大于种群,几乎必然抽到最优个体
        let selector = TournamentSelector::new(200, TournamentOrder::Objective(0));
        let picks = selector.select(&population, 20, &mut rng);
        assert_eq!(picks.len(), 20);
        assert!(picks.iter().all(|&i| i == 4));

        let selector = TournamentSelector::new(200, TournamentOrder::Objective(1));
        assert!(selector
            .select(&population, 5, &mut rng)
            .iter()
            .all(|&i| i == 0));
    }

    #[test]
    fn test_crowded_tournament_prefers_lower_rank() {
        let mut population: Vec<Individual> = (0..4)
            .map(|_| Individual::evaluated(vec![], [0.0; 3]))
            .collect();
        for (i, individual) in population.iter_mut().enumerate() {
            individual.rank = 3 - i;
        }
        let mut rng = seeded_rng(Some(12));
        let selector = TournamentSelector::new(100, TournamentOrder::Crowded);
        assert!(selector
            .select(&population, 10, &mut rng)
            .iter()
            .all(|&i| i == 3));
    }

    #[test]
    fn test_empty_population_selects_nothing() {
        let mut rng = seeded_rng(Some(13));
        let selector = TournamentSelector::new(3, TournamentOrder::Crowded);
        assert!(selector.select(&[], 4, &mut rng).is_empty());
    }
}
