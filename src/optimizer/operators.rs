// ==========================================
// 防洪闸泵群实时调度 - 变异与交叉算子
// ==========================================
// 执行顺序: 均匀变异 -> 单点交叉 -> 模拟二进制交叉 -> 微调变异
// 配对: 子代按相邻下标两两配对 (0,1), (2,3), ...
// 红线: 算子输出的每个基因都在决策上下界内
// ==========================================

use super::OptimizerRng;
use crate::config::OptimizerConfig;
use crate::domain::DecisionBounds;
use rand::Rng;

// ==========================================
// Alterer Trait
// ==========================================
pub trait Alterer: Send + Sync {
    fn name(&self) -> &'static str;

    /// 就地改变子代基因，返回被改变的基因（或配对）数量
    fn alter(
        &self,
        offspring: &mut [Vec<f64>],
        bounds: &DecisionBounds,
        rng: &mut OptimizerRng,
    ) -> usize;
}

/// 按配置构造完整算子流水线
pub fn default_pipeline(config: &OptimizerConfig, variable_count: usize) -> Vec<Box<dyn Alterer>> {
    vec![
        Box::new(UniformMutator::new(config.mutation_probability)),
        Box::new(SinglePointCrossover::new(
            config.single_point_crossover_probability,
        )),
        Box::new(SimulatedBinaryCrossover::new(
            config.sbx_probability,
            config.sbx_distribution_index,
        )),
        Box::new(FineMutator::new(
            config.fine_mutation_probability_for(variable_count),
            config.fine_mutation_scale,
        )),
    ]
}

fn hit(rng: &mut OptimizerRng, probability: f64) -> bool {
    probability > 0.0 && rng.gen::<f64>() < probability
}

// ==========================================
// UniformMutator - 均匀变异
// ==========================================
// 逐基因以概率 p 替换为上下界内的均匀随机值
#[derive(Debug, Clone, Copy)]
pub struct UniformMutator {
    probability: f64,
}

impl UniformMutator {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Alterer for UniformMutator {
    fn name(&self) -> &'static str {
        "uniform_mutator"
    }

    fn alter(
        &self,
        offspring: &mut [Vec<f64>],
        bounds: &DecisionBounds,
        rng: &mut OptimizerRng,
    ) -> usize {
        let mut altered = 0;
        for genes in offspring.iter_mut() {
            for gene in genes.iter_mut() {
                if hit(rng, self.probability) {
                    *gene = rng.gen_range(bounds.lower..=bounds.upper);
                    altered += 1;
                }
            }
        }
        altered
    }
}

// ==========================================
// SinglePointCrossover - 单点交叉
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct SinglePointCrossover {
    probability: f64,
}

impl SinglePointCrossover {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Alterer for SinglePointCrossover {
    fn name(&self) -> &'static str {
        "single_point_crossover"
    }

    fn alter(
        &self,
        offspring: &mut [Vec<f64>],
        _bounds: &DecisionBounds,
        rng: &mut OptimizerRng,
    ) -> usize {
        let mut crossed = 0;
        for pair in offspring.chunks_exact_mut(2) {
            let len = pair[0].len().min(pair[1].len());
            if len < 2 || !hit(rng, self.probability) {
                continue;
            }
            let cut = rng.gen_range(1..len);
            let (left, right) = pair.split_at_mut(1);
            left[0][cut..len].swap_with_slice(&mut right[0][cut..len]);
            crossed += 1;
        }
        crossed
    }
}

// ==========================================
// SimulatedBinaryCrossover - 模拟二进制交叉 (SBX)
// ==========================================
// 有界形式: 两个子代的扩展因子分别由下界与上界约束
#[derive(Debug, Clone, Copy)]
pub struct SimulatedBinaryCrossover {
    probability: f64,
    distribution_index: f64,
}

impl SimulatedBinaryCrossover {
    pub fn new(probability: f64, distribution_index: f64) -> Self {
        Self {
            probability,
            distribution_index,
        }
    }

    fn spread(&self, beta: f64, u: f64) -> f64 {
        let exponent = 1.0 / (self.distribution_index + 1.0);
        let alpha = 2.0 - beta.powf(-(self.distribution_index + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(exponent)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(exponent)
        }
    }
}

impl Alterer for SimulatedBinaryCrossover {
    fn name(&self) -> &'static str {
        "simulated_binary_crossover"
    }

    fn alter(
        &self,
        offspring: &mut [Vec<f64>],
        bounds: &DecisionBounds,
        rng: &mut OptimizerRng,
    ) -> usize {
        let mut crossed = 0;
        for pair in offspring.chunks_exact_mut(2) {
            if !hit(rng, self.probability) {
                continue;
            }
            let (left, right) = pair.split_at_mut(1);
            let (a, b) = (&mut left[0], &mut right[0]);

            for i in 0..a.len().min(b.len()) {
                if rng.gen::<f64>() > 0.5 {
                    continue;
                }
                let y1 = a[i].min(b[i]);
                let y2 = a[i].max(b[i]);
                let gap = y2 - y1;
                if gap < 1e-12 {
                    continue;
                }

                let u: f64 = rng.gen();
                let beta_low = 1.0 + 2.0 * (y1 - bounds.lower) / gap;
                let beta_high = 1.0 + 2.0 * (bounds.upper - y2) / gap;
                let c1 = bounds.clamp(0.5 * ((y1 + y2) - self.spread(beta_low, u) * gap));
                let c2 = bounds.clamp(0.5 * ((y1 + y2) + self.spread(beta_high, u) * gap));

                if rng.gen::<bool>() {
                    a[i] = c1;
                    b[i] = c2;
                } else {
                    a[i] = c2;
                    b[i] = c1;
                }
            }
            crossed += 1;
        }
        crossed
    }
}

// ==========================================
// FineMutator - 微调变异
// ==========================================
// 逐基因以概率 p 偏移 ±scale * (upper - lower),结果截断到上下界
#[derive(Debug, Clone, Copy)]
pub struct FineMutator {
    probability: f64,
    scale: f64,
}

impl FineMutator {
    pub fn new(probability: f64, scale: f64) -> Self {
        Self { probability, scale }
    }
}

impl Alterer for FineMutator {
    fn name(&self) -> &'static str {
        "fine_mutator"
    }

    fn alter(
        &self,
        offspring: &mut [Vec<f64>],
        bounds: &DecisionBounds,
        rng: &mut OptimizerRng,
    ) -> usize {
        let step = self.scale * bounds.width();
        let mut altered = 0;
        for genes in offspring.iter_mut() {
            for gene in genes.iter_mut() {
                if hit(rng, self.probability) {
                    let delta = rng.gen_range(-1.0..=1.0) * step;
                    *gene = bounds.clamp(*gene + delta);
                    altered += 1;
                }
            }
        }
        altered
    }
}
