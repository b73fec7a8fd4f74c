// ==========================================
// 防洪闸泵群实时调度 - 进化终止条件
// ==========================================

use serde::Serialize;
use std::fmt;

/// 终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationReason {
    /// 连续若干代无改进
    SteadyFitness,
    /// 达到最大代数
    GenerationLimit,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::SteadyFitness => write!(f, "STEADY_FITNESS"),
            TerminationReason::GenerationLimit => write!(f, "GENERATION_LIMIT"),
        }
    }
}

// ==========================================
// Termination Trait
// ==========================================
pub trait Termination {
    /// 每代结束后调用；返回 Some 表示应当停止
    fn check(&mut self, generation: u64, improved: bool) -> Option<TerminationReason>;
}

/// 稳定适应度 + 最大代数，先到先停
#[derive(Debug, Clone)]
pub struct SteadyFitnessLimit {
    steady_generations: u64,
    max_generations: u64,
    stalled: u64,
}

impl SteadyFitnessLimit {
    pub fn new(steady_generations: u64, max_generations: u64) -> Self {
        Self {
            steady_generations,
            max_generations,
            stalled: 0,
        }
    }

    /// 当前连续无改进代数
    pub fn stalled(&self) -> u64 {
        self.stalled
    }
}

impl Termination for SteadyFitnessLimit {
    fn check(&mut self, generation: u64, improved: bool) -> Option<TerminationReason> {
        if improved {
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }

        if self.stalled >= self.steady_generations {
            Some(TerminationReason::SteadyFitness)
        } else if generation >= self.max_generations {
            Some(TerminationReason::GenerationLimit)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stall_counter_resets_on_improvement() {
        let mut limit = SteadyFitnessLimit::new(3, 100);
        assert_eq!(limit.check(1, false), None);
        assert_eq!(limit.check(2, false), None);
        assert_eq!(limit.check(3, true), None);
        assert_eq!(limit.stalled(), 0);
        assert_eq!(limit.check(4, false), None);
        assert_eq!(limit.check(5, false), None);
        assert_eq!(limit.check(6, false), Some(TerminationReason::SteadyFitness));
    }

    #[test]
    fn test_generation_cap() {
        let mut limit = SteadyFitnessLimit::new(200, 5);
        for generation in 1..5 {
            assert_eq!(limit.check(generation, true), None);
        }
        assert_eq!(limit.check(5, true), Some(TerminationReason::GenerationLimit));
    }
}
