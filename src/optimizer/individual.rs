// ==========================================
// 防洪闸泵群实时调度 - 个体与 Pareto 前沿
// ==========================================
// 目标向量: 三个子流域的积分洪水风险,均为最小化
// ==========================================

use serde::Serialize;

/// 目标向量（三个子流域）
pub type ObjectiveVector = [f64; 3];

/// 模型失败的候选解使用的哨兵目标值（最差）
pub const SENTINEL_OBJECTIVES: ObjectiveVector = [f64::MAX; 3];

/// a 是否支配 b: 各分量不劣且至少一个分量严格更优
pub fn dominates(a: &ObjectiveVector, b: &ObjectiveVector) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b.iter()) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

// ==========================================
// Individual - 个体
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Individual {
    pub genes: Vec<f64>,
    pub objectives: ObjectiveVector,
    /// 非支配排序层级（0 为第一前沿）
    pub rank: usize,
    /// 拥挤距离
    pub crowding: f64,
}

impl Individual {
    /// 新个体（尚未求值,目标值为哨兵）
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            objectives: SENTINEL_OBJECTIVES,
            rank: usize::MAX,
            crowding: 0.0,
        }
    }

    pub fn evaluated(genes: Vec<f64>, objectives: ObjectiveVector) -> Self {
        Self {
            objectives,
            ..Self::new(genes)
        }
    }

    pub fn dominates(&self, other: &Individual) -> bool {
        dominates(&self.objectives, &other.objectives)
    }

    pub fn is_sentinel(&self) -> bool {
        self.objectives == SENTINEL_OBJECTIVES
    }
}

// ==========================================
// ParetoFront - 互不支配的个体集合
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParetoFront {
    members: Vec<Individual>,
}

impl ParetoFront {
    /// 从任意个体集合中提取非支配子集（保持原有顺序,去除目标值完全相同的重复）
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        let mut members: Vec<Individual> = Vec::new();
        for candidate in individuals {
            if members.iter().any(|m| {
                m.dominates(&candidate) || m.objectives == candidate.objectives
            }) {
                continue;
            }
            members.retain(|m| !candidate.dominates(m));
            members.push(candidate);
        }
        Self { members }
    }

    pub(crate) fn from_members_unchecked(members: Vec<Individual>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Individual> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.members.iter()
    }

    /// 前沿内成员两两互不支配
    pub fn is_mutually_non_dominated(&self) -> bool {
        self.members.iter().enumerate().all(|(i, a)| {
            self.members
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.dominates(b))
        })
    }
}
