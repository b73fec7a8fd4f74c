// ==========================================
// 防洪闸泵群实时调度 - Pareto 前沿取解策略
// ==========================================
// 职责: 从多目标前沿中确定唯一下发的决策向量
// 归一化: 各目标按前沿内 [min, max] 线性缩放到 [0, 1]
// ==========================================

use super::individual::{Individual, ObjectiveVector, ParetoFront};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionPolicy {
    /// 距理想点（各目标最小值）欧氏距离最近
    #[default]
    NearestIdeal,
    /// 归一化目标加权和最小（权重可取熵权法结果）
    WeightedSum { weights: [f64; 3] },
    /// 存档中的第一个成员
    FirstArchived,
}

impl DecisionPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if let DecisionPolicy::WeightedSum { weights } = self {
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(format!("权重必须为非负有限数: {:?}", weights));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err("权重之和必须大于 0".to_string());
            }
        }
        Ok(())
    }

    /// 选出一个成员；前沿为空时返回 None
    ///
    /// 得分相同时取前沿中靠前者
    pub fn select<'a>(&self, front: &'a ParetoFront) -> Option<&'a Individual> {
        let members: Vec<&Individual> = front.iter().filter(|m| !m.is_sentinel()).collect();
        if members.is_empty() {
            return None;
        }

        if *self == DecisionPolicy::FirstArchived {
            return members.first().copied();
        }

        let (min, max) = objective_ranges(&members);
        let mut best: Option<(&Individual, f64)> = None;
        for member in members {
            let value = self.score(&normalize(&member.objectives, &min, &max));
            if best.map_or(true, |(_, b)| value < b) {
                best = Some((member, value));
            }
        }
        best.map(|(member, _)| member)
    }

    fn score(&self, normalized: &ObjectiveVector) -> f64 {
        match self {
            DecisionPolicy::WeightedSum { weights } => normalized
                .iter()
                .zip(weights.iter())
                .map(|(v, w)| v * w)
                .sum(),
            _ => normalized.iter().map(|v| v * v).sum::<f64>().sqrt(),
        }
    }
}

fn objective_ranges(members: &[&Individual]) -> (ObjectiveVector, ObjectiveVector) {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for member in members {
        for m in 0..3 {
            min[m] = min[m].min(member.objectives[m]);
            max[m] = max[m].max(member.objectives[m]);
        }
    }
    (min, max)
}

fn normalize(
    objectives: &ObjectiveVector,
    min: &ObjectiveVector,
    max: &ObjectiveVector,
) -> ObjectiveVector {
    let mut normalized = [0.0; 3];
    for m in 0..3 {
        let range = max[m] - min[m];
        if range > 0.0 {
            normalized[m] = (objectives[m] - min[m]) / range;
        }
    }
    normalized
}
