// ==========================================
// 防洪闸泵群实时调度 - 有界 Pareto 存档
// ==========================================
// 红线: 存档任何时刻都是一个 Pareto 前沿
// 合并: 每代候选解先做支配过滤整体并入,再按拥挤距离一次截断到容量
// 推进: 新成员支配了原有成员,或理想点某分量严格下降;
//       仅替换被截断成员不算推进
// ==========================================

use super::individual::{Individual, ObjectiveVector, ParetoFront};
use super::nsga2::crowding_distances;
use std::cmp::Ordering;

/// 一代候选解并入存档的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveUpdate {
    /// 通过支配过滤进入存档的候选解数（截断前）
    pub accepted: usize,
    /// 超出容量被截断的成员数
    pub evicted: usize,
    /// 最优前沿是否推进
    pub advanced: bool,
}

#[derive(Debug, Clone)]
pub struct ParetoArchive {
    capacity: usize,
    members: Vec<Individual>,
}

impl ParetoArchive {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            members: Vec::new(),
        }
    }

    /// 并入一代候选解
    ///
    /// 哨兵目标值、被支配或与已有成员目标值相同的候选解不进入存档
    pub fn merge_generation<'a>(
        &mut self,
        candidates: impl IntoIterator<Item = &'a Individual>,
    ) -> ArchiveUpdate {
        let mut newcomers: Vec<Individual> = Vec::new();
        for candidate in candidates {
            if candidate.is_sentinel() || candidate.objectives.iter().any(|o| !o.is_finite()) {
                continue;
            }
            if self
                .members
                .iter()
                .chain(newcomers.iter())
                .any(|m| m.dominates(candidate) || m.objectives == candidate.objectives)
            {
                continue;
            }
            newcomers.retain(|n| !candidate.dominates(n));
            newcomers.push(candidate.clone());
        }
        if newcomers.is_empty() {
            return ArchiveUpdate::default();
        }

        let ideal_improved = match self.ideal_point() {
            Some(ideal) => newcomers.iter().any(|n| {
                n.objectives
                    .iter()
                    .zip(ideal.iter())
                    .any(|(value, best)| value < best)
            }),
            None => true,
        };
        let before = self.members.len();
        self.members
            .retain(|m| !newcomers.iter().any(|n| n.dominates(m)));
        let dominated_existing = self.members.len() < before;

        let accepted = newcomers.len();
        self.members.extend(newcomers);
        let evicted = self.truncate();

        ArchiveUpdate {
            accepted,
            evicted,
            advanced: dominated_existing || ideal_improved,
        }
    }

    /// 各目标分量的最小值；空存档为 None
    pub fn ideal_point(&self) -> Option<ObjectiveVector> {
        let (first, rest) = self.members.split_first()?;
        Some(rest.iter().fold(first.objectives, |mut ideal, m| {
            for (best, value) in ideal.iter_mut().zip(m.objectives.iter()) {
                *best = best.min(*value);
            }
            ideal
        }))
    }

    /// 超出容量时按拥挤距离降序保留,其余成员保持原有顺序
    fn truncate(&mut self) -> usize {
        let excess = self.members.len().saturating_sub(self.capacity);
        if excess == 0 {
            return 0;
        }

        let objectives: Vec<ObjectiveVector> = self.members.iter().map(|m| m.objectives).collect();
        let all: Vec<usize> = (0..self.members.len()).collect();
        let distances = crowding_distances(&objectives, &all);

        // 稳定排序: 拥挤距离相同按下标
        let mut ranked: Vec<(usize, f64)> = all.into_iter().zip(distances).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let mut keep = vec![false; self.members.len()];
        for (index, _) in ranked.into_iter().take(self.capacity) {
            keep[index] = true;
        }

        let mut flags = keep.into_iter();
        self.members.retain(|_| flags.next().unwrap_or(false));
        excess
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn front(&self) -> ParetoFront {
        ParetoFront::from_members_unchecked(self.members.clone())
    }

    pub fn into_front(self) -> ParetoFront {
        ParetoFront::from_members_unchecked(self.members)
    }
}
