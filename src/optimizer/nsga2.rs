// ==========================================
// 防洪闸泵群实时调度 - NSGA-II 排序与拥挤度
// ==========================================
// 参考: Deb et al., "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II" (2002)
// 红线: 排序只依赖种群下标顺序,与求值完成顺序无关
// ==========================================

use super::individual::{dominates, Individual, ObjectiveVector};
use std::cmp::Ordering;

/// 快速非支配排序，返回各层前沿（元素为下标,层内按下标升序）
pub fn non_dominated_sort(objectives: &[ObjectiveVector]) -> Vec<Vec<usize>> {
    let n = objectives.len();
    let mut domination_count = vec![0usize; n];
    let mut dominated: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&objectives[i], &objectives[j]) {
                dominated[i].push(j);
                domination_count[j] += 1;
            } else if dominates(&objectives[j], &objectives[i]) {
                dominated[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            for &j in &dominated[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        next.sort_unstable();
        fronts.push(current);
        current = next;
    }
    fronts
}

/// 单层前沿的拥挤距离（与 `front` 一一对应）
///
/// 边界点为正无穷；目标值全相同的维度不贡献距离
pub fn crowding_distances(objectives: &[ObjectiveVector], front: &[usize]) -> Vec<f64> {
    let len = front.len();
    if len <= 2 {
        return vec![f64::INFINITY; len];
    }

    let mut distances = vec![0.0; len];
    let mut order: Vec<usize> = (0..len).collect();

    for m in 0..3 {
        order.sort_by(|&a, &b| {
            objectives[front[a]][m]
                .partial_cmp(&objectives[front[b]][m])
                .unwrap_or(Ordering::Equal)
        });

        let min = objectives[front[order[0]]][m];
        let max = objectives[front[order[len - 1]]][m];
        let range = max - min;
        if !(range.is_finite() && range > 0.0) {
            continue;
        }

        distances[order[0]] = f64::INFINITY;
        distances[order[len - 1]] = f64::INFINITY;
        for k in 1..(len - 1) {
            let prev = objectives[front[order[k - 1]]][m];
            let next = objectives[front[order[k + 1]]][m];
            distances[order[k]] += (next - prev) / range;
        }
    }
    distances
}

/// 为整个种群写入 rank 与 crowding
pub fn assign_rank_and_crowding(population: &mut [Individual]) {
    let objectives: Vec<ObjectiveVector> = population.iter().map(|i| i.objectives).collect();
    for (rank, front) in non_dominated_sort(&objectives).iter().enumerate() {
        let distances = crowding_distances(&objectives, front);
        for (&index, distance) in front.iter().zip(distances) {
            population[index].rank = rank;
            population[index].crowding = distance;
        }
    }
}

/// 比较两个个体: rank 升序,拥挤距离降序
pub fn crowded_comparison(a: &Individual, b: &Individual) -> Ordering {
    a.rank.cmp(&b.rank).then_with(|| {
        b.crowding
            .partial_cmp(&a.crowding)
            .unwrap_or(Ordering::Equal)
    })
}

/// NSGA-II 生存选择: 按前沿层级填充,最后一层按拥挤距离截断
///
/// 返回的个体已写入相对于 `combined` 的 rank 与 crowding
pub fn select_survivors(mut combined: Vec<Individual>, size: usize) -> Vec<Individual> {
    let objectives: Vec<ObjectiveVector> = combined.iter().map(|i| i.objectives).collect();
    let fronts = non_dominated_sort(&objectives);

    let mut keep: Vec<usize> = Vec::with_capacity(size);
    for (rank, front) in fronts.iter().enumerate() {
        if keep.len() >= size {
            break;
        }
        let distances = crowding_distances(&objectives, front);
        for (&index, &distance) in front.iter().zip(distances.iter()) {
            combined[index].rank = rank;
            combined[index].crowding = distance;
        }

        if keep.len() + front.len() <= size {
            keep.extend_from_slice(front);
        } else {
            // 稳定排序: 拥挤距离相同按下标
            let mut last: Vec<(usize, f64)> = front.iter().copied().zip(distances).collect();
            last.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
            let remaining = size - keep.len();
            keep.extend(last.into_iter().take(remaining).map(|(index, _)| index));
        }
    }

    keep.sort_unstable();
    let mut slots: Vec<Option<Individual>> = combined.into_iter().map(Some).collect();
    keep.into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(objectives: &[ObjectiveVector]) -> Vec<Individual> {
        objectives
            .iter()
            .enumerate()
            .map(|(i, o)| Individual::evaluated(vec![i as f64], *o))
            .collect()
    }

    #[test]
    fn test_sort_layers() {
        let objectives = [
            [1.0, 1.0, 1.0],
            [2.0, 2.0, 2.0],
            [0.5, 3.0, 1.0],
            [3.0, 3.0, 3.0],
        ];
        let fronts = non_dominated_sort(&objectives);
        assert_eq!(fronts, vec![vec![0, 2], vec![1], vec![3]]);
    }

    #[test]
    fn test_crowding_boundary_points_infinite() {
        let objectives = [
            [0.0, 4.0, 0.0],
            [1.0, 3.0, 0.0],
            [2.0, 2.0, 0.0],
            [4.0, 0.0, 0.0],
        ];
        let distances = crowding_distances(&objectives, &[0, 1, 2, 3]);
        assert!(distances[0].is_infinite());
        assert!(distances[3].is_infinite());
        assert!((distances[1] - 1.0).abs() < 1e-12);
        assert!((distances[2] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_survivors_keep_exact_size_and_prefer_first_front() {
        let combined = population(&[
            [5.0, 5.0, 5.0],
            [0.0, 4.0, 0.0],
            [1.0, 3.0, 0.0],
            [2.0, 2.0, 0.0],
            [4.0, 0.0, 0.0],
            [6.0, 6.0, 6.0],
        ]);
        let survivors = select_survivors(combined, 3);

        assert_eq!(survivors.len(), 3);
        assert!(survivors.iter().all(|s| s.rank == 0));
        // 边界点 (下标 1, 4) 必然保留,内部点取拥挤距离更大的下标 3
        let genes: Vec<f64> = survivors.iter().map(|s| s.genes[0]).collect();
        assert_eq!(genes, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_crowded_comparison_order() {
        let mut a = Individual::evaluated(vec![], [0.0; 3]);
        let mut b = a.clone();
        a.rank = 0;
        b.rank = 1;
        assert_eq!(crowded_comparison(&a, &b), Ordering::Less);

        b.rank = 0;
        a.crowding = 0.5;
        b.crowding = f64::INFINITY;
        assert_eq!(crowded_comparison(&a, &b), Ordering::Greater);
    }
}
