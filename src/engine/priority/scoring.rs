use crate::config::ReservoirConfig;
use crate::domain::TimeSeries;

/// 入流总量占水库剩余库容的比例 (p1)
///
/// 剩余库容不足 `epsilon` 时按 `epsilon` 计
pub(super) fn storage_pressure(
    inflow: &TimeSeries,
    reservoir: &ReservoirConfig,
    initial_volume: f64,
    epsilon: f64,
) -> f64 {
    let remaining = (reservoir.rating_capacity - initial_volume).max(epsilon);
    inflow.integrated_volume() / remaining
}

/// 入流峰现时间与水库水位峰现时间之比 (p2)
///
/// 水库峰值水位未超过安全水位时为 0
pub(super) fn lead_time_ratio(
    inflow: &TimeSeries,
    level: &TimeSeries,
    reservoir: &ReservoirConfig,
) -> f64 {
    if !exceeds_safety(level, reservoir) {
        return 0.0;
    }
    inflow.time_to_peak_minutes() / level.time_to_peak_minutes()
}

/// 水库恢复力常数: 峰值水位超过安全水位时取 R, 否则为 0
pub(super) fn reservoir_resilience(level: &TimeSeries, reservoir: &ReservoirConfig) -> f64 {
    if exceeds_safety(level, reservoir) {
        reservoir.resilience
    } else {
        0.0
    }
}

/// 两座水库的恢复力比值 (p3)
///
/// 恢复力较大者为 1.0, 较小者为 小/大; 两者相等时均为 0
pub(super) fn resilience_ratios(resilience: [f64; 2]) -> [f64; 2] {
    let [a, b] = resilience;
    if a > b {
        [1.0, b / a]
    } else if a < b {
        [a / b, 1.0]
    } else {
        [0.0, 0.0]
    }
}

/// 综合得分 p = w1·p1 + w2·p2 + w3·p3
pub(super) fn composite_score(weights: &[f64; 3], indicators: [f64; 3]) -> f64 {
    weights
        .iter()
        .zip(indicators.iter())
        .map(|(w, p)| w * p)
        .sum()
}

fn exceeds_safety(level: &TimeSeries, reservoir: &ReservoirConfig) -> bool {
    level
        .max()
        .map_or(false, |peak| peak > reservoir.safety_level)
}
