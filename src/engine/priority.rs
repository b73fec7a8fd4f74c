// ==========================================
// 防洪闸泵群实时调度 - 子流域优先级判定
// ==========================================
// 职责: 由基准工况模拟结果判定本周期优先保护的子流域
// 输入: 基准工况 ResultStore
// 输出: PriorityAssessment (三项指标 + 综合得分 + 标签)
// ==========================================
// 指标:
// p1 库容压力   = 入流总量 / max(额定库容 - 初始库容, ε)
// p2 预见期比   = 入流峰现时间 / 水库水位峰现时间 (水库超安全水位时)
// p3 恢复力比   = 两座水库恢复力常数的相对大小
// 综合得分      = 0.135·p1 + 0.146·p2 + 0.719·p3
// ==========================================

mod scoring;


use crate::config::NetworkConfig;
use crate::domain::PriorityLabel;
use crate::simulator::{ResultStore, SimulatorError};
use scoring::{
    composite_score, lead_time_ratio, reservoir_resilience, resilience_ratios, storage_pressure,
};
use serde::Serialize;
use tracing::debug;

/// Result 类型别名
pub type ClassifierResult<T> = Result<T, SimulatorError>;

/// 单个子流域的判定指标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasinIndicators {
    pub basin: String,
    /// p1 库容压力
    pub storage_pressure: f64,
    /// p2 预见期比
    pub lead_time_ratio: f64,
    /// p3 恢复力比
    pub resilience_ratio: f64,
    pub score: f64,
}

/// 优先级判定结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityAssessment {
    pub basins: Vec<BasinIndicators>,
    pub label: PriorityLabel,
}

impl PriorityAssessment {
    pub fn scores(&self) -> [f64; 3] {
        let mut scores = [0.0; 3];
        for (slot, basin) in scores.iter_mut().zip(self.basins.iter()) {
            *slot = basin.score;
        }
        scores
    }
}

// ==========================================
// PriorityClassifier - 优先级判定器
// ==========================================
pub struct PriorityClassifier {
    network: NetworkConfig,
}

impl PriorityClassifier {
    pub fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    /// 判定优先子流域
    ///
    /// # 错误
    /// 水库水位/库容序列缺失或为空、入流序列缺失时返回 SimulatorError
    pub fn classify(&self, results: &ResultStore) -> ClassifierResult<PriorityAssessment> {
        let network = &self.network;

        // 1. 水库状态: 初始库容、水位序列、恢复力
        let mut initial_volumes = [0.0; 2];
        let mut resilience = [0.0; 2];
        let mut levels = Vec::with_capacity(2);
        for (r, reservoir) in network.reservoirs.iter().enumerate() {
            let volume = results.read_non_empty(&reservoir.entity, &network.volume_variable)?;
            let level = results.read_non_empty(&reservoir.entity, &network.level_variable)?;
            initial_volumes[r] = volume.first().unwrap_or(0.0);
            resilience[r] = reservoir_resilience(level, reservoir);
            levels.push(level);
        }
        let ratios = resilience_ratios(resilience);

        // 2. 子流域指标与综合得分
        let mut basins = Vec::with_capacity(network.sub_basins.len());
        for basin in &network.sub_basins {
            let r = basin.reservoir;
            let reservoir = &network.reservoirs[r];
            let inflow = results.read_series(&basin.inflow_entity, &network.inflow_variable)?;

            let p1 = storage_pressure(
                inflow,
                reservoir,
                initial_volumes[r],
                network.capacity_epsilon,
            );
            let p2 = lead_time_ratio(inflow, levels[r], reservoir);
            let p3 = ratios[r];

            basins.push(BasinIndicators {
                basin: basin.name.clone(),
                storage_pressure: p1,
                lead_time_ratio: p2,
                resilience_ratio: p3,
                score: composite_score(&network.score_weights, [p1, p2, p3]),
            });
        }

        // 3. 标签
        let mut assessment = PriorityAssessment {
            basins,
            label: PriorityLabel::Basin1,
        };
        assessment.label = PriorityLabel::from_scores(assessment.scores());

        debug!(
            scores = ?assessment.scores(),
            label = %assessment.label,
            "子流域优先级判定"
        );
        Ok(assessment)
    }
}
