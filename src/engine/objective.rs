// ==========================================
// 防洪闸泵群实时调度 - 洪水风险目标模型
// ==========================================
// 职责: 由一次模拟结果计算三个子流域的积分洪水风险
// 口径:
// - 监测点配置了库容曲线: Σ max(0, V(水位) - V(警戒水位)) × 步长秒数
// - 未配置曲线:           Σ max(0, 水位 - 警戒水位) × 步长分钟数
// 红线: 目标值非负, 越小越好
// ==========================================

use crate::config::{MonitorTarget, NetworkConfig};
use crate::domain::{CurveData, TimeSeries};
use crate::optimizer::{ObjectiveModel, ObjectiveVector};
use crate::simulator::{ResultStore, SimResult, SimulatorError};

pub struct FloodRiskObjectives {
    network: NetworkConfig,
}

impl FloodRiskObjectives {
    pub fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    fn basin_risk(
        &self,
        monitor: &MonitorTarget,
        level: &TimeSeries,
        curves: &CurveData,
    ) -> SimResult<f64> {
        let step_minutes = level.step_minutes as f64;

        match &monitor.curve {
            Some(name) => {
                let curve = curves
                    .get(name)
                    .ok_or_else(|| SimulatorError::CurveMissing(name.clone()))?;
                let warning_volume = curve.volume_at(monitor.warning_level);
                let excess: f64 = level
                    .values
                    .iter()
                    .map(|h| (curve.volume_at(*h) - warning_volume).max(0.0))
                    .sum();
                Ok(excess * step_minutes * 60.0)
            }
            None => {
                let excess: f64 = level
                    .values
                    .iter()
                    .map(|h| (h - monitor.warning_level).max(0.0))
                    .sum();
                Ok(excess * step_minutes)
            }
        }
    }
}

impl ObjectiveModel for FloodRiskObjectives {
    fn objectives(&self, results: &ResultStore, curves: &CurveData) -> SimResult<ObjectiveVector> {
        let mut objectives = [0.0; 3];
        for (slot, basin) in objectives.iter_mut().zip(self.network.sub_basins.iter()) {
            let level =
                results.read_non_empty(&basin.monitor.entity, &self.network.level_variable)?;
            *slot = self.basin_risk(&basin.monitor, level, curves)?;
        }
        Ok(objectives)
    }
}
