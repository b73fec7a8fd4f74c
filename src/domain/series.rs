// ==========================================
// 防洪闸泵群实时调度 - 时间序列
// ==========================================
// 职责: 单个 (对象, 变量) 的模拟结果序列
// 红线: 只由水力模型产生,本层只读
// ==========================================

use serde::{Deserialize, Serialize};

/// 最小洪峰时长 (分钟)，峰值位于首个时刻时使用，避免除零
pub const MIN_LEAD_TIME_MINUTES: f64 = 0.01;

/// 单个 (对象, 变量) 的时间序列
///
/// 下标即时间步,相邻时间步间隔 `step_minutes` 分钟
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub entity: String,
    pub variable: String,
    pub step_minutes: u32,
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(
        entity: impl Into<String>,
        variable: impl Into<String>,
        step_minutes: u32,
        values: Vec<f64>,
    ) -> Self {
        Self {
            entity: entity.into(),
            variable: variable.into(),
            step_minutes,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 首个时刻的值（初始状态）
    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// 序列最大值，空序列返回 None
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }

    /// 峰值下标（取最后一个等于最大值的位置）
    pub fn peak_index(&self) -> Option<usize> {
        let max = self.max()?;
        self.values.iter().rposition(|v| *v == max)
    }

    /// 峰现时间（分钟）
    ///
    /// 峰值位于第 0 步或序列为空时返回 `MIN_LEAD_TIME_MINUTES`
    pub fn time_to_peak_minutes(&self) -> f64 {
        match self.peak_index() {
            Some(index) if index > 0 => index as f64 * self.step_minutes as f64,
            _ => MIN_LEAD_TIME_MINUTES,
        }
    }

    /// 对流量序列积分得到总量 (值 × 秒)
    pub fn integrated_volume(&self) -> f64 {
        let step_seconds = self.step_minutes as f64 * 60.0;
        self.values.iter().sum::<f64>() * step_seconds
    }
}
