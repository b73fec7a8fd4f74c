// ==========================================
// 防洪闸泵群实时调度 - 控制参数与调度轨迹
// ==========================================
// 职责: 预测控制参数、决策向量布局、模拟窗口、已提交调度
// 布局: 决策向量按设备优先排列, 基因 d * segments + s 为设备 d 在第 s 个时段的开度
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 控制参数校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("预测步数 {horizon_steps} 不能被重采样比 {resample_ratio} 整除")]
    HorizonNotDivisible {
        horizon_steps: u32,
        resample_ratio: u32,
    },

    #[error("字段 {field} 必须大于 0")]
    NonPositive { field: &'static str },

    #[error("决策上下界非法: [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },
}

// ==========================================
// ControlParameters - 模型预测控制参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlParameters {
    /// 预测时域步数
    pub horizon_steps: u32,
    /// 重采样比（每个决策时段包含的步数）
    pub resample_ratio: u32,
    /// 每次滚动实际下发的控制时长（分钟）
    pub control_step_minutes: u32,
    /// 受控闸泵数量
    pub device_count: u32,
}

impl Default for ControlParameters {
    fn default() -> Self {
        Self {
            horizon_steps: 120,
            resample_ratio: 10,
            control_step_minutes: 10,
            device_count: 5,
        }
    }
}

impl ControlParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.resample_ratio == 0 {
            return Err(ParameterError::NonPositive {
                field: "resample_ratio",
            });
        }
        if self.horizon_steps == 0 {
            return Err(ParameterError::NonPositive {
                field: "horizon_steps",
            });
        }
        if self.device_count == 0 {
            return Err(ParameterError::NonPositive {
                field: "device_count",
            });
        }
        if self.horizon_steps % self.resample_ratio != 0 {
            return Err(ParameterError::HorizonNotDivisible {
                horizon_steps: self.horizon_steps,
                resample_ratio: self.resample_ratio,
            });
        }
        Ok(())
    }

    /// 预测时域内的决策时段数 H
    pub fn segments(&self) -> usize {
        (self.horizon_steps / self.resample_ratio) as usize
    }

    /// 决策变量个数
    pub fn variable_count(&self) -> usize {
        self.device_count as usize * self.segments()
    }

    /// 每次滚动提交的时段数（至少 1，至多 H）
    pub fn commit_segments(&self, segment_minutes: u32) -> usize {
        let segments = if segment_minutes == 0 {
            1
        } else {
            (self.control_step_minutes / segment_minutes) as usize
        };
        segments.max(1).min(self.segments())
    }
}

// ==========================================
// DecisionBounds - 决策变量物理范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionBounds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for DecisionBounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 4.5,
        }
    }
}

impl DecisionBounds {
    pub fn new(lower: f64, upper: f64) -> Result<Self, ParameterError> {
        let bounds = Self { lower, upper };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(ParameterError::InvalidBounds {
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

// ==========================================
// SimulationWindow - 模拟时间窗
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationWindow {
    /// 起始时刻在时间序列中的下标
    pub start_index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// 窗口内决策时段数
    pub segments: usize,
    /// 单个时段长度（分钟）
    pub segment_minutes: u32,
}

impl SimulationWindow {
    /// 以第 `start_index` 个时刻为起点、跨越 `segments` 个时段构造窗口
    ///
    /// 终点时刻越界时返回 None
    pub fn from_markers(
        markers: &[NaiveDateTime],
        start_index: usize,
        segments: usize,
        segment_minutes: u32,
    ) -> Option<Self> {
        let start = *markers.get(start_index)?;
        let end = *markers.get(start_index + segments)?;
        Some(Self {
            start_index,
            start,
            end,
            segments,
            segment_minutes,
        })
    }
}

// ==========================================
// ControlTrajectory - 候选控制轨迹
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlTrajectory {
    device_count: usize,
    segments: usize,
    values: Vec<f64>,
}

impl ControlTrajectory {
    /// 长度不等于 device_count * segments 时返回 None
    pub fn new(device_count: usize, segments: usize, values: Vec<f64>) -> Option<Self> {
        if values.len() != device_count * segments {
            return None;
        }
        Some(Self {
            device_count,
            segments,
            values,
        })
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 设备 `device` 在第 `segment` 个时段的开度
    pub fn setting(&self, device: usize, segment: usize) -> Option<f64> {
        if device >= self.device_count || segment >= self.segments {
            return None;
        }
        self.values.get(device * self.segments + segment).copied()
    }

    /// 第 `segment` 个时段所有设备的开度
    pub fn segment_settings(&self, segment: usize) -> Vec<f64> {
        (0..self.device_count)
            .filter_map(|device| self.setting(device, segment))
            .collect()
    }
}

// ==========================================
// BoundaryState - 已提交调度（边界状态）
// ==========================================
// 每个时刻记录所有设备的已提交开度,后续周期的模拟以此为边界条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryState {
    committed: BTreeMap<NaiveDateTime, Vec<f64>>,
}

impl BoundaryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将轨迹前 `commit_segments` 个时段写入，起点为窗口起始时刻
    ///
    /// 返回实际写入的时段数
    pub fn commit(
        &mut self,
        markers: &[NaiveDateTime],
        window: &SimulationWindow,
        trajectory: &ControlTrajectory,
        commit_segments: usize,
    ) -> usize {
        let mut written = 0;
        for segment in 0..commit_segments.min(trajectory.segments()) {
            let Some(marker) = markers.get(window.start_index + segment) else {
                break;
            };
            self.committed
                .insert(*marker, trajectory.segment_settings(segment));
            written += 1;
        }
        written
    }

    pub fn settings_at(&self, marker: &NaiveDateTime) -> Option<&[f64]> {
        self.committed.get(marker).map(|v| v.as_slice())
    }

    /// 最近一次（不晚于 marker）提交的开度
    pub fn latest_before(&self, marker: &NaiveDateTime) -> Option<&[f64]> {
        self.committed
            .range(..=*marker)
            .next_back()
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDateTime, &Vec<f64>)> {
        self.committed.iter()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}
