// ==========================================
// 防洪闸泵群实时调度 - 模型结果集
// ==========================================
// 职责: 一次模型计算的全部输出序列,按 (对象, 变量) 检索
// ==========================================

use super::error::{SimResult, SimulatorError};
use crate::domain::TimeSeries;
use std::collections::BTreeMap;

/// 模拟结果集
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    series: BTreeMap<(String, String), TimeSeries>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: TimeSeries) {
        self.series
            .insert((series.entity.clone(), series.variable.clone()), series);
    }

    pub fn with_series(mut self, series: TimeSeries) -> Self {
        self.insert(series);
        self
    }

    /// 读取 (对象, 变量) 的结果序列
    pub fn read_series(&self, entity: &str, variable: &str) -> SimResult<&TimeSeries> {
        self.series
            .get(&(entity.to_string(), variable.to_string()))
            .ok_or_else(|| SimulatorError::SeriesNotFound {
                entity: entity.to_string(),
                variable: variable.to_string(),
            })
    }

    /// 读取非空序列
    pub fn read_non_empty(&self, entity: &str, variable: &str) -> SimResult<&TimeSeries> {
        let series = self.read_series(entity, variable)?;
        if series.is_empty() {
            return Err(SimulatorError::EmptySeries {
                entity: entity.to_string(),
                variable: variable.to_string(),
            });
        }
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSeries> {
        self.series.values()
    }
}
