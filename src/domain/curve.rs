// ==========================================
// 防洪闸泵群实时调度 - 水位-库容曲线
// ==========================================
// 职责: 各调蓄工程的库容 <-> 水位换算
// 红线: 外部加载,运行期只读
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 曲线构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("曲线点数不足 (structure={structure}): 至少需要 2 个点, 实际 {count}")]
    TooFewPoints { structure: String, count: usize },

    #[error("曲线非单调 (structure={structure}): 第 {index} 个点")]
    NotMonotonic { structure: String, index: usize },

    #[error("曲线含非法数值 (structure={structure}): 第 {index} 个点")]
    NonFinite { structure: String, index: usize },
}

/// 单个工程的库容-水位曲线
///
/// `points` 为 (库容, 水位)，两列均严格递增
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StorageCurveRecord")]
pub struct StorageCurve {
    structure: String,
    points: Vec<(f64, f64)>,
}

/// 曲线的原始反序列化形态，经校验后转为 `StorageCurve`
#[derive(Debug, Clone, Deserialize)]
pub struct StorageCurveRecord {
    pub structure: String,
    pub points: Vec<(f64, f64)>,
}

impl TryFrom<StorageCurveRecord> for StorageCurve {
    type Error = CurveError;

    fn try_from(record: StorageCurveRecord) -> Result<Self, Self::Error> {
        StorageCurve::new(record.structure, record.points)
    }
}

impl StorageCurve {
    pub fn new(structure: impl Into<String>, points: Vec<(f64, f64)>) -> Result<Self, CurveError> {
        let structure = structure.into();
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints {
                structure,
                count: points.len(),
            });
        }
        for (index, (volume, level)) in points.iter().enumerate() {
            if !volume.is_finite() || !level.is_finite() {
                return Err(CurveError::NonFinite { structure, index });
            }
        }
        for index in 1..points.len() {
            let (v0, l0) = points[index - 1];
            let (v1, l1) = points[index];
            if v1 <= v0 || l1 <= l0 {
                return Err(CurveError::NotMonotonic { structure, index });
            }
        }
        Ok(Self { structure, points })
    }

    pub fn structure(&self) -> &str {
        &self.structure
    }

    /// 库容 -> 水位（线性插值，两端截断）
    pub fn level_at(&self, volume: f64) -> f64 {
        interpolate(&self.points, volume, |p| p.0, |p| p.1)
    }

    /// 水位 -> 库容（线性插值，两端截断）
    pub fn volume_at(&self, level: f64) -> f64 {
        interpolate(&self.points, level, |p| p.1, |p| p.0)
    }
}

fn interpolate(
    points: &[(f64, f64)],
    x: f64,
    key: impl Fn(&(f64, f64)) -> f64,
    value: impl Fn(&(f64, f64)) -> f64,
) -> f64 {
    let first = &points[0];
    let last = &points[points.len() - 1];
    if x <= key(first) {
        return value(first);
    }
    if x >= key(last) {
        return value(last);
    }

    // 单调序列上二分定位区间
    let upper = points.partition_point(|p| key(p) < x);
    let (a, b) = (&points[upper - 1], &points[upper]);
    let t = (x - key(a)) / (key(b) - key(a));
    value(a) + t * (value(b) - value(a))
}

/// 全部工程的曲线集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    curves: BTreeMap<String, StorageCurve>,
}

impl CurveData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, curve: StorageCurve) {
        self.curves.insert(curve.structure().to_string(), curve);
    }

    pub fn with_curve(mut self, curve: StorageCurve) -> Self {
        self.insert(curve);
        self
    }

    pub fn get(&self, structure: &str) -> Option<&StorageCurve> {
        self.curves.get(structure)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jdh_curve() -> StorageCurve {
        StorageCurve::new(
            "JDH",
            vec![(0.0, 10.0), (50_000.0, 12.0), (96_852.0, 13.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_interpolation_both_directions() {
        let curve = jdh_curve();
        assert_eq!(curve.level_at(25_000.0), 11.0);
        assert_eq!(curve.volume_at(11.0), 25_000.0);
        assert_eq!(curve.volume_at(12.0), 50_000.0);
    }

    #[test]
    fn test_interpolation_clamps_outside_range() {
        let curve = jdh_curve();
        assert_eq!(curve.level_at(-5.0), 10.0);
        assert_eq!(curve.level_at(1e9), 13.0);
        assert_eq!(curve.volume_at(20.0), 96_852.0);
    }

    #[test]
    fn test_deserialize_validates_points() {
        let ok: StorageCurve =
            serde_json::from_str(r#"{"structure":"JDH","points":[[0.0,10.0],[10.0,11.0]]}"#)
                .unwrap();
        assert_eq!(ok.level_at(5.0), 10.5);

        let bad = serde_json::from_str::<StorageCurve>(
            r#"{"structure":"JDH","points":[[0.0,10.0],[0.0,11.0]]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_rejects_non_monotonic_curve() {
        let err = StorageCurve::new("QTH", vec![(0.0, 5.0), (10.0, 4.0)]).unwrap_err();
        assert_eq!(
            err,
            CurveError::NotMonotonic {
                structure: "QTH".to_string(),
                index: 1
            }
        );
        assert!(matches!(
            StorageCurve::new("QTH", vec![(0.0, 5.0)]),
            Err(CurveError::TooFewPoints { count: 1, .. })
        ));
    }
}
