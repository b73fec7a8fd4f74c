// ==========================================
// 防洪闸泵群实时调度 - 熵权法指标赋权
// ==========================================
// 步骤:
// 1) 列和归一化得到占比 p_ij
// 2) 熵 e_j = -Σ p_ij ln p_ij / ln n (约定 0·ln0 = 0)
// 3) 差异系数 d_j = 1 - e_j
// 4) 权重 w_j = d_j / Σ d
// 红线: 纯函数,相同输入逐位相同输出; 常数列权重严格为 0
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 熵权计算错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightingError {
    #[error("样本数不足: 至少 2 行, 实际 {0}")]
    InsufficientSamples(usize),

    #[error("第 {column} 列之和不大于 0")]
    ZeroColumnSum { column: usize },

    #[error("非法指标值 (行 {row}, 列 {column}): {value}")]
    InvalidEntry { row: usize, column: usize, value: f64 },

    #[error("第 {row} 行列数为 {found}, 期望 {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("所有指标均为常数列, 无法赋权")]
    NoVariance,
}

/// Result 类型别名
pub type WeightingResult<T> = Result<T, WeightingError>;

// ==========================================
// IndicatorMatrix - 指标矩阵 (n 样本 × m 指标)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorMatrix {
    rows: Vec<Vec<f64>>,
}

impl IndicatorMatrix {
    /// 构造并校验矩形、非负、有限
    pub fn new(rows: Vec<Vec<f64>>) -> WeightingResult<Self> {
        let expected = rows.first().map(|r| r.len()).unwrap_or(0);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(WeightingError::RaggedRow {
                    row,
                    expected,
                    found: values.len(),
                });
            }
            for (column, value) in values.iter().enumerate() {
                if !value.is_finite() || *value < 0.0 {
                    return Err(WeightingError::InvalidEntry {
                        row,
                        column,
                        value: *value,
                    });
                }
            }
        }
        Ok(Self { rows })
    }

    pub fn sample_count(&self) -> usize {
        self.rows.len()
    }

    pub fn indicator_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |r| r[j])
    }
}

// ==========================================
// WeightVector - 权重向量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 三指标权重可直接作为 Pareto 取解的加权系数
    pub fn as_objective_weights(&self) -> Option<[f64; 3]> {
        match self.0.as_slice() {
            [a, b, c] => Some([*a, *b, *c]),
            _ => None,
        }
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_weights(&self.0))
    }
}

/// 熵权法计算指标权重
pub fn entropy_weights(matrix: &IndicatorMatrix) -> WeightingResult<WeightVector> {
    let n = matrix.sample_count();
    if n < 2 {
        return Err(WeightingError::InsufficientSamples(n));
    }

    let m = matrix.indicator_count();
    let ln_n = (n as f64).ln();
    let mut divergence = Vec::with_capacity(m);

    for j in 0..m {
        let sum: f64 = matrix.column(j).sum();
        if sum <= 0.0 {
            return Err(WeightingError::ZeroColumnSum { column: j });
        }

        let first = matrix.rows()[0][j];
        if matrix.column(j).all(|v| v == first) {
            divergence.push(0.0);
            continue;
        }

        let entropy = -matrix
            .column(j)
            .map(|v| v / sum)
            .filter(|p| *p > 0.0)
            .map(|p| p * p.ln())
            .sum::<f64>()
            / ln_n;
        divergence.push((1.0 - entropy).max(0.0));
    }

    let total: f64 = divergence.iter().sum();
    if total <= 0.0 {
        return Err(WeightingError::NoVariance);
    }

    Ok(WeightVector(divergence.into_iter().map(|d| d / total).collect()))
}

/// 权重输出格式: `[w1, w2, ...]`, 保留 6 位小数
pub fn format_weights(weights: &[f64]) -> String {
    let parts: Vec<String> = weights.iter().map(|w| format!("{:.6}", w)).collect();
    format!("[{}]", parts.join(", "))
}
