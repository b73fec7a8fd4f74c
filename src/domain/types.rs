// ==========================================
// 防洪闸泵群实时调度 - 领域类型定义
// ==========================================
// 职责: 优先级标签、优化模式、控制器阶段等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 优先级标签 (Priority Label)
// ==========================================
// 红线: 每个滚动周期重新计算,不得跨周期缓存
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityLabel {
    Basin1, // 子流域1 (解放溪)
    Basin2, // 子流域2 (杨亭溪)
    Basin3, // 子流域3 (琴亭湖)
}

impl PriorityLabel {
    /// 目标向量下标 (0..3)
    pub fn objective_index(&self) -> usize {
        match self {
            PriorityLabel::Basin1 => 0,
            PriorityLabel::Basin2 => 1,
            PriorityLabel::Basin3 => 2,
        }
    }

    /// 数字标签 (1..=3)
    pub fn as_number(&self) -> u8 {
        self.objective_index() as u8 + 1
    }

    /// 从数字标签解析
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PriorityLabel::Basin1),
            2 => Some(PriorityLabel::Basin2),
            3 => Some(PriorityLabel::Basin3),
            _ => None,
        }
    }

    /// 由三个子流域综合得分选出优先级
    ///
    /// 规则:
    /// 1) 默认 1
    /// 2) p2 严格最大 => 2
    /// 3) 否则 p3 > p1 => 3
    ///
    /// 注意: 第3条不与 p2 比较
    pub fn from_scores(scores: [f64; 3]) -> Self {
        let [p1, p2, p3] = scores;
        if p2 > p1 && p2 > p3 {
            PriorityLabel::Basin2
        } else if p3 > p1 {
            PriorityLabel::Basin3
        } else {
            PriorityLabel::Basin1
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

// ==========================================
// 优化模式 (Optimization Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationMode {
    MultiObjective,  // NSGA-II 多目标
    SingleObjective, // 优先级单目标
}

impl fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationMode::MultiObjective => write!(f, "MULTI_OBJECTIVE"),
            OptimizationMode::SingleObjective => write!(f, "SINGLE_OBJECTIVE"),
        }
    }
}

impl OptimizationMode {
    /// 从字符串解析模式
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MULTI_OBJECTIVE" | "MULTI" | "MOEA" => Some(OptimizationMode::MultiObjective),
            "SINGLE_OBJECTIVE" | "SINGLE" | "GA" => Some(OptimizationMode::SingleObjective),
            _ => None,
        }
    }
}

// ==========================================
// 控制器阶段 (Controller Phase)
// ==========================================
// 状态机: Idle -> Predicting -> Optimizing -> Committing -> Advancing -> (Predicting | Done)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerPhase {
    Idle,
    Predicting,
    Optimizing,
    Committing,
    Advancing,
    Done,
}

impl fmt::Display for ControllerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerPhase::Idle => write!(f, "IDLE"),
            ControllerPhase::Predicting => write!(f, "PREDICTING"),
            ControllerPhase::Optimizing => write!(f, "OPTIMIZING"),
            ControllerPhase::Committing => write!(f, "COMMITTING"),
            ControllerPhase::Advancing => write!(f, "ADVANCING"),
            ControllerPhase::Done => write!(f, "DONE"),
        }
    }
}
