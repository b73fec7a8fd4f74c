// ==========================================
// 防洪闸泵群实时调度 - 运行配置
// ==========================================
// 职责: 预测控制参数、进化算法参数、工程网络参数
// 默认值: 与现场运行参数 {120, 10, 10, 5} 一致
// ==========================================

use super::error::{ConfigError, ConfigResult};
use crate::domain::{ControlParameters, DecisionBounds, OptimizationMode};
use crate::optimizer::DecisionPolicy;
use serde::{Deserialize, Serialize};

// ==========================================
// MpcConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpcConfig {
    /// 预测控制参数
    pub control: ControlParameters,
    /// 单个决策时段长度（分钟），即相邻时间标记的间隔
    pub segment_minutes: u32,
    /// 设备开度换算系数（决策值 / 系数 = 下发值）
    pub device_scale: f64,
    /// 优化模式
    pub mode: OptimizationMode,
    /// Pareto 前沿取解策略
    pub policy: DecisionPolicy,
    /// 进化算法参数
    pub optimizer: OptimizerConfig,
    /// 工程网络参数
    pub network: NetworkConfig,
}

impl Default for MpcConfig {
    fn default() -> Self {
        Self {
            control: ControlParameters::default(),
            segment_minutes: 10,
            device_scale: 4.5,
            mode: OptimizationMode::MultiObjective,
            policy: DecisionPolicy::NearestIdeal,
            optimizer: OptimizerConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl MpcConfig {
    /// 校验全部配置项
    pub fn validate(&self) -> ConfigResult<()> {
        self.control.validate()?;
        if self.segment_minutes == 0 {
            return Err(ConfigError::invalid("segment_minutes", "必须大于 0"));
        }
        if !(self.device_scale.is_finite() && self.device_scale > 0.0) {
            return Err(ConfigError::invalid("device_scale", "必须为正数"));
        }
        self.policy
            .validate()
            .map_err(|message| ConfigError::invalid("policy", message))?;
        self.optimizer.validate()?;
        self.network.validate()?;
        Ok(())
    }
}

// ==========================================
// OptimizerConfig - 进化算法参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 种群规模 P
    pub population_size: usize,
    /// 锦标赛规模 k
    pub tournament_size: usize,
    /// 均匀变异概率（逐基因）
    pub mutation_probability: f64,
    /// 单点交叉概率（逐配对）
    pub single_point_crossover_probability: f64,
    /// 模拟二进制交叉概率（逐配对）
    pub sbx_probability: f64,
    /// 模拟二进制交叉分布指数
    pub sbx_distribution_index: f64,
    /// 微调变异概率，缺省为 1 / 变量个数
    pub fine_mutation_probability: Option<f64>,
    /// 微调变异幅度（占取值范围的比例）
    pub fine_mutation_scale: f64,
    /// 连续无改进代数上限
    pub steady_generations: u64,
    /// 最大进化代数
    pub max_generations: u64,
    /// Pareto 存档容量
    pub archive_size: usize,
    /// 决策变量取值范围
    pub bounds: DecisionBounds,
    /// 单目标模式下限覆盖
    pub single_objective_lower_bound: Option<f64>,
    /// 随机种子，缺省则使用系统熵
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            tournament_size: 60,
            mutation_probability: 0.3,
            single_point_crossover_probability: 0.2,
            sbx_probability: 1.0,
            sbx_distribution_index: 1.0,
            fine_mutation_probability: None,
            fine_mutation_scale: 0.1,
            steady_generations: 200,
            max_generations: 20_000,
            archive_size: 20_000,
            bounds: DecisionBounds::default(),
            single_objective_lower_bound: Some(0.1),
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.population_size < 2 {
            return Err(ConfigError::invalid("optimizer.population_size", "至少为 2"));
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::invalid("optimizer.tournament_size", "必须大于 0"));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::invalid("optimizer.max_generations", "必须大于 0"));
        }
        if self.archive_size == 0 {
            return Err(ConfigError::invalid("optimizer.archive_size", "必须大于 0"));
        }

        let probabilities = [
            ("optimizer.mutation_probability", Some(self.mutation_probability)),
            (
                "optimizer.single_point_crossover_probability",
                Some(self.single_point_crossover_probability),
            ),
            ("optimizer.sbx_probability", Some(self.sbx_probability)),
            ("optimizer.fine_mutation_probability", self.fine_mutation_probability),
        ];
        for (key, value) in probabilities {
            if let Some(p) = value {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ConfigError::invalid(key, format!("概率 {} 不在 [0, 1] 内", p)));
                }
            }
        }

        if !(self.sbx_distribution_index.is_finite() && self.sbx_distribution_index >= 0.0) {
            return Err(ConfigError::invalid(
                "optimizer.sbx_distribution_index",
                "必须为非负数",
            ));
        }
        if !(self.fine_mutation_scale.is_finite() && self.fine_mutation_scale > 0.0) {
            return Err(ConfigError::invalid("optimizer.fine_mutation_scale", "必须为正数"));
        }

        self.bounds.validate()?;
        self.single_objective_bounds().validate()?;
        Ok(())
    }

    /// 单目标模式下使用的取值范围
    pub fn single_objective_bounds(&self) -> DecisionBounds {
        match self.single_objective_lower_bound {
            Some(lower) => DecisionBounds {
                lower,
                upper: self.bounds.upper,
            },
            None => self.bounds,
        }
    }

    /// 微调变异概率（缺省 1 / 变量个数）
    pub fn fine_mutation_probability_for(&self, variable_count: usize) -> f64 {
        self.fine_mutation_probability
            .unwrap_or_else(|| 1.0 / variable_count.max(1) as f64)
    }
}

// ==========================================
// NetworkConfig - 工程网络参数
// ==========================================

/// 调蓄水库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirConfig {
    /// 模型对象 ID
    pub entity: String,
    /// 安全水位
    pub safety_level: f64,
    /// 额定库容
    pub rating_capacity: f64,
    /// 超安全水位后的经验恢复力常数
    pub resilience: f64,
}

/// 风险目标监测点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorTarget {
    /// 模型对象 ID
    pub entity: String,
    /// 警戒水位
    pub warning_level: f64,
    /// 对应的库容曲线（缺省按水位超高积分）
    #[serde(default)]
    pub curve: Option<String>,
}

/// 子流域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBasinConfig {
    pub name: String,
    /// 入库流量监测对象
    pub inflow_entity: String,
    /// 汇入的水库（`reservoirs` 下标）
    pub reservoir: usize,
    /// 风险目标监测点
    pub monitor: MonitorTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub reservoirs: [ReservoirConfig; 2],
    pub sub_basins: [SubBasinConfig; 3],
    pub level_variable: String,
    pub inflow_variable: String,
    pub volume_variable: String,
    /// 综合得分权重 (库容压力, 预见期, 恢复力)
    pub score_weights: [f64; 3],
    /// 剩余库容下限
    pub capacity_epsilon: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let jdh = ReservoirConfig {
            entity: "JDH".to_string(),
            safety_level: 12.5,
            rating_capacity: 96_852.0,
            resilience: 223.24,
        };
        let qth = ReservoirConfig {
            entity: "Lake_QTH".to_string(),
            safety_level: 5.5,
            rating_capacity: 569_015.25,
            resilience: 2_842.77,
        };

        let basin = |name: &str, inflow: &str, reservoir: usize, monitor: &str, level: f64| {
            SubBasinConfig {
                name: name.to_string(),
                inflow_entity: inflow.to_string(),
                reservoir,
                monitor: MonitorTarget {
                    entity: monitor.to_string(),
                    warning_level: level,
                    curve: None,
                },
            }
        };

        let mut lake = basin("琴亭湖", "Lake_QTH", 1, "Lake_QTH", 5.5);
        lake.monitor.curve = Some("Lake_QTH".to_string());

        Self {
            reservoirs: [jdh, qth],
            sub_basins: [
                basin("解放溪", "JFX_1480", 0, "JFX_1480", 12.5),
                basin("杨亭溪", "YTX_x3", 0, "YTX_x3", 12.5),
                lake,
            ],
            level_variable: "Head".to_string(),
            inflow_variable: "TotalInflow".to_string(),
            volume_variable: "Volume".to_string(),
            score_weights: [0.135, 0.146, 0.719],
            capacity_epsilon: 1e-5,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        for (i, basin) in self.sub_basins.iter().enumerate() {
            if basin.reservoir >= self.reservoirs.len() {
                return Err(ConfigError::invalid(
                    &format!("network.sub_basins[{}].reservoir", i),
                    format!("水库下标 {} 越界", basin.reservoir),
                ));
            }
        }
        for (i, reservoir) in self.reservoirs.iter().enumerate() {
            if !(reservoir.resilience.is_finite() && reservoir.resilience >= 0.0) {
                return Err(ConfigError::invalid(
                    &format!("network.reservoirs[{}].resilience", i),
                    "必须为非负数",
                ));
            }
        }
        if !(self.capacity_epsilon > 0.0) {
            return Err(ConfigError::invalid("network.capacity_epsilon", "必须为正数"));
        }
        Ok(())
    }
}
