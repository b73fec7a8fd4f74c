// ==========================================
// 防洪闸泵群实时调度 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验
// 存储: JSON 配置文件 (缺省字段取默认值)
// ==========================================

use super::error::{ConfigError, ConfigResult};
use super::mpc_config::MpcConfig;
use crate::domain::OptimizationMode;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug)]
pub struct ConfigManager {
    config: MpcConfig,
}

impl ConfigManager {
    /// 从 JSON 文件加载配置，并应用进程环境变量覆写
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(path = %path.display(), "加载调度配置");
        Self::from_json_with_env(&raw, |key| std::env::var(key).ok())
    }

    /// 从 JSON 字符串加载配置（不读取环境变量）
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        Self::from_json_with_env(raw, |_| None)
    }

    /// 从 JSON 字符串加载配置，环境变量由 `lookup` 提供
    pub fn from_json_with_env<F>(raw: &str, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: MpcConfig = serde_json::from_str(raw)?;
        apply_overrides(&mut config, lookup)?;
        config.validate()?;
        Ok(Self { config })
    }

    /// 使用默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: MpcConfig::default(),
        }
    }

    pub fn config(&self) -> &MpcConfig {
        &self.config
    }

    pub fn into_config(self) -> MpcConfig {
        self.config
    }

    /// 获取配置快照（JSON格式）
    ///
    /// # 用途
    /// - 每次滚动调度开始时写入日志，便于复现
    pub fn snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.config)?)
    }
}

/// 应用环境变量覆写
fn apply_overrides<F>(config: &mut MpcConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(config_keys::SEED) {
        let seed = parse_override::<u64>(config_keys::SEED, &value)?;
        debug!(seed, "环境变量覆写随机种子");
        config.optimizer.seed = Some(seed);
    }

    if let Some(value) = lookup(config_keys::POPULATION) {
        let population = parse_override::<usize>(config_keys::POPULATION, &value)?;
        debug!(population, "环境变量覆写种群规模");
        config.optimizer.population_size = population;
    }

    if let Some(value) = lookup(config_keys::MAX_GENERATIONS) {
        let generations = parse_override::<u64>(config_keys::MAX_GENERATIONS, &value)?;
        debug!(generations, "环境变量覆写最大代数");
        config.optimizer.max_generations = generations;
    }

    if let Some(value) = lookup(config_keys::MODE) {
        let mode =
            OptimizationMode::parse(&value).ok_or_else(|| ConfigError::InvalidOverride {
                key: config_keys::MODE.to_string(),
                value: value.clone(),
            })?;
        debug!(%mode, "环境变量覆写优化模式");
        config.mode = mode;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_string(),
            value: value.to_string(),
        })
}

// ==========================================
// 环境变量覆写键
// ==========================================
pub mod config_keys {
    // 随机种子（可复现运行）
    pub const SEED: &str = "FLOOD_MPC_SEED";

    // 种群与代数
    pub const POPULATION: &str = "FLOOD_MPC_POPULATION";
    pub const MAX_GENERATIONS: &str = "FLOOD_MPC_MAX_GENERATIONS";

    // 优化模式 (MULTI_OBJECTIVE / SINGLE_OBJECTIVE)
    pub const MODE: &str = "FLOOD_MPC_MODE";
}
