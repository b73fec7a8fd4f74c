// ==========================================
// 防洪闸泵群实时调度 - 配置层
// ==========================================
// 职责: 运行配置加载与校验,支持环境变量覆写
// 存储: JSON 配置文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod mpc_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use mpc_config::{
    MonitorTarget, MpcConfig, NetworkConfig, OptimizerConfig, ReservoirConfig, SubBasinConfig,
};
