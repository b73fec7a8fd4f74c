// ==========================================
// 集成测试辅助工具
// ==========================================
// 职责: Mock 水力模型、小规模测试配置、模型实例池构造
// ==========================================

#![allow(dead_code)]

pub mod mock_simulator;

use flood_mpc::config::MpcConfig;
use flood_mpc::domain::{ControlParameters, OptimizationMode};
use flood_mpc::simulator::SimulatorPool;
use mock_simulator::MockSimulator;

/// 小规模配置: 2 台设备 × 4 个时段, 每周期提交 1 个时段
pub fn small_config(mode: OptimizationMode) -> MpcConfig {
    let mut config = MpcConfig::default();
    config.control = ControlParameters {
        horizon_steps: 4,
        resample_ratio: 1,
        control_step_minutes: 10,
        device_count: 2,
    };
    config.segment_minutes = 10;
    config.mode = mode;

    config.optimizer.population_size = 16;
    config.optimizer.tournament_size = 3;
    config.optimizer.steady_generations = 5;
    config.optimizer.max_generations = 15;
    config.optimizer.archive_size = 64;
    config.optimizer.seed = Some(42);
    config
}

/// 由若干相同 Mock 实例组成的模型实例池
pub fn mock_pool(simulator: MockSimulator, workers: usize) -> SimulatorPool<MockSimulator> {
    SimulatorPool::new(vec![simulator; workers.max(1)]).expect("实例池非空")
}
