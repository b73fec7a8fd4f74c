// ==========================================
// 防洪闸泵群实时调度 - 水力模型协作接口
// ==========================================
// 职责: 定义外部水力模型需满足的三段式契约
//       configure -> run -> read_series
// 说明: 模型内部的文件格式与二进制结果存储不属于本 crate
// ==========================================

pub mod error;
pub mod pool;
pub mod result_store;

pub use error::{SimResult, SimulatorError};
pub use pool::SimulatorPool;
pub use result_store::ResultStore;

use crate::domain::{BoundaryState, ControlTrajectory, SimulationWindow};

// ==========================================
// Simulator Trait
// ==========================================
// 实现者: 外部水力模型适配器（每个实例持有私有工作目录）
pub trait Simulator: Send {
    /// 设置模拟窗口、边界状态与候选控制轨迹
    ///
    /// `trajectory` 为 None 时按已提交调度计算（预测/基准工况）
    fn configure(
        &mut self,
        window: &SimulationWindow,
        boundary: &BoundaryState,
        trajectory: Option<&ControlTrajectory>,
    ) -> SimResult<()>;

    /// 执行一次计算，返回全部结果序列
    fn run(&mut self) -> SimResult<ResultStore>;

    /// 将已提交调度写回模型配置
    fn regenerate(&mut self, _boundary: &BoundaryState) -> SimResult<()> {
        Ok(())
    }
}

/// 配置并计算，一次完成
pub fn simulate<S: Simulator + ?Sized>(
    simulator: &mut S,
    window: &SimulationWindow,
    boundary: &BoundaryState,
    trajectory: Option<&ControlTrajectory>,
) -> SimResult<ResultStore> {
    simulator.configure(window, boundary, trajectory)?;
    simulator.run()
}
