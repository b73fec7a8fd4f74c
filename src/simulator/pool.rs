// ==========================================
// 防洪闸泵群实时调度 - 模型实例池
// ==========================================
// 职责: 管理 N 个相互隔离的水力模型实例
// 红线: 任一时刻一个实例只被一个求值任务独占,不得共享工作文件
// ==========================================

use super::error::{SimResult, SimulatorError};
use super::Simulator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// 模型实例池
///
/// 单实例时所有求值严格串行；多实例时每个工作线程独占一个实例,
/// 从共享计数器领取任务下标。
pub struct SimulatorPool<S: Simulator> {
    instances: Vec<S>,
}

impl<S: Simulator> SimulatorPool<S> {
    pub fn new(instances: Vec<S>) -> SimResult<Self> {
        if instances.is_empty() {
            return Err(SimulatorError::EmptyPool);
        }
        Ok(Self { instances })
    }

    pub fn single(instance: S) -> Self {
        Self {
            instances: vec![instance],
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// 主实例：用于预测计算与配置回写
    pub fn primary(&mut self) -> &mut S {
        &mut self.instances[0]
    }

    pub fn instances(&self) -> &[S] {
        &self.instances
    }

    /// 对一批任务求值，结果按任务下标返回
    ///
    /// 完成顺序不影响返回顺序
    pub fn map_exclusive<T, R, F>(&mut self, tasks: &[T], f: F) -> SimResult<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&mut S, usize, &T) -> R + Sync,
    {
        if self.instances.len() == 1 || tasks.len() <= 1 {
            let instance = &mut self.instances[0];
            return Ok(tasks
                .iter()
                .enumerate()
                .map(|(index, task)| f(instance, index, task))
                .collect());
        }

        let next = AtomicUsize::new(0);
        let workers = self.instances.len().min(tasks.len());

        let joined: Vec<thread::Result<Vec<(usize, R)>>> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .instances
                .iter_mut()
                .take(workers)
                .map(|instance| {
                    let next = &next;
                    let f = &f;
                    scope.spawn(move || {
                        let mut done = Vec::new();
                        loop {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            if index >= tasks.len() {
                                break;
                            }
                            done.push((index, f(instance, index, &tasks[index])));
                        }
                        done
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join()).collect()
        });

        let mut indexed = Vec::with_capacity(tasks.len());
        for (worker, result) in joined.into_iter().enumerate() {
            let done = result.map_err(|_| SimulatorError::WorkerPanicked(worker))?;
            indexed.extend(done);
        }
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, r)| r).collect())
    }
}
