// ==========================================
// 防洪闸泵群实时调度 - 控制事件发布
// ==========================================
// 职责: 定义控制事件发布 trait，实现依赖倒置
// 说明: Engine 层定义 trait，现场下发/监控适配器实现
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 控制事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlEventType {
    /// 滚动调度开始
    RunStarted,
    /// 一个周期的调度已提交
    ScheduleCommitted,
    /// 滚动调度结束
    RunFinished,
}

impl ControlEventType {
    pub fn as_str(&self) -> &str {
        match self {
            ControlEventType::RunStarted => "RunStarted",
            ControlEventType::ScheduleCommitted => "ScheduleCommitted",
            ControlEventType::RunFinished => "RunFinished",
        }
    }
}

/// 控制事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlEvent {
    /// 滚动调度运行 ID
    pub run_id: String,
    pub event_type: ControlEventType,
    /// 周期序号（运行级事件为 None）
    pub iteration: Option<usize>,
    /// 已提交的 (时刻, 各设备开度)
    pub commitments: Vec<(NaiveDateTime, Vec<f64>)>,
}

impl ControlEvent {
    /// 运行级事件
    pub fn run(run_id: &str, event_type: ControlEventType) -> Self {
        Self {
            run_id: run_id.to_string(),
            event_type,
            iteration: None,
            commitments: Vec::new(),
        }
    }

    /// 周期提交事件
    pub fn committed(
        run_id: &str,
        iteration: usize,
        commitments: Vec<(NaiveDateTime, Vec<f64>)>,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            event_type: ControlEventType::ScheduleCommitted,
            iteration: Some(iteration),
            commitments,
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 控制事件发布者 Trait
///
/// # 实现说明
/// - 现场适配器将 `ScheduleCommitted` 中的开度下发到闸泵
/// - 发布失败只记录告警，不中断滚动调度
pub trait ControlEventPublisher: Send + Sync {
    fn publish(&self, event: &ControlEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
///
/// 用于不需要事件发布的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl ControlEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: &ControlEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - run_id={}, event_type={}",
            event.run_id,
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn ControlEventPublisher>> 的使用
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn ControlEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn ControlEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者），失败记录告警
    pub fn publish(&self, event: ControlEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };
        if let Err(e) = publisher.publish(&event) {
            tracing::warn!(
                run_id = %event.run_id,
                event_type = event.event_type.as_str(),
                error = %e,
                "控制事件发布失败"
            );
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<ControlEventType>>,
    }

    impl ControlEventPublisher for Recorder {
        fn publish(&self, event: &ControlEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.events.lock().unwrap().push(event.event_type);
            Ok(())
        }
    }

    struct Failing;

    impl ControlEventPublisher for Failing {
        fn publish(&self, _event: &ControlEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("下发通道断开".into())
        }
    }

    #[test]
    fn test_optional_publisher_forwards_events() {
        let recorder = Arc::new(Recorder::default());
        let publisher = OptionalEventPublisher::with_publisher(recorder.clone());
        assert!(publisher.is_configured());

        publisher.publish(ControlEvent::run("run-1", ControlEventType::RunStarted));
        publisher.publish(ControlEvent::committed("run-1", 0, Vec::new()));

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![
                ControlEventType::RunStarted,
                ControlEventType::ScheduleCommitted
            ]
        );
    }

    #[test]
    fn test_publish_failure_is_swallowed() {
        let publisher = OptionalEventPublisher::with_publisher(Arc::new(Failing));
        publisher.publish(ControlEvent::run("run-2", ControlEventType::RunFinished));
        assert!(!OptionalEventPublisher::none().is_configured());
        NoOpEventPublisher
            .publish(&ControlEvent::run("run-2", ControlEventType::RunFinished))
            .unwrap();
    }
}
