// ==========================================
// 性能统计
// ==========================================
// 计数器为进程级诊断量: 工作线程上的求值直接累加,不随优化器实例传递
// 日志上下文仍由调用方注入: 慢求值告警挂在求值器持有的 Span 下
// ==========================================

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::Span;

static PERF_EVAL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_EVAL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

// 求值在工作线程上发生，计数为进程级
static EVAL_COUNT: AtomicU64 = AtomicU64::new(0);
static SLOW_EVAL_COUNT: AtomicU64 = AtomicU64::new(0);

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 按环境变量开启模型求值统计（求值计数 + 慢求值日志）
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭（可通过环境变量开启）
/// - `FLOOD_MPC_PERF_EVAL=1` 强制开启
/// - `FLOOD_MPC_SLOW_EVAL_MS=2000` 配置慢求值阈值（毫秒）
pub fn install_from_env() {
    let enabled = match std::env::var("FLOOD_MPC_PERF_EVAL") {
        Ok(v) => is_true(&v),
        Err(_) => cfg!(debug_assertions),
    };

    let slow_ms = std::env::var("FLOOD_MPC_SLOW_EVAL_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 2_000 } else { 10_000 });

    configure(enabled, slow_ms);
}

/// 直接设置统计开关与慢求值阈值（0 表示不记录慢求值）
pub fn configure(enabled: bool, slow_threshold_ms: u64) {
    PERF_EVAL_ENABLED.store(enabled, Ordering::Relaxed);
    SLOW_EVAL_THRESHOLD_MS.store(slow_threshold_ms, Ordering::Relaxed);
}

/// 记录一次候选解求值
pub fn record_evaluation(span: &Span, candidate: usize, duration: Duration) {
    if !PERF_EVAL_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    EVAL_COUNT.fetch_add(1, Ordering::Relaxed);

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_EVAL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_eval",
            parent: span,
            candidate,
            duration_ms = ms,
            "slow evaluation"
        );
        SLOW_EVAL_COUNT.fetch_add(1, Ordering::Relaxed);
    }
}

/// 性能统计 Guard：记录 elapsed_ms + 求值次数 + 慢求值次数
///
/// 使用方式：
/// ```ignore
/// let _perf = flood_mpc::perf::PerfGuard::new("optimize_iteration");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    eval_start: u64,
    slow_eval_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            eval_start: EVAL_COUNT.load(Ordering::Relaxed),
            slow_eval_start: SLOW_EVAL_COUNT.load(Ordering::Relaxed),
        }
    }

    /// 自创建以来的耗时（毫秒）
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// 自创建以来记录的求值次数（进程级,含其他线程）
    pub fn evaluations(&self) -> u64 {
        EVAL_COUNT
            .load(Ordering::Relaxed)
            .saturating_sub(self.eval_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        let evaluations = self.evaluations();
        let slow_evaluations = SLOW_EVAL_COUNT
            .load(Ordering::Relaxed)
            .saturating_sub(self.slow_eval_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            evaluations,
            slow_evaluations,
            "done"
        );
    }
}
