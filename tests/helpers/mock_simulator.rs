// ==========================================
// Mock 水力模型 - 用于集成测试
// ==========================================
// 确定性代理模型:
// - 洪水过程线 q(t) 为高斯形, 幅值 = flood_scale
// - 偶数号设备为泄洪闸: 降低解放溪/杨亭溪水位, 抬高琴亭湖水位
// - 奇数号设备为排涝泵: 降低琴亭湖水位, 抬高杨亭溪水位
// 两类设备作用相反, 三个目标存在真实的权衡
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use flood_mpc::domain::{BoundaryState, ControlTrajectory, SimulationWindow, StorageCurve, TimeSeries};
use flood_mpc::simulator::{ResultStore, SimResult, Simulator, SimulatorError};
use flood_mpc::CurveData;

/// 每个决策时段内的结果步数
pub const STEPS_PER_SEGMENT: usize = 2;
/// 结果序列步长（分钟）
pub const STEP_MINUTES: u32 = 5;
/// 设备开度物理上限
pub const DEVICE_SCALE: f64 = 4.5;

/// 故障注入方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailureMode {
    None,
    /// 所有候选轨迹的计算都失败（基准工况正常）
    Candidates,
    /// 每 n 次候选计算失败一次
    EveryNthCandidate(usize),
    /// 基准工况计算失败
    Baseline,
    /// 配置回写失败
    Regenerate,
}

#[derive(Debug, Clone)]
pub struct MockSimulator {
    flood_scale: f64,
    failure: FailureMode,
    /// 当前配置: (窗口, 各时段 [泄洪, 排涝] 平均开度, 是否为候选轨迹)
    pending: Option<(SimulationWindow, Vec<[f64; 2]>, bool)>,
    candidate_runs: usize,
    pub runs: usize,
    pub regenerations: usize,
    pub last_regenerated: Option<BoundaryState>,
}

impl MockSimulator {
    pub fn new(flood_scale: f64) -> Self {
        Self {
            flood_scale,
            failure: FailureMode::None,
            pending: None,
            candidate_runs: 0,
            runs: 0,
            regenerations: 0,
            last_regenerated: None,
        }
    }

    pub fn with_failure(mut self, failure: FailureMode) -> Self {
        self.failure = failure;
        self
    }

    /// 高斯形洪水过程线, 峰值位于第 12 步
    fn hydrograph(&self, step: usize) -> f64 {
        let x = (step as f64 - 12.0) / 6.0;
        self.flood_scale * (-x * x).exp()
    }

    fn openings(device_values: impl Fn(usize) -> f64, device_count: usize) -> [f64; 2] {
        let mut sums = [0.0; 2];
        let mut counts = [0usize; 2];
        for device in 0..device_count {
            let kind = device % 2;
            sums[kind] += device_values(device);
            counts[kind] += 1;
        }
        [
            if counts[0] > 0 { sums[0] / counts[0] as f64 } else { 0.0 },
            if counts[1] > 0 { sums[1] / counts[1] as f64 } else { 0.0 },
        ]
    }
}

impl Simulator for MockSimulator {
    fn configure(
        &mut self,
        window: &SimulationWindow,
        boundary: &BoundaryState,
        trajectory: Option<&ControlTrajectory>,
    ) -> SimResult<()> {
        let openings = match trajectory {
            Some(t) => (0..t.segments())
                .map(|s| {
                    Self::openings(
                        |d| t.setting(d, s).unwrap_or(0.0) / DEVICE_SCALE,
                        t.device_count(),
                    )
                })
                .collect(),
            // 基准工况沿用最近一次已提交的开度（已量化到 [0, 1]）
            None => {
                let held = boundary
                    .latest_before(&window.start)
                    .map(|settings| Self::openings(|d| settings[d], settings.len()))
                    .unwrap_or([0.0, 0.0]);
                vec![held; window.segments]
            }
        };
        self.pending = Some((window.clone(), openings, trajectory.is_some()));
        Ok(())
    }

    fn run(&mut self) -> SimResult<ResultStore> {
        let (window, openings, candidate) = self
            .pending
            .take()
            .ok_or_else(|| SimulatorError::RunFailed("未配置".to_string()))?;
        self.runs += 1;

        if candidate {
            self.candidate_runs += 1;
            match self.failure {
                FailureMode::Candidates => {
                    return Err(SimulatorError::RunFailed("候选轨迹计算发散".to_string()))
                }
                FailureMode::EveryNthCandidate(n) if n > 0 && self.candidate_runs % n == 0 => {
                    return Err(SimulatorError::RunFailed("候选轨迹计算发散".to_string()))
                }
                _ => {}
            }
        } else if self.failure == FailureMode::Baseline {
            return Err(SimulatorError::RunFailed("基准工况计算失败".to_string()));
        }

        let steps = window.segments * STEPS_PER_SEGMENT;
        let offset = window.start_index * STEPS_PER_SEGMENT;
        let mut series: [Vec<f64>; 9] = Default::default();
        for k in 0..steps {
            let q = self.hydrograph(offset + k);
            let [release, pump] = openings
                .get(k / STEPS_PER_SEGMENT)
                .copied()
                .unwrap_or([0.0, 0.0]);

            // 水位
            series[0].push(12.0 + 1.5 * q - 1.2 * release);
            series[1].push(12.0 + 1.0 * q - 0.6 * release + 0.8 * pump);
            series[2].push(5.0 + 1.2 * q + 0.8 * release - 1.0 * pump);
            series[3].push(12.0 + 1.0 * q - 0.5 * release);
            // 入流
            series[4].push(80.0 * q);
            series[5].push(50.0 * q);
            series[6].push(300.0 * q);
            // 库容
            series[7].push(90_000.0 + 2_000.0 * q);
            series[8].push(400_000.0 + 50_000.0 * q);
        }

        let [jfx, ytx, qth, jdh, jfx_in, ytx_in, qth_in, jdh_v, qth_v] = series;
        Ok(ResultStore::new()
            .with_series(TimeSeries::new("JFX_1480", "Head", STEP_MINUTES, jfx))
            .with_series(TimeSeries::new("YTX_x3", "Head", STEP_MINUTES, ytx))
            .with_series(TimeSeries::new("Lake_QTH", "Head", STEP_MINUTES, qth))
            .with_series(TimeSeries::new("JDH", "Head", STEP_MINUTES, jdh))
            .with_series(TimeSeries::new("JFX_1480", "TotalInflow", STEP_MINUTES, jfx_in))
            .with_series(TimeSeries::new("YTX_x3", "TotalInflow", STEP_MINUTES, ytx_in))
            .with_series(TimeSeries::new("Lake_QTH", "TotalInflow", STEP_MINUTES, qth_in))
            .with_series(TimeSeries::new("JDH", "Volume", STEP_MINUTES, jdh_v))
            .with_series(TimeSeries::new("Lake_QTH", "Volume", STEP_MINUTES, qth_v)))
    }

    fn regenerate(&mut self, boundary: &BoundaryState) -> SimResult<()> {
        if self.failure == FailureMode::Regenerate {
            return Err(SimulatorError::RegenerateFailed("配置文件只读".to_string()));
        }
        self.regenerations += 1;
        self.last_regenerated = Some(boundary.clone());
        Ok(())
    }
}

/// 琴亭湖库容曲线 (库容, 水位)
pub fn lake_curves() -> CurveData {
    CurveData::new().with_curve(
        StorageCurve::new(
            "Lake_QTH",
            vec![
                (0.0, 3.0),
                (300_000.0, 5.0),
                (500_000.0, 6.0),
                (900_000.0, 8.0),
                (2_000_000.0, 11.0),
            ],
        )
        .expect("合法曲线"),
    )
}

/// 从 2020-07-01 08:00 起, 间隔 `STEPS_PER_SEGMENT * STEP_MINUTES` 分钟的时间标记
pub fn markers(count: usize) -> Vec<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2020, 7, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let step = (STEPS_PER_SEGMENT as u32 * STEP_MINUTES) as i64;
    (0..count)
        .map(|i| start + Duration::minutes(step * i as i64))
        .collect()
}
