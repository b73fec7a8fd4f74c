// ==========================================
// 防洪闸泵群实时调度 - 调度提交日志
// ==========================================
// 输出: CSV, 每个滚动周期一行
// 列: iteration, window_start, mode, label, elapsed_ms, front_size,
//     generations, committed (JSON 数组)
// ==========================================

use crate::engine::IterationReport;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// 提交日志错误
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("提交记录序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;

/// 提交日志的一行
#[derive(Debug, Serialize)]
struct CommitLogRow {
    iteration: usize,
    window_start: String,
    mode: String,
    label: String,
    elapsed_ms: u64,
    front_size: usize,
    generations: u64,
    committed: String,
}

impl CommitLogRow {
    fn from_report(report: &IterationReport) -> ReportResult<Self> {
        Ok(Self {
            iteration: report.iteration,
            window_start: report.window_start.format("%Y-%m-%d %H:%M:%S").to_string(),
            mode: report.mode.to_string(),
            label: report
                .label
                .map(|l| l.as_number().to_string())
                .unwrap_or_default(),
            elapsed_ms: report.elapsed_ms,
            front_size: report.front_size,
            generations: report.generations,
            committed: serde_json::to_string(&report.committed)?,
        })
    }
}

/// 写出提交日志
///
/// # 返回
/// 写入的数据行数
pub fn write_commit_log(path: impl AsRef<Path>, reports: &[IterationReport]) -> ReportResult<usize> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for report in reports {
        writer.serialize(CommitLogRow::from_report(report)?)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = reports.len(), "提交日志已写出");
    Ok(reports.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OptimizationMode, PriorityLabel};
    use crate::optimizer::TerminationReason;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn report(iteration: usize, label: Option<PriorityLabel>) -> IterationReport {
        let start = NaiveDate::from_ymd_opt(2020, 7, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        IterationReport {
            iteration,
            window_start: start,
            window_end: start + chrono::Duration::minutes(50),
            mode: if label.is_some() {
                OptimizationMode::SingleObjective
            } else {
                OptimizationMode::MultiObjective
            },
            label,
            baseline_objectives: None,
            chosen_objectives: None,
            front_size: 4,
            generations: 12,
            evaluations: 240,
            termination: TerminationReason::SteadyFitness,
            elapsed_ms: 15,
            decision: vec![0.5, 0.25],
            committed: vec![(start, vec![0.5, 0.25])],
        }
    }

    #[test]
    fn test_write_commit_log_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("commits.csv");

        let written =
            write_commit_log(&path, &[report(0, None), report(1, Some(PriorityLabel::Basin3))])
                .unwrap();
        assert_eq!(written, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "iteration",
                "window_start",
                "mode",
                "label",
                "elapsed_ms",
                "front_size",
                "generations",
                "committed"
            ]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "2020-07-01 08:00:00");
        assert_eq!(&rows[0][3], "");
        assert_eq!(&rows[1][3], PriorityLabel::Basin3.as_number().to_string());
        assert!(rows[0][7].contains("0.25"));
    }

    #[test]
    fn test_empty_reports_write_no_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        assert_eq!(write_commit_log(&path, &[]).unwrap(), 0);
    }
}
