// ==========================================
// 防洪闸泵群实时调度 - 时间标记解析
// ==========================================
// 格式: 每行一个时刻; 空行忽略
// 支持: %m/%d/%Y %H:%M:%S | %Y-%m-%d %H:%M:%S | %Y-%m-%d %H:%M
// ==========================================

use super::error::{ImportError, ImportResult};
use super::text_parser::{content_lines, TextFileParser};
use chrono::NaiveDateTime;
use std::path::Path;

/// 依次尝试的时刻格式
pub const MARKER_FORMATS: [&str; 3] = ["%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeMarkerParser;

impl TimeMarkerParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析单个时刻
    pub fn parse_marker(value: &str) -> Option<NaiveDateTime> {
        MARKER_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    }
}

impl TextFileParser for TimeMarkerParser {
    type Output = Vec<NaiveDateTime>;

    fn parse_str(&self, raw: &str) -> ImportResult<Vec<NaiveDateTime>> {
        let markers = content_lines(raw)
            .map(|(line, value)| {
                Self::parse_marker(value).ok_or_else(|| ImportError::InvalidTimeMarker {
                    line,
                    value: value.to_string(),
                })
            })
            .collect::<ImportResult<Vec<_>>>()?;

        if markers.is_empty() {
            return Err(ImportError::EmptyInput("时间标记文件没有数据行".to_string()));
        }
        Ok(markers)
    }
}

/// 读取时间标记文件
pub fn load_time_markers(path: impl AsRef<Path>) -> ImportResult<Vec<NaiveDateTime>> {
    TimeMarkerParser.parse_file(path.as_ref())
}
