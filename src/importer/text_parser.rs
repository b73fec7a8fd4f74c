// ==========================================
// 防洪闸泵群实时调度 - 文本文件解析 Trait
// ==========================================
// 职责: 统一 "检查存在 -> 读取 -> 逐行解析" 流程
// 实现者: IndicatorParser, TimeMarkerParser
// ==========================================

use super::error::{ImportError, ImportResult};
use std::fs;
use std::path::Path;
use tracing::debug;

pub trait TextFileParser {
    type Output;

    /// 解析内存中的文本
    fn parse_str(&self, raw: &str) -> ImportResult<Self::Output>;

    /// 读取并解析文件
    fn parse_file(&self, path: &Path) -> ImportResult<Self::Output> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| ImportError::ReadError(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = raw.len(), "读取输入文件");
        self.parse_str(&raw)
    }
}

/// 非空白行及其行号（从 1 开始）
pub(crate) fn content_lines(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}
