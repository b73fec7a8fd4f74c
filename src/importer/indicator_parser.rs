// ==========================================
// 防洪闸泵群实时调度 - 指标矩阵解析
// ==========================================
// 格式: 每行一个样本,指标以空白分隔; 空行忽略
// ==========================================

use super::error::{ImportError, ImportResult};
use super::text_parser::{content_lines, TextFileParser};
use crate::engine::IndicatorMatrix;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorParser;

impl IndicatorParser {
    pub fn new() -> Self {
        Self
    }
}

impl TextFileParser for IndicatorParser {
    type Output = IndicatorMatrix;

    fn parse_str(&self, raw: &str) -> ImportResult<IndicatorMatrix> {
        let mut rows = Vec::new();
        for (line, content) in content_lines(raw) {
            let row = content
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| ImportError::InvalidNumber {
                        line,
                        token: token.to_string(),
                    })
                })
                .collect::<ImportResult<Vec<f64>>>()?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyInput("指标矩阵没有数据行".to_string()));
        }
        Ok(IndicatorMatrix::new(rows)?)
    }
}

/// 读取指标矩阵文件
pub fn load_indicator_matrix(path: impl AsRef<Path>) -> ImportResult<IndicatorMatrix> {
    IndicatorParser.parse_file(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_rows_and_skip_blank_lines() {
        let matrix = IndicatorParser
            .parse_str("1 2\n\n  3\t2  \n5 2\n\n")
            .unwrap();
        assert_eq!(matrix.sample_count(), 3);
        assert_eq!(matrix.indicator_count(), 2);
        assert_eq!(matrix.rows()[1], vec![3.0, 2.0]);
    }

    #[test]
    fn test_invalid_token_reports_line() {
        let err = IndicatorParser.parse_str("1 2\n\n3 abc\n").unwrap_err();
        match err {
            ImportError::InvalidNumber { line, token } => {
                assert_eq!(line, 3);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_and_ragged_input() {
        assert!(matches!(
            IndicatorParser.parse_str("\n  \n"),
            Err(ImportError::EmptyInput(_))
        ));
        assert!(matches!(
            IndicatorParser.parse_str("1 2\n3\n"),
            Err(ImportError::InvalidMatrix(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.5 1.5 2.5").unwrap();
        writeln!(file, "1.0 1.0 3.0").unwrap();

        let matrix = load_indicator_matrix(file.path()).unwrap();
        assert_eq!(matrix.sample_count(), 2);
        assert_eq!(matrix.indicator_count(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = load_indicator_matrix("/nonexistent/flood-mpc/data.txt").unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
