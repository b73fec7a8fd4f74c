// ==========================================
// 防洪闸泵群实时调度 - 导入层
// ==========================================
// 职责: 外部文本数据导入,生成内部数据
// 支持: 指标矩阵 (熵权输入), 时间标记序列
// ==========================================

// 模块声明
pub mod error;
pub mod indicator_parser;
pub mod text_parser;
pub mod time_markers;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use indicator_parser::{load_indicator_matrix, IndicatorParser};
pub use text_parser::TextFileParser;
pub use time_markers::{load_time_markers, TimeMarkerParser, MARKER_FORMATS};
