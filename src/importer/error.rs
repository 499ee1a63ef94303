// ==========================================
// 设备维护排程系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 列契约错误 =====
    #[error("缺少必需列: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    // ===== 数据映射错误 =====
    #[error("必需字段为空 (行 {row}, 字段 {field})")]
    MissingValue { row: usize, field: String },

    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },
}

impl ImportError {
    /// 缺失列名列表（非列契约错误时为空）
    pub fn missing_columns(&self) -> &[String] {
        match self {
            ImportError::MissingColumns { columns } => columns,
            _ => &[],
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_every_column() {
        let err = ImportError::MissingColumns {
            columns: vec!["cost".to_string(), "failure_probability".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("cost"));
        assert!(msg.contains("failure_probability"));
        assert_eq!(err.missing_columns().len(), 2);
    }
}
