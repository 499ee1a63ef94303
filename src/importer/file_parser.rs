// ==========================================
// 设备维护排程系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 表头 + 原始字符串行（不做类型转换）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 单行原始数据
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub row_number: usize, // 文件中的行号（表头为第 1 行）
    pub values: HashMap<String, String>,
}

impl ParsedRow {
    /// 取非空单元格（已 trim）
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ImportResult<ParsedTable> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let values: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.trim().to_string()))
                .collect();

            // 跳过完全空白的行
            if values.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(ParsedRow {
                row_number: idx + 2,
                values,
            });
        }

        Ok(ParsedTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读第一个工作表, 第一行为表头
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, file_path: &Path) -> ImportResult<ParsedTable> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, data_row) in sheet_rows.enumerate() {
            let values: HashMap<String, String> = headers
                .iter()
                .zip(data_row.iter())
                .map(|(h, cell)| (h.clone(), cell.to_string().trim().to_string()))
                .collect();

            if values.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(ParsedRow {
                row_number: idx + 2,
                values,
            });
        }

        Ok(ParsedTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse(&self, file_path: &Path) -> ImportResult<ParsedTable> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse(file_path),
            "xlsx" | "xls" => ExcelParser.parse(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(&["equipment_id,cost,failure_probability", "EQ-1, 100 ,0.5"]);
        let table = CsvParser.parse(file.path()).unwrap();

        assert_eq!(table.headers, vec!["equipment_id", "cost", "failure_probability"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("cost"), Some("100"));
        assert_eq!(table.rows[0].row_number, 2);
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let file = csv_file(&["equipment_id,cost", "EQ-1,1", ",", "EQ-2,2"]);
        let table = CsvParser.parse(file.path()).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].row_number, 4);
    }

    #[test]
    fn test_file_not_found() {
        let result = CsvParser.parse(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_rejects_unknown_extension() {
        let result = UniversalFileParser.parse(Path::new("equipment.json"));
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ref ext)) if ext == "json"));
    }
}
