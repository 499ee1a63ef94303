// ==========================================
// 设备维护排程系统 - 导入接口
// ==========================================
// 导入管道: 文件解析 → 列契约检查 → 逐行映射
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{ParsedRow, ParsedTable};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始字符串行
    ///
    /// # 返回
    /// - Ok(ParsedTable): 已去除完全空白的行
    /// - Err: 文件不存在 / 格式不支持 / 解析失败
    fn parse(&self, file_path: &Path) -> ImportResult<ParsedTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 实现者: EquipmentFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 检查列契约, 一次列出全部缺失的必需列
    fn check_columns(&self, headers: &[String]) -> ImportResult<()>;

    /// 单行映射 + 类型转换
    fn map_row(&self, row: &ParsedRow) -> ImportResult<EquipmentRecord>;
}
