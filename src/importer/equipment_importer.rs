// ==========================================
// 设备维护排程系统 - 设备清单导入器
// ==========================================
// 流程: 解析 → 列契约检查 → 逐行映射
// 红线: 不做清洗修正, 不做随机补齐; 任一行失败即整体失败
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::EquipmentFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{FieldMapper, FileParser};
use std::path::Path;
use tracing::{info, instrument};

pub struct EquipmentImporter {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
}

impl EquipmentImporter {
    /// 按扩展名自动选择解析器
    pub fn new() -> Self {
        Self::with_components(Box::new(UniversalFileParser), Box::new(EquipmentFieldMapper))
    }

    pub fn with_components(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
        }
    }

    /// 导入设备清单
    ///
    /// # 返回
    /// - Ok(Vec<EquipmentRecord>): 保持文件行顺序
    /// - Err: 文件错误 / 缺少必需列 / 单元格为空或无法转换
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<EquipmentRecord>> {
        let table = self.file_parser.parse(file_path.as_ref())?;
        info!(
            columns = table.headers.len(),
            rows = table.rows.len(),
            "文件解析完成"
        );

        self.field_mapper.check_columns(&table.headers)?;

        let records = table
            .rows
            .iter()
            .map(|row| self.field_mapper.map_row(row))
            .collect::<ImportResult<Vec<_>>>()?;

        info!(count = records.len(), "设备清单导入完成");
        Ok(records)
    }
}

impl Default for EquipmentImporter {
    fn default() -> Self {
        Self::new()
    }
}
