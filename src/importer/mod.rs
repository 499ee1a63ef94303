// ==========================================
// 设备维护排程系统 - 导入层
// ==========================================
// 职责: 外部设备清单导入, 生成 EquipmentRecord
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod equipment_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use equipment_importer::EquipmentImporter;
pub use error::{ImportError, ImportResult};
pub use field_mapper::EquipmentFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, ParsedRow, ParsedTable, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{FieldMapper, FileParser};
