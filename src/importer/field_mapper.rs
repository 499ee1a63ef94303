// ==========================================
// 设备维护排程系统 - 字段映射器实现
// ==========================================
// 职责: 列契约检查 + 原始字符串 → EquipmentRecord 类型转换
// 红线: 必需列缺失时一次列出全部缺失列; 空的必需单元格报行号与字段
// ==========================================

use crate::domain::equipment::{columns, EquipmentRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::ParsedRow;
use crate::importer::importer_trait::FieldMapper;

pub struct EquipmentFieldMapper;

impl FieldMapper for EquipmentFieldMapper {
    fn check_columns(&self, headers: &[String]) -> ImportResult<()> {
        let missing: Vec<String> = columns::REQUIRED
            .iter()
            .filter(|required| !headers.iter().any(|h| h == *required))
            .map(|c| c.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::MissingColumns { columns: missing })
        }
    }

    fn map_row(&self, row: &ParsedRow) -> ImportResult<EquipmentRecord> {
        let equipment_id = row
            .get(columns::EQUIPMENT_ID)
            .ok_or_else(|| ImportError::MissingValue {
                row: row.row_number,
                field: columns::EQUIPMENT_ID.to_string(),
            })?
            .to_string();

        Ok(EquipmentRecord {
            equipment_id,

            // 必需数值
            failure_probability: self.required_f64(row, columns::FAILURE_PROBABILITY)?,
            cost: self.required_f64(row, columns::COST)?,

            // 可选数值
            risk_impact: self.optional_f64(row, columns::RISK_IMPACT)?,
            labor_hours: self.optional_f64(row, columns::LABOR_HOURS)?,
            age: self.optional_f64(row, columns::AGE)?,
            utilization_pct: self.optional_f64(row, columns::UTILIZATION_PCT)?,
            downtime_hours: self.optional_f64(row, columns::DOWNTIME_HOURS)?,
            production_per_hour: self.optional_f64(row, columns::PRODUCTION_PER_HOUR)?,
            unit_price: self.optional_f64(row, columns::UNIT_PRICE)?,

            // 描述字段
            line: row.get(columns::LINE).map(str::to_string),
            component: row.get(columns::COMPONENT).map(str::to_string),
        })
    }
}

impl EquipmentFieldMapper {
    fn required_f64(&self, row: &ParsedRow, field: &str) -> ImportResult<f64> {
        self.optional_f64(row, field)?
            .ok_or_else(|| ImportError::MissingValue {
                row: row.row_number,
                field: field.to_string(),
            })
    }

    fn optional_f64(&self, row: &ParsedRow, field: &str) -> ImportResult<Option<f64>> {
        match row.get(field) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|e| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: field.to_string(),
                    message: format!("无法解析为数值 '{}': {}", raw, e),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> ParsedRow {
        ParsedRow {
            row_number: 2,
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_check_columns_lists_every_missing_column() {
        let headers = vec!["equipment_id".to_string(), "line".to_string()];
        let err = EquipmentFieldMapper.check_columns(&headers).unwrap_err();
        assert_eq!(
            err.missing_columns(),
            &["cost".to_string(), "failure_probability".to_string()]
        );
    }

    #[test]
    fn test_map_row_with_optional_fields() {
        let record = EquipmentFieldMapper
            .map_row(&row(&[
                ("equipment_id", "EQ-9"),
                ("cost", "250.5"),
                ("failure_probability", "0.35"),
                ("labor_hours", "6"),
                ("line", "L1"),
                ("risk_impact", ""),
            ]))
            .unwrap();

        assert_eq!(record.equipment_id, "EQ-9");
        assert_eq!(record.cost, 250.5);
        assert_eq!(record.labor_hours, Some(6.0));
        assert_eq!(record.risk_impact, None);
        assert_eq!(record.line.as_deref(), Some("L1"));
    }

    #[test]
    fn test_empty_required_cell_names_row_and_field() {
        let err = EquipmentFieldMapper
            .map_row(&row(&[
                ("equipment_id", "EQ-1"),
                ("cost", ""),
                ("failure_probability", "0.2"),
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingValue { row: 2, ref field } if field == "cost"));
    }

    #[test]
    fn test_non_numeric_value_is_conversion_error() {
        let err = EquipmentFieldMapper
            .map_row(&row(&[
                ("equipment_id", "EQ-1"),
                ("cost", "abc"),
                ("failure_probability", "0.2"),
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { .. }));
    }
}
