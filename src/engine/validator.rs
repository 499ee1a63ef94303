// ==========================================
// 设备维护排程系统 - 设备清单校验
// ==========================================
// 职责: 进入优化器之前的一次性校验
// 红线: 任一行不合法即整体拒绝, 不做静默修正
// ==========================================

use crate::domain::equipment::{columns, EquipmentRecord};
use crate::error::{PlannerError, PlannerResult};
use std::collections::HashSet;

pub struct RecordValidator {
    require_labor_hours: bool, // 启用总工时约束时 labor_hours 必填
}

impl RecordValidator {
    pub fn new(require_labor_hours: bool) -> Self {
        Self {
            require_labor_hours,
        }
    }

    /// 校验整份清单
    ///
    /// 规则:
    /// 1) 清单非空
    /// 2) equipment_id 非空且唯一
    /// 3) failure_probability ∈ [0, 1]
    /// 4) cost >= 0, labor_hours >= 0
    /// 5) risk_impact > 0（若提供）
    /// 6) utilization_pct ∈ [0, 1]（若提供）
    pub fn validate(&self, records: &[EquipmentRecord]) -> PlannerResult<()> {
        if records.is_empty() {
            return Err(PlannerError::EmptyInput);
        }

        let mut seen_ids = HashSet::with_capacity(records.len());
        for record in records {
            let id = record.equipment_id.trim();
            if id.is_empty() {
                return Err(PlannerError::missing_field("<empty>", columns::EQUIPMENT_ID));
            }
            if !seen_ids.insert(id) {
                return Err(PlannerError::DuplicateEquipmentId(id.to_string()));
            }
            self.validate_record(record)?;
        }
        Ok(())
    }

    fn validate_record(&self, record: &EquipmentRecord) -> PlannerResult<()> {
        let id = record.equipment_id.as_str();

        check_unit_interval(id, columns::FAILURE_PROBABILITY, record.failure_probability)?;
        check_non_negative(id, columns::COST, record.cost)?;

        if let Some(impact) = record.risk_impact {
            if !impact.is_finite() || impact <= 0.0 {
                return Err(PlannerError::invalid_field(
                    id,
                    columns::RISK_IMPACT,
                    impact,
                    "必须为正有限数",
                ));
            }
        }

        match record.labor_hours {
            Some(hours) => check_non_negative(id, columns::LABOR_HOURS, hours)?,
            None if self.require_labor_hours => {
                return Err(PlannerError::missing_field(id, columns::LABOR_HOURS));
            }
            None => {}
        }

        if let Some(u) = record.utilization_pct {
            check_unit_interval(id, columns::UTILIZATION_PCT, u)?;
        }

        let optional_non_negative = [
            (columns::DOWNTIME_HOURS, record.downtime_hours),
            (columns::PRODUCTION_PER_HOUR, record.production_per_hour),
            (columns::UNIT_PRICE, record.unit_price),
            (columns::AGE, record.age),
        ];
        for (field, value) in optional_non_negative {
            if let Some(v) = value {
                check_non_negative(id, field, v)?;
            }
        }

        Ok(())
    }
}

pub(crate) fn check_unit_interval(id: &str, field: &str, value: f64) -> PlannerResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(PlannerError::invalid_field(id, field, value, "必须位于 [0, 1]"));
    }
    Ok(())
}

pub(crate) fn check_non_negative(id: &str, field: &str, value: f64) -> PlannerResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlannerError::invalid_field(id, field, value, "必须为非负有限数"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, cost: f64, p: f64) -> EquipmentRecord {
        EquipmentRecord::new(id, cost, p)
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = RecordValidator::new(false).validate(&[]).unwrap_err();
        assert!(matches!(err, PlannerError::EmptyInput));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let records = vec![record("EQ-1", 1.0, 0.1), record("EQ-1", 2.0, 0.2)];
        let err = RecordValidator::new(false).validate(&records).unwrap_err();
        assert!(matches!(err, PlannerError::DuplicateEquipmentId(ref id) if id == "EQ-1"));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let err = RecordValidator::new(false)
            .validate(&[record("EQ-1", 1.0, 1.2)])
            .unwrap_err();
        match err {
            PlannerError::InvalidField { field, .. } => assert_eq!(field, "failure_probability"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_risk_impact_rejected() {
        let mut r = record("EQ-1", 1.0, 0.5);
        r.risk_impact = Some(0.0);
        assert!(RecordValidator::new(false).validate(&[r]).is_err());
    }

    #[test]
    fn test_labor_hours_required_only_when_constrained() {
        let records = vec![record("EQ-1", 1.0, 0.5)];
        assert!(RecordValidator::new(false).validate(&records).is_ok());

        let err = RecordValidator::new(true).validate(&records).unwrap_err();
        assert!(err.to_string().contains("labor_hours"));
    }

    #[test]
    fn test_nan_cost_rejected() {
        assert!(RecordValidator::new(false)
            .validate(&[record("EQ-1", f64::NAN, 0.5)])
            .is_err());
    }
}
