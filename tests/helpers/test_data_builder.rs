// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use maintenance_planner::domain::capacity::{DayBucket, LaborCalendar};
use maintenance_planner::domain::equipment::EquipmentRecord;
use std::io::Write;
use tempfile::NamedTempFile;

// ==========================================
// EquipmentRecord 构建器
// ==========================================

pub struct EquipmentBuilder {
    record: EquipmentRecord,
}

impl EquipmentBuilder {
    pub fn new(equipment_id: &str) -> Self {
        Self {
            record: EquipmentRecord::new(equipment_id, 100.0, 0.5),
        }
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.record.cost = cost;
        self
    }

    pub fn probability(mut self, p: f64) -> Self {
        self.record.failure_probability = p;
        self
    }

    pub fn impact(mut self, impact: f64) -> Self {
        self.record.risk_impact = Some(impact);
        self
    }

    pub fn labor(mut self, hours: f64) -> Self {
        self.record.labor_hours = Some(hours);
        self
    }

    pub fn utilization(mut self, pct: f64) -> Self {
        self.record.utilization_pct = Some(pct);
        self
    }

    pub fn downtime(mut self, hours: f64) -> Self {
        self.record.downtime_hours = Some(hours);
        self
    }

    /// 小时产量 + 单价
    pub fn revenue(mut self, production_per_hour: f64, unit_price: f64) -> Self {
        self.record.production_per_hour = Some(production_per_hour);
        self.record.unit_price = Some(unit_price);
        self
    }

    pub fn line(mut self, line: &str) -> Self {
        self.record.line = Some(line.to_string());
        self
    }

    pub fn build(self) -> EquipmentRecord {
        self.record
    }
}

/// 排程字段齐全的设备
pub fn schedulable(id: &str, cost: f64, p: f64, labor: f64, utilization: f64) -> EquipmentRecord {
    EquipmentBuilder::new(id)
        .cost(cost)
        .probability(p)
        .labor(labor)
        .utilization(utilization)
        .revenue(10.0, 5.0)
        .build()
}

/// 自定义日历
pub fn calendar(days: &[(&str, f64)]) -> LaborCalendar {
    LaborCalendar::new(
        days.iter()
            .map(|(label, hours)| DayBucket::new(*label, *hours))
            .collect(),
    )
}

/// 写入带 .csv 后缀的临时文件
pub fn csv_fixture(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    for line in lines {
        writeln!(file, "{}", line).expect("write temp csv");
    }
    file
}
