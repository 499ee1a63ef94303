// ==========================================
// 设备维护排程系统 - 日工时产能领域模型
// ==========================================
// 日桶 (day bucket): 固定顺序的未来排程日, 各自带工时上限
// 红线: 单次排程过程中剩余工时只减不增
// ==========================================

use serde::{Deserialize, Serialize};

/// 原始样例使用的四个排程日
pub const STANDARD_DAY_LABELS: [&str; 4] = ["DAY+1", "DAY+2", "DAY+3", "DAY+4"];

// ==========================================
// DayBucket - 日桶配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub label: String,       // 日标签 (如 DAY+1)
    pub capacity_hours: f64, // 当日可用工时
}

impl DayBucket {
    pub fn new(label: impl Into<String>, capacity_hours: f64) -> Self {
        Self {
            label: label.into(),
            capacity_hours,
        }
    }
}

// ==========================================
// LaborCalendar - 有序日桶集合
// ==========================================
// 调用方持有, 排程引擎只读; 工作副本见 DayCapacity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LaborCalendar {
    pub days: Vec<DayBucket>,
}

impl LaborCalendar {
    pub fn new(days: Vec<DayBucket>) -> Self {
        Self { days }
    }

    /// 按 DAY+1..DAY+4 构造
    pub fn standard(capacities: [f64; 4]) -> Self {
        let days = STANDARD_DAY_LABELS
            .iter()
            .zip(capacities)
            .map(|(label, hours)| DayBucket::new(*label, hours))
            .collect();
        Self { days }
    }

    pub fn labels(&self) -> Vec<String> {
        self.days.iter().map(|d| d.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn capacity_of(&self, label: &str) -> Option<f64> {
        self.days
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.capacity_hours)
    }

    /// 生成排程工作副本（调用方的日历不被修改）
    pub fn working_copy(&self) -> Vec<DayCapacity> {
        self.days
            .iter()
            .map(|d| DayCapacity {
                label: d.label.clone(),
                capacity_hours: d.capacity_hours,
                remaining_hours: d.capacity_hours,
            })
            .collect()
    }
}

// ==========================================
// DayCapacity - 单日工时池（排程工作副本）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCapacity {
    pub label: String,
    pub capacity_hours: f64,  // 初始工时
    pub remaining_hours: f64, // 剩余工时
}

impl DayCapacity {
    /// 扣减工时, 调用前须 can_fit 为真
    pub fn consume(&mut self, labor_hours: f64) {
        self.remaining_hours -= labor_hours;
    }
}

// ==========================================
// Trait: CapacityConstraint
// ==========================================
// 用途: 排程引擎的工时约束检查接口
pub trait CapacityConstraint {
    /// 剩余工时是否足以容纳
    fn can_fit(&self, labor_hours: f64) -> bool;

    /// 已用工时
    fn used_hours(&self) -> f64;

    /// 剩余工时
    fn remaining(&self) -> f64;

    /// 使用率 (0.0 - 1.0)
    fn usage_ratio(&self) -> f64;
}

impl CapacityConstraint for DayCapacity {
    /// # 返回
    /// - `true`: remaining_hours >= labor_hours
    fn can_fit(&self, labor_hours: f64) -> bool {
        self.remaining_hours >= labor_hours
    }

    fn used_hours(&self) -> f64 {
        self.capacity_hours - self.remaining_hours
    }

    fn remaining(&self) -> f64 {
        self.remaining_hours
    }

    fn usage_ratio(&self) -> f64 {
        if self.capacity_hours <= 0.0 {
            return 0.0;
        }
        (self.used_hours() / self.capacity_hours).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_calendar_labels_in_order() {
        let calendar = LaborCalendar::standard([20.0, 25.0, 15.0, 10.0]);
        assert_eq!(calendar.labels(), vec!["DAY+1", "DAY+2", "DAY+3", "DAY+4"]);
        assert_eq!(calendar.capacity_of("DAY+3"), Some(15.0));
        assert_eq!(calendar.capacity_of("DAY+9"), None);
    }

    #[test]
    fn test_working_copy_is_detached() {
        let calendar = LaborCalendar::standard([20.0, 5.0, 15.0, 20.0]);
        let mut copy = calendar.working_copy();
        copy[2].consume(12.0);

        assert_eq!(copy[2].remaining(), 3.0);
        assert_eq!(calendar.capacity_of("DAY+3"), Some(15.0));
    }

    #[test]
    fn test_capacity_constraint_boundaries() {
        let mut day = DayCapacity {
            label: "DAY+1".to_string(),
            capacity_hours: 10.0,
            remaining_hours: 10.0,
        };
        assert!(day.can_fit(10.0)); // 恰好装满
        assert!(!day.can_fit(10.5));

        day.consume(4.0);
        assert_eq!(day.used_hours(), 4.0);
        assert!((day.usage_ratio() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_usage_ratio_zero_capacity() {
        let day = DayCapacity {
            label: "DAY+1".to_string(),
            capacity_hours: 0.0,
            remaining_hours: 0.0,
        };
        assert_eq!(day.usage_ratio(), 0.0);
        assert!(day.can_fit(0.0));
    }
}
