// ==========================================
// 设备维护排程系统 - 可选日准入规则
// ==========================================
// 红线: 高利用率设备只能排在中间日（首日与末日之外）
// ==========================================
// 输入: utilization_pct + 有序日桶
// 输出: 可选日下标（保持日历顺序）+ 判定原因
// ==========================================

use crate::domain::capacity::DayCapacity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayEligibility {
    high_utilization_threshold: f64,
}

impl DayEligibility {
    pub fn new(high_utilization_threshold: f64) -> Self {
        Self {
            high_utilization_threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.high_utilization_threshold
    }

    /// utilization_pct >= 阈值 视为高利用率
    pub fn is_high_utilization(&self, utilization_pct: f64) -> bool {
        utilization_pct >= self.high_utilization_threshold
    }

    /// 计算可选日
    ///
    /// 规则:
    /// 1) 低利用率: 全部日
    /// 2) 高利用率: 去掉首日与末日（四日日历即第 2、3 日）
    ///    对 N 日日历推广为第 2..N-1 日, 如五日日历可选第 2、3、4 日
    ///    日历不足 3 天时没有中间日, 返回空
    ///
    /// # 返回
    /// (可选日下标, 原因)
    pub fn eligible_days(&self, utilization_pct: f64, days: &[DayCapacity]) -> (Vec<usize>, String) {
        if !self.is_high_utilization(utilization_pct) {
            return (
                (0..days.len()).collect(),
                format!(
                    "利用率 {:.2} < {:.2}, 全部 {} 日可选",
                    utilization_pct,
                    self.high_utilization_threshold,
                    days.len()
                ),
            );
        }

        if days.len() < 3 {
            return (
                Vec::new(),
                format!(
                    "利用率 {:.2} >= {:.2}, 日历仅 {} 日, 无中间日可选",
                    utilization_pct,
                    self.high_utilization_threshold,
                    days.len()
                ),
            );
        }

        let middle: Vec<usize> = (1..days.len() - 1).collect();
        let labels: Vec<&str> = middle.iter().map(|&i| days[i].label.as_str()).collect();
        (
            middle,
            format!(
                "利用率 {:.2} >= {:.2}, 仅中间日可选: {}",
                utilization_pct,
                self.high_utilization_threshold,
                labels.join(",")
            ),
        )
    }
}

impl Default for DayEligibility {
    fn default() -> Self {
        Self::new(crate::config::planner_config::DEFAULT_HIGH_UTILIZATION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capacity::LaborCalendar;

    #[test]
    fn test_low_utilization_all_days() {
        let days = LaborCalendar::standard([20.0, 25.0, 15.0, 10.0]).working_copy();
        let (eligible, _) = DayEligibility::default().eligible_days(0.69, &days);
        assert_eq!(eligible, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_threshold_is_inclusive_for_high_utilization() {
        let days = LaborCalendar::standard([20.0, 25.0, 15.0, 10.0]).working_copy();
        let (eligible, reason) = DayEligibility::default().eligible_days(0.7, &days);
        assert_eq!(eligible, vec![1, 2]);
        assert!(reason.contains("DAY+2,DAY+3"));
    }

    #[test]
    fn test_short_calendar_has_no_middle_days() {
        let days = LaborCalendar::new(vec![
            crate::domain::capacity::DayBucket::new("D1", 8.0),
            crate::domain::capacity::DayBucket::new("D2", 8.0),
        ])
        .working_copy();
        let (eligible, _) = DayEligibility::default().eligible_days(0.9, &days);
        assert!(eligible.is_empty());
    }

    // 测试：五日日历去掉首末两日
    #[test]
    fn test_longer_calendar_excludes_first_and_last() {
        let days = LaborCalendar::new(
            ["D1", "D2", "D3", "D4", "D5"]
                .into_iter()
                .map(|label| crate::domain::capacity::DayBucket::new(label, 8.0))
                .collect(),
        )
        .working_copy();
        let (eligible, reason) = DayEligibility::default().eligible_days(0.8, &days);
        assert_eq!(eligible, vec![1, 2, 3]);
        assert!(reason.contains("D2,D3,D4"));
    }
}
