// ==========================================
// 设备维护排程系统 - 本地统计分析
// ==========================================
// 职责: 优化前的描述性统计（纯聚合, 无副作用）
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 高风险判定阈值（严格大于）
pub const HIGH_RISK_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_equipment: usize,
    pub avg_failure_probability: f64,
    pub high_risk_count: usize,      // failure_probability > 0.7
    pub total_unoptimized_risk: f64, // Σ p·impact
}

pub struct AnalysisEngine {
    // 无状态引擎
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总设备清单; 空清单返回全 0
    pub fn analyze(&self, records: &[EquipmentRecord]) -> AnalysisSummary {
        let total_equipment = records.len();
        let avg_failure_probability = if total_equipment == 0 {
            0.0
        } else {
            records.iter().map(|r| r.failure_probability).sum::<f64>() / total_equipment as f64
        };
        let high_risk_count = records
            .iter()
            .filter(|r| r.failure_probability > HIGH_RISK_PROBABILITY)
            .count();
        let total_unoptimized_risk = records.iter().map(|r| r.risk_if_skipped()).sum();

        debug!(
            total_equipment,
            high_risk_count,
            total_unoptimized_risk,
            "本地统计完成"
        );

        AnalysisSummary {
            total_equipment,
            avg_failure_probability,
            high_risk_count,
            total_unoptimized_risk,
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut heavy = EquipmentRecord::new("EQ-1", 10.0, 0.8);
        heavy.risk_impact = Some(2.0);
        let records = vec![
            heavy,
            EquipmentRecord::new("EQ-2", 10.0, 0.7), // 恰好 0.7 不计入高风险
            EquipmentRecord::new("EQ-3", 10.0, 0.3),
        ];

        let summary = AnalysisEngine::new().analyze(&records);
        assert_eq!(summary.total_equipment, 3);
        assert_eq!(summary.high_risk_count, 1);
        assert!((summary.avg_failure_probability - 0.6).abs() < 1e-12);
        assert!((summary.total_unoptimized_risk - 2.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        let summary = AnalysisEngine::new().analyze(&[]);
        assert_eq!(summary.total_equipment, 0);
        assert_eq!(summary.avg_failure_probability, 0.0);
        assert_eq!(summary.total_unoptimized_risk, 0.0);
    }
}
