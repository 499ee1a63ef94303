// ==========================================
// 设备维护排程系统 - 风险预算优化引擎
// ==========================================
// 职责: 在预算（及可选总工时）约束下选择维护设备, 使总期望风险最小
// 输入: 设备清单 + OptimizerConfig
// 输出: DecisionSet (逐台决策 + 维护顺序 + 求解状态)
// ==========================================
// 目标: min Σ p_i·impact_i·(1 - x_i) + alpha·p_i·impact_i·x_i
// 等价: max Σ (1 - alpha)·p_i·impact_i·x_i  (常数项 Σ p_i·impact_i 移出)
// 红线: 整数解; 非 Optimal 状态随结果返回, 不是错误
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::equipment::{EquipmentRecord, PlannedEquipment};
use crate::domain::types::{Decision, SolveStatus};
use crate::engine::cancellation::CancellationToken;
use crate::engine::solver::{BinarySelectionSolver, SelectionItem, SelectionProblem, SolveStats};
use crate::engine::validator::RecordValidator;
use crate::error::PlannerResult;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// ==========================================
// DecisionSet - 一次求解的完整结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSet {
    pub solution_status: SolveStatus,
    pub total_optimized_risk: f64,   // 目标函数值 Σ optimized_risk
    pub total_unoptimized_risk: f64, // Σ p·impact
    pub risk_reduction: f64,         // 两者之差
    pub total_cost: f64,             // 维护设备费用合计
    pub total_labor_hours: f64,      // 维护设备工时合计（缺失按 0 计）
    pub maintenance_count: usize,
    pub solve_stats: SolveStats,
    pub units: Vec<PlannedEquipment>, // 保持输入顺序
}

impl DecisionSet {
    /// 维护设备, 按 maintenance_order 升序
    pub fn maintained_in_order(&self) -> Vec<PlannedEquipment> {
        let mut maintained: Vec<PlannedEquipment> =
            self.units.iter().filter(|u| u.maintain).cloned().collect();
        maintained.sort_by_key(|u| u.maintenance_order);
        maintained
    }

    pub fn get(&self, equipment_id: &str) -> Option<&PlannedEquipment> {
        self.units.iter().find(|u| u.equipment_id() == equipment_id)
    }
}

// ==========================================
// RiskBudgetOptimizer - 风险预算优化引擎
// ==========================================
pub struct RiskBudgetOptimizer {
    // 无状态引擎
}

impl RiskBudgetOptimizer {
    pub fn new() -> Self {
        Self {}
    }

    /// 求解维护决策
    ///
    /// # 参数
    /// - `records`: 设备清单（非空, equipment_id 唯一）
    /// - `config`: 预算 / alpha / 工时约束 / 求解时限
    ///
    /// # 返回
    /// - Ok(DecisionSet): 任意求解状态
    /// - Err: 配置或输入校验失败
    pub fn optimize(
        &self,
        records: &[EquipmentRecord],
        config: &OptimizerConfig,
    ) -> PlannerResult<DecisionSet> {
        self.optimize_with_cancel(records, config, None)
    }

    /// 求解维护决策（支持取消）
    #[instrument(skip(self, records, config, cancel), fields(
        units = records.len(),
        budget = config.budget,
        alpha = config.alpha
    ))]
    pub fn optimize_with_cancel(
        &self,
        records: &[EquipmentRecord],
        config: &OptimizerConfig,
        cancel: Option<&CancellationToken>,
    ) -> PlannerResult<DecisionSet> {
        config.validate()?;
        let labor_limit = config.labor_limit()?;
        RecordValidator::new(labor_limit.is_some()).validate(records)?;

        // 1. 构建 0/1 模型
        let problem = SelectionProblem {
            items: records
                .iter()
                .map(|r| SelectionItem {
                    value: r.risk_if_skipped() - r.risk_if_maintained(config.alpha),
                    cost: r.cost,
                    labor: r.labor_hours.unwrap_or(0.0),
                })
                .collect(),
            budget: config.budget,
            labor_limit,
        };

        // 2. 求解
        let outcome = BinarySelectionSolver::new(config.solver_time_limit())
            .solve(&problem, cancel)?;

        if !outcome.status.is_optimal() {
            warn!(status = %outcome.status, "求解未得到已证明最优解, 结果按状态标记返回");
        }

        // 3. 派生字段
        let decision_set = self.derive_decisions(
            records,
            config.alpha,
            &outcome.selected,
            outcome.status,
            outcome.stats,
        );

        info!(
            status = %decision_set.solution_status,
            maintained = decision_set.maintenance_count,
            total_cost = decision_set.total_cost,
            total_optimized_risk = decision_set.total_optimized_risk,
            nodes = decision_set.solve_stats.nodes_explored,
            "维护决策求解完成"
        );

        Ok(decision_set)
    }

    /// 由 0/1 选择派生逐台字段
    ///
    /// 规则:
    /// 1) optimized_risk = 维护 ? alpha·p·impact : p·impact
    /// 2) 维护设备按 optimized_risk 升序稳定排序, 分配 1..k
    /// 3) total_optimized_risk 广播到每一行
    fn derive_decisions(
        &self,
        records: &[EquipmentRecord],
        alpha: f64,
        selected: &[bool],
        status: SolveStatus,
        stats: SolveStats,
    ) -> DecisionSet {
        let optimized: Vec<f64> = records
            .iter()
            .zip(selected)
            .map(|(r, &maintain)| {
                if maintain {
                    r.risk_if_maintained(alpha)
                } else {
                    r.risk_if_skipped()
                }
            })
            .collect();
        let total_optimized_risk: f64 = optimized.iter().sum();
        let total_unoptimized_risk: f64 = records.iter().map(|r| r.risk_if_skipped()).sum();

        // 维护顺序（sort_by 为稳定排序, 同值保持输入顺序）
        let mut maintained_idx: Vec<usize> = (0..records.len()).filter(|&i| selected[i]).collect();
        maintained_idx.sort_by(|&a, &b| optimized[a].total_cmp(&optimized[b]));
        let mut orders: Vec<Option<u32>> = vec![None; records.len()];
        for (rank, &idx) in maintained_idx.iter().enumerate() {
            orders[idx] = Some(rank as u32 + 1);
        }

        let mut total_cost = 0.0;
        let mut total_labor_hours = 0.0;
        let units: Vec<PlannedEquipment> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let maintain = selected[i];
                if maintain {
                    total_cost += record.cost;
                    total_labor_hours += record.labor_hours.unwrap_or(0.0);
                }
                PlannedEquipment {
                    record: record.clone(),
                    maintain,
                    decision: Decision::from_flag(maintain),
                    optimized_risk: optimized[i],
                    maintenance_order: orders[i],
                    solution_status: status,
                    total_optimized_risk,
                    scheduled_day: None,
                    expected_revenue_loss: None,
                }
            })
            .collect();

        DecisionSet {
            solution_status: status,
            total_optimized_risk,
            total_unoptimized_risk,
            risk_reduction: total_unoptimized_risk - total_optimized_risk,
            total_cost,
            total_labor_hours,
            maintenance_count: maintained_idx.len(),
            solve_stats: stats,
            units,
        }
    }
}

impl Default for RiskBudgetOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    fn record(id: &str, cost: f64, p: f64) -> EquipmentRecord {
        EquipmentRecord::new(id, cost, p)
    }

    // 测试：预算 600 时只能维护 B, 总风险 0.9
    #[test]
    fn test_budget_selects_cheaper_unit() {
        let records = vec![record("A", 1000.0, 0.9), record("B", 500.0, 0.3)];
        let config = OptimizerConfig::new(600.0, 0.0);

        let set = RiskBudgetOptimizer::new().optimize(&records, &config).unwrap();

        assert_eq!(set.solution_status, SolveStatus::Optimal);
        let a = set.get("A").unwrap();
        let b = set.get("B").unwrap();
        assert!(!a.maintain);
        assert_eq!(a.decision, Decision::Skip);
        assert_eq!(a.maintenance_order, None);
        assert!(b.maintain);
        assert_eq!(b.maintenance_order, Some(1));
        assert!((set.total_optimized_risk - 0.9).abs() < 1e-12);
        assert!(set.units.iter().all(|u| u.total_optimized_risk == set.total_optimized_risk));
        assert_eq!(set.total_cost, 500.0);
    }

    // 测试：维护顺序按 optimized_risk 升序, 同值保持输入顺序
    #[test]
    fn test_order_is_stable_by_optimized_risk() {
        let mut records = vec![
            record("X", 1.0, 0.8),
            record("Y", 1.0, 0.4),
            record("Z", 1.0, 0.8),
        ];
        for r in records.iter_mut() {
            r.risk_impact = Some(1.0);
        }
        let config = OptimizerConfig::new(100.0, 0.5);

        let set = RiskBudgetOptimizer::new().optimize(&records, &config).unwrap();
        let maintained = set.maintained_in_order();
        let order: Vec<&str> = maintained
            .iter()
            .map(|u| u.record.equipment_id.as_str())
            .collect();
        assert_eq!(order, vec!["Y", "X", "Z"]);
    }

    // 测试：alpha = 1 时维护无收益, 不选任何设备
    #[test]
    fn test_alpha_one_selects_nothing() {
        let records = vec![record("A", 1.0, 0.9), record("B", 0.0, 0.5)];
        let set = RiskBudgetOptimizer::new()
            .optimize(&records, &OptimizerConfig::new(100.0, 1.0))
            .unwrap();
        assert_eq!(set.maintenance_count, 0);
        assert!((set.total_optimized_risk - 1.4).abs() < 1e-12);
    }

    // 测试：启用工时约束但缺少 labor_hours
    #[test]
    fn test_labor_constraint_requires_labor_hours() {
        let records = vec![record("A", 1.0, 0.9)];
        let config = OptimizerConfig::new(100.0, 0.0).with_manpower_limit(10.0);
        let err = RiskBudgetOptimizer::new().optimize(&records, &config).unwrap_err();
        assert!(matches!(err, PlannerError::MissingField { ref field, .. } if field == "labor_hours"));
    }

    // 测试：工时约束生效
    #[test]
    fn test_labor_constraint_binds() {
        let mut a = record("A", 1.0, 0.9);
        a.labor_hours = Some(8.0);
        let mut b = record("B", 1.0, 0.5);
        b.labor_hours = Some(4.0);
        let mut c = record("C", 1.0, 0.5);
        c.labor_hours = Some(4.0);
        let config = OptimizerConfig::new(100.0, 0.0).with_manpower_limit(8.0);

        let set = RiskBudgetOptimizer::new().optimize(&[a, b, c], &config).unwrap();
        assert!(!set.get("A").unwrap().maintain);
        assert!(set.get("B").unwrap().maintain);
        assert!(set.get("C").unwrap().maintain);
        assert_eq!(set.total_labor_hours, 8.0);
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = RiskBudgetOptimizer::new()
            .optimize(&[], &OptimizerConfig::new(100.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, PlannerError::EmptyInput));
    }

    #[test]
    fn test_cancelled_token_during_large_solve() {
        let token = CancellationToken::new();
        token.cancel();
        // 偶数费用 + 奇数预算, 搜索无法提前结束
        let records: Vec<EquipmentRecord> = (0..80)
            .map(|i| {
                let w = (2 * (i + 50)) as f64;
                let mut r = record(&format!("EQ-{i}"), w, 1.0);
                r.risk_impact = Some(w);
                r
            })
            .collect();
        let result = RiskBudgetOptimizer::new().optimize_with_cancel(
            &records,
            &OptimizerConfig::new(2001.0, 0.0),
            Some(&token),
        );
        assert!(matches!(result, Err(PlannerError::Cancelled { .. })));
    }
}
