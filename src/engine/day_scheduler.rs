// ==========================================
// 设备维护排程系统 - 日工时排程引擎
// ==========================================
// 红线: 日工时约束优先; 容不下的设备记为 Unassigned, 不丢弃
// ==========================================
// 职责: 将维护设备按 maintenance_order 逐台落位到日桶
// 输入: 维护设备列表 + 有序日历（只读）
// 输出: 逐台排程明细 + 汇总（剩余工时 / 收入损失 / 费用）
// ==========================================
// 单遍、不回溯; 调用方日历不被修改, 引擎只在工作副本上扣减
// ==========================================

use crate::config::{validate_calendar, ScheduleConfig, SchedulingDefaults};
use crate::domain::capacity::{CapacityConstraint, DayCapacity, LaborCalendar};
use crate::domain::equipment::{columns, PlannedEquipment};
use crate::domain::types::{ScheduledDay, SolveStatus};
use crate::engine::eligibility::DayEligibility;
use crate::engine::strategy::PackingStrategy;
use crate::engine::validator::{check_non_negative, check_unit_interval};
use crate::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

// ==========================================
// 排程输出
// ==========================================

/// 单台设备排程明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub equipment_id: String,
    pub maintenance_order: u32,
    pub line: Option<String>,
    pub component: Option<String>,
    pub cost: f64,
    pub optimized_risk: f64,

    // ===== 排程输入（已解析, 含缺省值） =====
    pub labor_hours: f64,
    pub utilization_pct: f64,
    pub downtime_hours: f64,
    pub production_per_hour: f64,
    pub unit_price: f64,
    pub synthetic_fields: Vec<String>, // 取自配置缺省值的字段

    // ===== 排程结果 =====
    pub eligible_days: Vec<String>,
    pub scheduled_day: ScheduledDay,
    pub expected_revenue_loss: f64, // 无论是否落位都计算
    pub reason: String,
}

/// 单日剩余工时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLaborRemaining {
    pub day: String,
    pub capacity_hours: f64,
    pub remaining_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_revenue_loss: f64,
    pub total_maintenance_cost: f64,
    pub total_optimized_risk: Option<f64>, // 由求解结果带入; 空输入时为 None
    pub solution_status: Option<SolveStatus>,
    pub labor_remaining_per_day: Vec<DayLaborRemaining>, // 保持日历顺序
    pub maintenance_count: usize,
    pub assigned_count: usize,
    pub unassigned_count: usize,
    pub packing_strategy: PackingStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub summary: ScheduleSummary,
    pub entries: Vec<ScheduleEntry>, // 按 maintenance_order 升序
}

impl ScheduleResult {
    pub fn entry(&self, equipment_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.equipment_id == equipment_id)
    }

    pub fn remaining_hours(&self, day: &str) -> Option<f64> {
        self.summary
            .labor_remaining_per_day
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.remaining_hours)
    }

    /// 将排程结果回写到设备表（按 equipment_id 匹配）
    pub fn annotate(&self, units: &mut [PlannedEquipment]) {
        let by_id: HashMap<&str, &ScheduleEntry> = self
            .entries
            .iter()
            .map(|e| (e.equipment_id.as_str(), e))
            .collect();
        for unit in units.iter_mut() {
            if let Some(entry) = by_id.get(unit.equipment_id()) {
                unit.scheduled_day = Some(entry.scheduled_day.clone());
                unit.expected_revenue_loss = Some(entry.expected_revenue_loss);
            }
        }
    }
}

// ==========================================
// 解析后的排程输入
// ==========================================
struct ResolvedInputs {
    labor_hours: f64,
    utilization_pct: f64,
    downtime_hours: f64,
    production_per_hour: f64,
    unit_price: f64,
    synthetic_fields: Vec<String>,
}

// ==========================================
// DayAssignmentScheduler - 日工时排程引擎
// ==========================================
pub struct DayAssignmentScheduler {
    eligibility: DayEligibility,
    strategy: PackingStrategy,
    defaults: SchedulingDefaults,
}

impl DayAssignmentScheduler {
    pub fn new(
        eligibility: DayEligibility,
        strategy: PackingStrategy,
        defaults: SchedulingDefaults,
    ) -> Self {
        Self {
            eligibility,
            strategy,
            defaults,
        }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(
            DayEligibility::new(config.high_utilization_threshold),
            config.packing_strategy,
            config.defaults.clone(),
        )
    }

    pub fn strategy(&self) -> PackingStrategy {
        self.strategy
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 排程
    ///
    /// 规则:
    /// 1) 仅处理 maintain=1 的设备, 按 maintenance_order 升序
    /// 2) 可选日由利用率决定（见 DayEligibility）
    /// 3) 按策略在可选日中找剩余工时 >= labor_hours 的日, 找不到记 Unassigned
    /// 4) 收入损失 = downtime_hours * production_per_hour * unit_price, 不论是否落位
    ///
    /// # 参数
    /// - `units`: 求解结果（可含未维护设备, 会被忽略）
    /// - `calendar`: 有序日历（只读）
    ///
    /// # 返回
    /// - Ok(ScheduleResult)
    /// - Err: 日历非法, 排程字段缺失且无缺省值, 或字段取值越界
    #[instrument(skip(self, units, calendar), fields(
        units = units.len(),
        days = calendar.len(),
        strategy = %self.strategy
    ))]
    pub fn schedule(
        &self,
        units: &[PlannedEquipment],
        calendar: &LaborCalendar,
    ) -> PlannerResult<ScheduleResult> {
        validate_calendar(calendar)?;

        let mut maintained: Vec<&PlannedEquipment> = units
            .iter()
            .filter(|u| u.maintain && u.maintenance_order.is_some())
            .collect();
        maintained.sort_by_key(|u| u.maintenance_order);

        // 1. 先整体解析输入, 任一缺失即失败, 不产出部分排程
        let resolved: Vec<ResolvedInputs> = maintained
            .iter()
            .map(|u| self.resolve_inputs(u))
            .collect::<PlannerResult<_>>()?;

        // 2. 逐台落位
        let mut days = calendar.working_copy();
        let mut entries = Vec::with_capacity(maintained.len());

        for (unit, inputs) in maintained.iter().zip(resolved) {
            let (eligible, eligibility_reason) =
                self.eligibility.eligible_days(inputs.utilization_pct, &days);

            let scheduled_day = match self.pick_day(&days, &eligible, inputs.labor_hours) {
                Some(idx) => {
                    days[idx].consume(inputs.labor_hours);
                    debug!(
                        equipment_id = %unit.equipment_id(),
                        day = %days[idx].label,
                        labor_hours = inputs.labor_hours,
                        remaining = days[idx].remaining(),
                        "设备落位"
                    );
                    ScheduledDay::Day(days[idx].label.clone())
                }
                None => {
                    warn!(
                        equipment_id = %unit.equipment_id(),
                        labor_hours = inputs.labor_hours,
                        "可选日工时不足, 记为 Unassigned"
                    );
                    ScheduledDay::Unassigned
                }
            };

            let reason = match &scheduled_day {
                ScheduledDay::Day(label) => format!("{}; 落位 {}", eligibility_reason, label),
                ScheduledDay::Unassigned => format!("{}; 可选日工时均不足", eligibility_reason),
            };

            entries.push(ScheduleEntry {
                equipment_id: unit.equipment_id().to_string(),
                maintenance_order: unit.maintenance_order.unwrap_or_default(),
                line: unit.record.line.clone(),
                component: unit.record.component.clone(),
                cost: unit.record.cost,
                optimized_risk: unit.optimized_risk,
                labor_hours: inputs.labor_hours,
                utilization_pct: inputs.utilization_pct,
                downtime_hours: inputs.downtime_hours,
                production_per_hour: inputs.production_per_hour,
                unit_price: inputs.unit_price,
                synthetic_fields: inputs.synthetic_fields,
                eligible_days: eligible.iter().map(|&i| days[i].label.clone()).collect(),
                scheduled_day,
                expected_revenue_loss: inputs.downtime_hours
                    * inputs.production_per_hour
                    * inputs.unit_price,
                reason,
            });
        }

        // 3. 汇总
        let summary = self.summarize(units, &entries, &days);
        info!(
            maintained = summary.maintenance_count,
            assigned = summary.assigned_count,
            unassigned = summary.unassigned_count,
            total_revenue_loss = summary.total_revenue_loss,
            "日工时排程完成"
        );

        Ok(ScheduleResult { summary, entries })
    }

    /// 按策略选日
    fn pick_day(&self, days: &[DayCapacity], eligible: &[usize], labor_hours: f64) -> Option<usize> {
        let mut fitting = eligible.iter().copied().filter(|&i| days[i].can_fit(labor_hours));
        match self.strategy {
            PackingStrategy::GreedyInOrder => fitting.next(),
            // min_by 在并列时返回首个, 即日历顺序靠前者
            PackingStrategy::TightestFit => {
                fitting.min_by(|&a, &b| days[a].remaining().total_cmp(&days[b].remaining()))
            }
        }
    }

    /// 解析排程字段: 输入值优先, 其次配置缺省值, 都没有则报错
    fn resolve_inputs(&self, unit: &PlannedEquipment) -> PlannerResult<ResolvedInputs> {
        let record = &unit.record;
        let id = record.equipment_id.as_str();
        let mut synthetic_fields = Vec::new();

        let labor_hours = record
            .labor_hours
            .ok_or_else(|| PlannerError::missing_field(id, columns::LABOR_HOURS))?;

        let utilization_pct = resolve_field(
            id,
            columns::UTILIZATION_PCT,
            record.utilization_pct,
            self.defaults.utilization_pct,
            &mut synthetic_fields,
        )?;

        let downtime_hours = resolve_field(
            id,
            columns::DOWNTIME_HOURS,
            record.downtime_hours,
            self.defaults.downtime_labor_factor.map(|f| labor_hours * f),
            &mut synthetic_fields,
        )?;

        let production_per_hour = resolve_field(
            id,
            columns::PRODUCTION_PER_HOUR,
            record.production_per_hour,
            self.defaults.production_per_hour,
            &mut synthetic_fields,
        )?;

        let unit_price = resolve_field(
            id,
            columns::UNIT_PRICE,
            record.unit_price,
            self.defaults.unit_price,
            &mut synthetic_fields,
        )?;

        // 复核取值范围: 负工时会使日桶剩余增加
        check_non_negative(id, columns::LABOR_HOURS, labor_hours)?;
        check_unit_interval(id, columns::UTILIZATION_PCT, utilization_pct)?;
        check_non_negative(id, columns::DOWNTIME_HOURS, downtime_hours)?;
        check_non_negative(id, columns::PRODUCTION_PER_HOUR, production_per_hour)?;
        check_non_negative(id, columns::UNIT_PRICE, unit_price)?;

        Ok(ResolvedInputs {
            labor_hours,
            utilization_pct,
            downtime_hours,
            production_per_hour,
            unit_price,
            synthetic_fields,
        })
    }

    fn summarize(
        &self,
        units: &[PlannedEquipment],
        entries: &[ScheduleEntry],
        days: &[DayCapacity],
    ) -> ScheduleSummary {
        let assigned_count = entries.iter().filter(|e| e.scheduled_day.is_assigned()).count();
        let carried = units.first();

        ScheduleSummary {
            total_revenue_loss: entries.iter().map(|e| e.expected_revenue_loss).sum(),
            total_maintenance_cost: entries.iter().map(|e| e.cost).sum(),
            total_optimized_risk: carried.map(|u| u.total_optimized_risk),
            solution_status: carried.map(|u| u.solution_status),
            labor_remaining_per_day: days
                .iter()
                .map(|d| DayLaborRemaining {
                    day: d.label.clone(),
                    capacity_hours: d.capacity_hours,
                    remaining_hours: d.remaining(),
                })
                .collect(),
            maintenance_count: entries.len(),
            assigned_count,
            unassigned_count: entries.len() - assigned_count,
            packing_strategy: self.strategy,
        }
    }
}

impl Default for DayAssignmentScheduler {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

fn resolve_field(
    equipment_id: &str,
    field: &str,
    provided: Option<f64>,
    fallback: Option<f64>,
    synthetic_fields: &mut Vec<String>,
) -> PlannerResult<f64> {
    match (provided, fallback) {
        (Some(value), _) => Ok(value),
        (None, Some(value)) => {
            synthetic_fields.push(field.to_string());
            Ok(value)
        }
        (None, None) => Err(PlannerError::missing_field(equipment_id, field)),
    }
}
