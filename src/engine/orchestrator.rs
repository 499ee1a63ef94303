// ==========================================
// 设备维护排程系统 - 流程编排器
// ==========================================
// 主流程: 本地统计 → 维护决策求解 → 日工时排程 → 汇总报告
// 取消: 整次运行粒度; 求解内部周期检查, 阶段之间检查
// 红线: 取消或配置错误时不产出任何排程
// ==========================================

use crate::config::PlannerConfig;
use crate::domain::equipment::{EquipmentRecord, PlannedEquipment};
use crate::engine::analysis::{AnalysisEngine, AnalysisSummary};
use crate::engine::cancellation::CancellationToken;
use crate::engine::day_scheduler::{DayAssignmentScheduler, ScheduleResult};
use crate::engine::optimizer::{DecisionSet, RiskBudgetOptimizer};
use crate::error::{PlannerError, PlannerResult};
use crate::importer::EquipmentImporter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// PlanReport - 一次运行的完整输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,

    // (a) 本地统计
    pub analysis_summary: AnalysisSummary,

    // (b) 全量设备表（含排程回写字段）
    pub decisions: DecisionSet,

    // (c) 维护设备表, 按 maintenance_order 升序
    pub maintenance_schedule: Vec<PlannedEquipment>,

    // (d) 排程汇总 + 明细
    pub schedule: ScheduleResult,
}

// ==========================================
// MaintenanceOrchestrator - 流程编排器
// ==========================================
pub struct MaintenanceOrchestrator {
    config: PlannerConfig,
    analysis: AnalysisEngine,
    optimizer: RiskBudgetOptimizer,
    scheduler: DayAssignmentScheduler,
}

impl MaintenanceOrchestrator {
    /// 创建编排器; 配置在此一次性校验
    pub fn new(config: PlannerConfig) -> PlannerResult<Self> {
        config.validate()?;
        Ok(Self {
            analysis: AnalysisEngine::new(),
            optimizer: RiskBudgetOptimizer::new(),
            scheduler: DayAssignmentScheduler::from_config(&config.schedule),
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 仅本地统计
    pub fn analyze(&self, records: &[EquipmentRecord]) -> AnalysisSummary {
        self.analysis.analyze(records)
    }

    /// 执行完整流程（不可取消）
    pub fn run(&self, records: &[EquipmentRecord]) -> PlannerResult<PlanReport> {
        self.run_with_cancel(records, &CancellationToken::new())
    }

    /// 从文件导入后执行完整流程
    pub fn run_file<P: AsRef<Path>>(
        &self,
        path: P,
        cancel: &CancellationToken,
    ) -> PlannerResult<PlanReport> {
        let records = EquipmentImporter::new().load(path)?;
        self.run_with_cancel(&records, cancel)
    }

    /// 执行完整流程
    ///
    /// # 返回
    /// - Ok(PlanReport): 任意求解状态（非 Optimal 作为数据返回）
    /// - Err(Cancelled): 运行被取消
    /// - Err(其他): 配置或输入错误
    pub fn run_with_cancel(
        &self,
        records: &[EquipmentRecord],
        cancel: &CancellationToken,
    ) -> PlannerResult<PlanReport> {
        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            units = records.len(),
            budget = self.config.optimizer.budget,
            alpha = self.config.optimizer.alpha,
            "开始执行维护排程流程"
        );

        // ==========================================
        // 步骤1: 本地统计
        // ==========================================
        check_cancelled(cancel, "analyze")?;
        let analysis_summary = self.analysis.analyze(records);
        debug!(
            total_equipment = analysis_summary.total_equipment,
            high_risk_count = analysis_summary.high_risk_count,
            "步骤1完成: 本地统计"
        );

        // ==========================================
        // 步骤2: 维护决策求解
        // ==========================================
        check_cancelled(cancel, "optimize")?;
        let mut decisions =
            self.optimizer
                .optimize_with_cancel(records, &self.config.optimizer, Some(cancel))?;
        debug!(
            status = %decisions.solution_status,
            maintained = decisions.maintenance_count,
            "步骤2完成: 维护决策求解"
        );

        // ==========================================
        // 步骤3: 日工时排程
        // ==========================================
        check_cancelled(cancel, "schedule")?;
        let schedule = self
            .scheduler
            .schedule(&decisions.units, &self.config.schedule.calendar())?;
        debug!(
            assigned = schedule.summary.assigned_count,
            unassigned = schedule.summary.unassigned_count,
            "步骤3完成: 日工时排程"
        );

        // ==========================================
        // 步骤4: 汇总报告
        // ==========================================
        check_cancelled(cancel, "report")?;
        schedule.annotate(&mut decisions.units);
        let maintenance_schedule = decisions.maintained_in_order();

        info!(
            run_id = %run_id,
            status = %decisions.solution_status,
            maintained = decisions.maintenance_count,
            total_optimized_risk = decisions.total_optimized_risk,
            total_revenue_loss = schedule.summary.total_revenue_loss,
            "维护排程流程完成"
        );

        Ok(PlanReport {
            run_id,
            generated_at: Utc::now(),
            analysis_summary,
            decisions,
            maintenance_schedule,
            schedule,
        })
    }
}

fn check_cancelled(cancel: &CancellationToken, stage: &str) -> PlannerResult<()> {
    if cancel.is_cancelled() {
        info!(stage, "运行已取消");
        return Err(PlannerError::Cancelled {
            stage: stage.to_string(),
        });
    }
    Ok(())
}
