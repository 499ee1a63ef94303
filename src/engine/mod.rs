// ==========================================
// 设备维护排程系统 - 引擎层
// ==========================================
// 职责: 统计分析 / 维护决策求解 / 日工时排程 / 流程编排
// 红线: 引擎无状态, 每次运行是输入的纯函数
// ==========================================

pub mod analysis;
pub mod cancellation;
pub mod day_scheduler;
pub mod eligibility;
pub mod optimizer;
pub mod orchestrator;
pub mod solver;
pub mod strategy;
pub mod validator;

// 重导出核心引擎
pub use analysis::{AnalysisEngine, AnalysisSummary, HIGH_RISK_PROBABILITY};
pub use cancellation::CancellationToken;
pub use day_scheduler::{
    DayAssignmentScheduler, DayLaborRemaining, ScheduleEntry, ScheduleResult, ScheduleSummary,
};
pub use eligibility::DayEligibility;
pub use optimizer::{DecisionSet, RiskBudgetOptimizer};
pub use orchestrator::{MaintenanceOrchestrator, PlanReport};
pub use solver::{BinarySelectionSolver, SelectionItem, SelectionProblem, SolveOutcome, SolveStats};
pub use strategy::PackingStrategy;
pub use validator::RecordValidator;
