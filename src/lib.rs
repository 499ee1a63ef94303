// ==========================================
// 设备维护排程系统 - 核心库
// ==========================================
// 流程: 设备清单 → 预算内维护选择 (0/1 整数规划) → 日工时排程
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 求解与排程
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 统一错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Decision, ScheduledDay, SolveStatus, UNASSIGNED};

// 领域实体
pub use domain::{DayBucket, EquipmentRecord, LaborCalendar, PlannedEquipment};

// 引擎
pub use engine::{
    AnalysisEngine, AnalysisSummary, CancellationToken, DayAssignmentScheduler, DecisionSet,
    MaintenanceOrchestrator, PackingStrategy, PlanReport, RiskBudgetOptimizer, ScheduleResult,
};

// 配置
pub use config::{OptimizerConfig, PlannerConfig, ScheduleConfig, SchedulingDefaults};

// 错误
pub use error::{PlannerError, PlannerResult};
pub use importer::{EquipmentImporter, ImportError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备维护排程系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
