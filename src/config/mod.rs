// ==========================================
// 设备维护排程系统 - 配置层
// ==========================================
// 职责: 运行配置定义、JSON 加载、取值校验
// ==========================================

pub mod planner_config;

// 重导出核心配置
pub use planner_config::{
    config_keys, validate_calendar, OptimizerConfig, PlannerConfig, ScheduleConfig,
    SchedulingDefaults, SOLVER_TIMEOUT_ENV,
};
