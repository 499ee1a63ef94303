// ==========================================
// 设备维护排程系统 - 运行配置
// ==========================================
// 来源: 调用方传入 或 JSON 配置文件
// 覆写: 环境变量 MAINTENANCE_PLANNER_SOLVER_TIMEOUT_MS
// 红线: 配置不持久化, 每次运行独立构造
// ==========================================

use crate::domain::capacity::{DayBucket, LaborCalendar};
use crate::domain::types::UNASSIGNED;
use crate::engine::strategy::PackingStrategy;
use crate::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub mod config_keys {
    pub const BUDGET: &str = "optimizer.budget";
    pub const ALPHA: &str = "optimizer.alpha";
    pub const MANPOWER_LIMIT: &str = "optimizer.manpower_limit";
    pub const SOLVER_TIME_LIMIT_MS: &str = "optimizer.solver_time_limit_ms";
    pub const DAYS: &str = "schedule.days";
    pub const HIGH_UTILIZATION_THRESHOLD: &str = "schedule.high_utilization_threshold";
    pub const DEFAULTS: &str = "schedule.defaults";
}

/// 求解超时覆写
pub const SOLVER_TIMEOUT_ENV: &str = "MAINTENANCE_PLANNER_SOLVER_TIMEOUT_MS";

pub const DEFAULT_BUDGET: f64 = 7000.0;
pub const DEFAULT_MANPOWER_LIMIT: f64 = 5000.0;
pub const DEFAULT_SOLVER_TIME_LIMIT_MS: u64 = 30_000;
pub const DEFAULT_HIGH_UTILIZATION_THRESHOLD: f64 = 0.7;
pub const DEFAULT_DOWNTIME_LABOR_FACTOR: f64 = 1.5;
pub const DEFAULT_DAY_CAPACITIES: [f64; 4] = [20.0, 25.0, 15.0, 10.0];

// ==========================================
// OptimizerConfig - 优化器配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 维护预算（费用上限）
    pub budget: f64,

    /// 维护后残余风险比例 (0 = 完全消除, 1 = 无收益)
    pub alpha: f64,

    /// 是否启用总工时约束
    pub include_manpower_constraint: bool,

    /// 总工时上限（启用约束时必填）
    pub manpower_limit: Option<f64>,

    /// 求解时限（毫秒），超时状态为 NotSolved
    pub solver_time_limit_ms: u64,
}

impl OptimizerConfig {
    /// 仅预算约束
    pub fn new(budget: f64, alpha: f64) -> Self {
        Self {
            budget,
            alpha,
            include_manpower_constraint: false,
            manpower_limit: None,
            solver_time_limit_ms: DEFAULT_SOLVER_TIME_LIMIT_MS,
        }
    }

    /// 启用总工时约束
    pub fn with_manpower_limit(mut self, limit: f64) -> Self {
        self.include_manpower_constraint = true;
        self.manpower_limit = Some(limit);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.solver_time_limit_ms = ms;
        self
    }

    pub fn solver_time_limit(&self) -> Duration {
        Duration::from_millis(self.solver_time_limit_ms)
    }

    /// 生效的工时上限
    ///
    /// # 返回
    /// - Ok(None): 未启用约束
    /// - Ok(Some(limit)): 启用约束
    /// - Err: 启用约束但未给出上限
    pub fn labor_limit(&self) -> PlannerResult<Option<f64>> {
        if !self.include_manpower_constraint {
            return Ok(None);
        }
        match self.manpower_limit {
            Some(limit) => Ok(Some(limit)),
            None => Err(PlannerError::invalid_config(
                config_keys::MANPOWER_LIMIT,
                "include_manpower_constraint=true 时必须提供 manpower_limit",
            )),
        }
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(PlannerError::invalid_config(
                config_keys::BUDGET,
                format!("预算必须为非负有限数, 实际 {}", self.budget),
            ));
        }
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(PlannerError::invalid_config(
                config_keys::ALPHA,
                format!("alpha 必须位于 [0, 1], 实际 {}", self.alpha),
            ));
        }
        if let Some(limit) = self.labor_limit()? {
            if !limit.is_finite() || limit < 0.0 {
                return Err(PlannerError::invalid_config(
                    config_keys::MANPOWER_LIMIT,
                    format!("工时上限必须为非负有限数, 实际 {}", limit),
                ));
            }
        }
        if self.solver_time_limit_ms == 0 {
            return Err(PlannerError::invalid_config(
                config_keys::SOLVER_TIME_LIMIT_MS,
                "求解时限必须大于 0",
            ));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    /// 与原始样例运行一致: 预算 7000, alpha 0, 工时上限 5000
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET, 0.0).with_manpower_limit(DEFAULT_MANPOWER_LIMIT)
    }
}

// ==========================================
// SchedulingDefaults - 排程字段显式缺省值
// ==========================================
// 红线: 不做随机填充; 未配置缺省值的缺失字段直接报错
// 使用了缺省值的字段会在排程明细中标记为 synthetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingDefaults {
    /// 利用率缺省值
    pub utilization_pct: Option<f64>,

    /// 停机时长 = labor_hours * 系数
    pub downtime_labor_factor: Option<f64>,

    /// 小时产量缺省值
    pub production_per_hour: Option<f64>,

    /// 单价缺省值
    pub unit_price: Option<f64>,
}

impl Default for SchedulingDefaults {
    fn default() -> Self {
        Self {
            utilization_pct: None,
            downtime_labor_factor: Some(DEFAULT_DOWNTIME_LABOR_FACTOR),
            production_per_hour: None,
            unit_price: None,
        }
    }
}

impl SchedulingDefaults {
    /// 不提供任何缺省值（全部字段必须来自输入）
    pub fn strict() -> Self {
        Self {
            utilization_pct: None,
            downtime_labor_factor: None,
            production_per_hour: None,
            unit_price: None,
        }
    }

    fn validate(&self) -> PlannerResult<()> {
        if let Some(u) = self.utilization_pct {
            if !u.is_finite() || !(0.0..=1.0).contains(&u) {
                return Err(PlannerError::invalid_config(
                    config_keys::DEFAULTS,
                    format!("utilization_pct 缺省值必须位于 [0, 1], 实际 {}", u),
                ));
            }
        }
        let non_negative = [
            ("downtime_labor_factor", self.downtime_labor_factor),
            ("production_per_hour", self.production_per_hour),
            ("unit_price", self.unit_price),
        ];
        for (name, value) in non_negative {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(PlannerError::invalid_config(
                        config_keys::DEFAULTS,
                        format!("{} 缺省值必须为非负有限数, 实际 {}", name, v),
                    ));
                }
            }
        }
        Ok(())
    }
}

// ==========================================
// ScheduleConfig - 排程配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 有序日桶（顺序即扫描顺序）
    pub days: Vec<DayBucket>,

    /// 高利用率阈值: utilization_pct >= 阈值 时仅可排中间日
    pub high_utilization_threshold: f64,

    /// 装箱策略
    pub packing_strategy: PackingStrategy,

    pub defaults: SchedulingDefaults,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            days: LaborCalendar::standard(DEFAULT_DAY_CAPACITIES).days,
            high_utilization_threshold: DEFAULT_HIGH_UTILIZATION_THRESHOLD,
            packing_strategy: PackingStrategy::default(),
            defaults: SchedulingDefaults::default(),
        }
    }
}

impl ScheduleConfig {
    pub fn calendar(&self) -> LaborCalendar {
        LaborCalendar::new(self.days.clone())
    }

    pub fn validate(&self) -> PlannerResult<()> {
        validate_calendar(&self.calendar())?;

        let t = self.high_utilization_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(PlannerError::invalid_config(
                config_keys::HIGH_UTILIZATION_THRESHOLD,
                format!("阈值必须位于 [0, 1], 实际 {}", t),
            ));
        }

        self.defaults.validate()
    }
}

/// 日历校验: 非空, 标签唯一且非哨兵值, 工时非负
pub fn validate_calendar(calendar: &LaborCalendar) -> PlannerResult<()> {
    if calendar.is_empty() {
        return Err(PlannerError::invalid_config(
            config_keys::DAYS,
            "至少需要一个排程日",
        ));
    }

    let mut seen = HashSet::new();
    for day in &calendar.days {
        let label = day.label.trim();
        if label.is_empty() {
            return Err(PlannerError::invalid_config(config_keys::DAYS, "日标签不能为空"));
        }
        if label == UNASSIGNED {
            return Err(PlannerError::invalid_config(
                config_keys::DAYS,
                format!("日标签不能使用保留值 {}", UNASSIGNED),
            ));
        }
        if !seen.insert(label.to_string()) {
            return Err(PlannerError::invalid_config(
                config_keys::DAYS,
                format!("日标签重复: {}", label),
            ));
        }
        if !day.capacity_hours.is_finite() || day.capacity_hours < 0.0 {
            return Err(PlannerError::invalid_config(
                config_keys::DAYS,
                format!("{} 的工时必须为非负有限数, 实际 {}", label, day.capacity_hours),
            ));
        }
    }
    Ok(())
}

// ==========================================
// PlannerConfig - 完整运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub optimizer: OptimizerConfig,
    pub schedule: ScheduleConfig,
}

impl PlannerConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）并应用环境变量覆写
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| PlannerError::ConfigFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut config = Self::from_json_str(&raw).map_err(|e| match e {
            PlannerError::ConfigFile { message, .. } => PlannerError::ConfigFile {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> PlannerResult<Self> {
        serde_json::from_str(raw).map_err(|e| PlannerError::ConfigFile {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// 环境变量覆写（目前仅求解时限）
    pub fn apply_env_overrides(&mut self) -> PlannerResult<()> {
        if let Ok(raw) = std::env::var(SOLVER_TIMEOUT_ENV) {
            let ms = raw.trim().parse::<u64>().map_err(|_| {
                PlannerError::invalid_config(
                    config_keys::SOLVER_TIME_LIMIT_MS,
                    format!("{} 无法解析为毫秒数: {}", SOLVER_TIMEOUT_ENV, raw),
                )
            })?;
            self.optimizer.solver_time_limit_ms = ms;
        }
        Ok(())
    }

    pub fn validate(&self) -> PlannerResult<()> {
        self.optimizer.validate()?;
        self.schedule.validate()
    }
}
