// ==========================================
// 设备维护排程系统 - 领域类型定义
// ==========================================
// 维护决策 / 求解状态 / 排程日 三类枚举
// 序列化格式与输出表字段保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 排程失败哨兵值（无可用日）
pub const UNASSIGNED: &str = "Unassigned";

// ==========================================
// 维护决策 (Decision)
// ==========================================
// 与 maintain 0/1 一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Maintain, // 维护
    Skip,     // 跳过
}

impl Decision {
    /// 由二值决策变量构造
    pub fn from_flag(maintain: bool) -> Self {
        if maintain {
            Decision::Maintain
        } else {
            Decision::Skip
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Maintain => write!(f, "Maintain"),
            Decision::Skip => write!(f, "Skip"),
        }
    }
}

// ==========================================
// 求解状态 (Solve Status)
// ==========================================
// 红线: 非 Optimal 不是错误,必须随结果一起返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,    // 已证明最优
    Infeasible, // 无可行解
    Unbounded,  // 无界
    NotSolved,  // 未完成（超时）
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
            SolveStatus::NotSolved => write!(f, "NotSolved"),
        }
    }
}

// ==========================================
// 排程日 (Scheduled Day)
// ==========================================
// 序列化为纯字符串: 日标签 或 "Unassigned"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ScheduledDay {
    Day(String), // 已落位的日标签
    Unassigned,  // 所有可选日产能不足
}

impl ScheduledDay {
    pub fn is_assigned(&self) -> bool {
        matches!(self, ScheduledDay::Day(_))
    }

    /// 已落位时返回日标签
    pub fn label(&self) -> Option<&str> {
        match self {
            ScheduledDay::Day(label) => Some(label.as_str()),
            ScheduledDay::Unassigned => None,
        }
    }
}

impl fmt::Display for ScheduledDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduledDay::Day(label) => write!(f, "{}", label),
            ScheduledDay::Unassigned => write!(f, "{}", UNASSIGNED),
        }
    }
}

impl From<ScheduledDay> for String {
    fn from(day: ScheduledDay) -> Self {
        day.to_string()
    }
}

impl From<String> for ScheduledDay {
    fn from(s: String) -> Self {
        if s == UNASSIGNED {
            ScheduledDay::Unassigned
        } else {
            ScheduledDay::Day(s)
        }
    }
}
