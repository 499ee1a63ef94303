// ==========================================
// 设备维护排程系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、约束接口
// 红线: 不含求解逻辑, 不含文件读取
// ==========================================

pub mod capacity;
pub mod equipment;
pub mod types;

// 重导出核心类型
pub use capacity::{CapacityConstraint, DayBucket, DayCapacity, LaborCalendar, STANDARD_DAY_LABELS};
pub use equipment::{columns, EquipmentRecord, PlannedEquipment, DEFAULT_RISK_IMPACT};
pub use types::{Decision, ScheduledDay, SolveStatus, UNASSIGNED};
