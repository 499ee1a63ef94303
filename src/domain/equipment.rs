// ==========================================
// 设备维护排程系统 - 设备领域模型
// ==========================================
// 一行 = 一台待评估设备
// 输入字段由导入层填充, 派生字段仅由引擎填充
// ==========================================

use crate::domain::types::{Decision, ScheduledDay, SolveStatus};
use serde::{Deserialize, Serialize};

/// risk_impact 缺失时的默认值
pub const DEFAULT_RISK_IMPACT: f64 = 1.0;

// ==========================================
// 输入列名（固定契约字符串）
// ==========================================
pub mod columns {
    pub const EQUIPMENT_ID: &str = "equipment_id";
    pub const COST: &str = "cost";
    pub const FAILURE_PROBABILITY: &str = "failure_probability";

    pub const RISK_IMPACT: &str = "risk_impact";
    pub const LABOR_HOURS: &str = "labor_hours";
    pub const LINE: &str = "line";
    pub const COMPONENT: &str = "component";
    pub const AGE: &str = "age";
    pub const UTILIZATION_PCT: &str = "utilization_pct";
    pub const DOWNTIME_HOURS: &str = "downtime_hours";
    pub const PRODUCTION_PER_HOUR: &str = "production_per_hour";
    pub const UNIT_PRICE: &str = "unit_price";

    /// 必需列
    pub const REQUIRED: [&str; 3] = [EQUIPMENT_ID, COST, FAILURE_PROBABILITY];
}

// ==========================================
// EquipmentRecord - 设备记录（输入）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    // ===== 主键 =====
    pub equipment_id: String, // 设备编号（全流程唯一）

    // ===== 风险输入 =====
    pub failure_probability: f64, // 故障概率 [0,1]
    #[serde(default)]
    pub risk_impact: Option<f64>, // 故障后果权重 (缺省 1.0)

    // ===== 成本输入 =====
    pub cost: f64, // 维护费用
    #[serde(default)]
    pub labor_hours: Option<f64>, // 所需工时

    // ===== 描述字段 =====
    #[serde(default)]
    pub line: Option<String>, // 产线
    #[serde(default)]
    pub component: Option<String>, // 部件
    #[serde(default)]
    pub age: Option<f64>, // 役龄

    // ===== 排程输入（可选） =====
    #[serde(default)]
    pub utilization_pct: Option<f64>, // 利用率 [0,1]
    #[serde(default)]
    pub downtime_hours: Option<f64>, // 停机时长
    #[serde(default)]
    pub production_per_hour: Option<f64>, // 小时产量
    #[serde(default)]
    pub unit_price: Option<f64>, // 单价
}

impl EquipmentRecord {
    /// 仅含必需字段的记录
    pub fn new(equipment_id: impl Into<String>, cost: f64, failure_probability: f64) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            failure_probability,
            risk_impact: None,
            cost,
            labor_hours: None,
            line: None,
            component: None,
            age: None,
            utilization_pct: None,
            downtime_hours: None,
            production_per_hour: None,
            unit_price: None,
        }
    }

    pub fn risk_impact_or_default(&self) -> f64 {
        self.risk_impact.unwrap_or(DEFAULT_RISK_IMPACT)
    }

    /// 不维护时的期望风险 = p * impact
    pub fn risk_if_skipped(&self) -> f64 {
        self.failure_probability * self.risk_impact_or_default()
    }

    /// 维护后的残余风险 = alpha * p * impact
    pub fn risk_if_maintained(&self, alpha: f64) -> f64 {
        alpha * self.failure_probability * self.risk_impact_or_default()
    }
}

// ==========================================
// PlannedEquipment - 设备记录 + 派生字段
// ==========================================
// 红线: maintenance_order 仅分配给 maintain=1 的设备
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedEquipment {
    #[serde(flatten)]
    pub record: EquipmentRecord,

    // ===== 优化派生 =====
    #[serde(with = "maintain_flag")]
    pub maintain: bool, // 输出为 0/1
    pub decision: Decision,
    pub optimized_risk: f64,
    pub maintenance_order: Option<u32>,
    pub solution_status: SolveStatus,
    pub total_optimized_risk: f64, // 整次求解的汇总值, 每行相同

    // ===== 排程派生 =====
    #[serde(default)]
    pub scheduled_day: Option<ScheduledDay>,
    #[serde(default)]
    pub expected_revenue_loss: Option<f64>,
}

impl PlannedEquipment {
    pub fn equipment_id(&self) -> &str {
        &self.record.equipment_id
    }
}

/// maintain 以 0/1 整数序列化
mod maintain_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}
