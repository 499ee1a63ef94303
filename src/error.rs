// ==========================================
// 设备维护排程系统 - 统一错误类型
// ==========================================
// 分类:
// - 配置错误: 致命, 立即返回, 无部分结果
// - 运行取消: 整次运行粒度, 不产出排程
// 求解异常 (非 Optimal) 与排程缺口 (Unassigned) 属于数据, 不在此处
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

/// 核心错误类型
#[derive(Error, Debug)]
pub enum PlannerError {
    // ==========================================
    // 配置错误 (ConfigurationError)
    // ==========================================
    #[error("设备清单为空: 无法对 0 台设备求解")]
    EmptyInput,

    #[error("设备编号重复: {0}")]
    DuplicateEquipmentId(String),

    #[error("字段取值非法 (equipment_id={equipment_id}, 字段 {field}): 值 {value} {rule}")]
    InvalidField {
        equipment_id: String,
        field: String,
        value: f64,
        rule: String,
    },

    #[error("缺少必需字段 (equipment_id={equipment_id}): {field}")]
    MissingField { equipment_id: String, field: String },

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidConfig { key: String, message: String },

    #[error("配置文件读取失败 ({path}): {message}")]
    ConfigFile { path: String, message: String },

    #[error(transparent)]
    Import(#[from] ImportError),

    // ==========================================
    // 运行控制
    // ==========================================
    #[error("运行已取消 (阶段: {stage})")]
    Cancelled { stage: String },

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlannerError {
    pub(crate) fn invalid_config(key: &str, message: impl Into<String>) -> Self {
        PlannerError::InvalidConfig {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_field(
        equipment_id: &str,
        field: &str,
        value: f64,
        rule: impl Into<String>,
    ) -> Self {
        PlannerError::InvalidField {
            equipment_id: equipment_id.to_string(),
            field: field.to_string(),
            value,
            rule: rule.into(),
        }
    }

    pub(crate) fn missing_field(equipment_id: &str, field: &str) -> Self {
        PlannerError::MissingField {
            equipment_id: equipment_id.to_string(),
            field: field.to_string(),
        }
    }

    /// 是否属于配置/校验类错误（不可自动重试）
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, PlannerError::Cancelled { .. } | PlannerError::Other(_))
    }
}

/// Result 类型别名
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_names_the_field() {
        let err = PlannerError::missing_field("EQ-7", "labor_hours");
        assert!(err.to_string().contains("labor_hours"));
        assert!(err.to_string().contains("EQ-7"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_cancelled_is_not_configuration_error() {
        let err = PlannerError::Cancelled {
            stage: "optimize".to_string(),
        };
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_import_error_converts() {
        let err: PlannerError = ImportError::MissingColumns {
            columns: vec!["cost".to_string()],
        }
        .into();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("cost"));
    }
}
