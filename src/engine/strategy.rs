// ==========================================
// 设备维护排程系统 - 装箱策略定义
// ==========================================
// 用途：
// - greedy_in_order: 默认策略, 按可选日配置顺序取第一个容得下的日
// - tightest_fit: 备选策略, 取剩余工时最少且容得下的日（减少碎片）
// 两种策略都是单遍、不回溯、每台设备最多落位一次

use serde::{Deserialize, Serialize};

/// 日桶装箱策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingStrategy {
    GreedyInOrder,
    TightestFit,
}

impl PackingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackingStrategy::GreedyInOrder => "greedy_in_order",
            PackingStrategy::TightestFit => "tightest_fit",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            PackingStrategy::GreedyInOrder => "顺序贪心",
            PackingStrategy::TightestFit => "最紧适配",
        }
    }
}

impl Default for PackingStrategy {
    fn default() -> Self {
        PackingStrategy::GreedyInOrder
    }
}

impl std::fmt::Display for PackingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy_in_order" | "greedy-in-order" | "greedy" => Ok(PackingStrategy::GreedyInOrder),
            "tightest_fit" | "tightest-fit" => Ok(PackingStrategy::TightestFit),
            other => Err(format!("未知装箱策略: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("greedy".parse::<PackingStrategy>(), Ok(PackingStrategy::GreedyInOrder));
        assert_eq!(
            "Tightest-Fit".parse::<PackingStrategy>(),
            Ok(PackingStrategy::TightestFit)
        );
        assert!("best".parse::<PackingStrategy>().is_err());
    }

    #[test]
    fn test_default_is_greedy() {
        assert_eq!(PackingStrategy::default(), PackingStrategy::GreedyInOrder);
        assert_eq!(PackingStrategy::default().to_string(), "greedy_in_order");
    }
}
