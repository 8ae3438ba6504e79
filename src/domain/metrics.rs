// ==========================================
// 智能库存预警分析系统 - 库存关键指标
// ==========================================

use crate::domain::types::RiskTier;
use serde::{Deserialize, Serialize};

/// 单个风险等级的分布统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTierStat {
    pub risk_tier: RiskTier,
    pub batch_count: usize,
    pub total_value: f64,
    pub expected_loss: f64,
}

/// 库存关键指标（核心指标总览）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMetrics {
    /// 总批次数
    pub total_batches: usize,

    /// 高风险批次数（极高 + 高）
    pub high_risk_batches: usize,

    /// 高风险批次占比（%）
    pub high_risk_ratio_pct: f64,

    /// 库存总价值
    pub total_inventory_value: f64,

    /// 高风险批次价值
    pub high_risk_value: f64,

    /// 高风险价值占比（%）
    pub high_risk_value_ratio_pct: f64,

    /// 平均库龄（天）
    pub avg_age_days: f64,

    /// 库存健康度 = 100 - 高风险批次占比
    pub health_score: f64,

    /// 年周转次数 = 365 / 平均库龄
    pub turnover_rate: f64,

    /// 预期损失合计
    pub total_expected_loss: f64,

    /// 各风险等级分布（严重程度降序）
    pub tier_stats: Vec<RiskTierStat>,
}

impl InventoryMetrics {
    /// 指定等级的批次数
    pub fn count_of(&self, tier: RiskTier) -> usize {
        self.tier_stats
            .iter()
            .find(|s| s.risk_tier == tier)
            .map(|s| s.batch_count)
            .unwrap_or(0)
    }
}
