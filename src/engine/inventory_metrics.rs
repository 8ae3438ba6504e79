// ==========================================
// 智能库存预警分析系统 - 库存关键指标引擎
// ==========================================
// 职责: 风险标注批次 → 核心指标总览 / 批次明细筛选排序
// 红线: 空输入返回全零指标，不做除零
// ==========================================

use crate::domain::batch::{BatchFilter, RiskAssessedBatch};
use crate::domain::metrics::{InventoryMetrics, RiskTierStat};
use crate::domain::types::RiskTier;
use std::cmp::Ordering;

pub struct InventoryMetricsEngine;

impl InventoryMetricsEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算关键指标
    pub fn compute(&self, batches: &[RiskAssessedBatch]) -> InventoryMetrics {
        let total_batches = batches.len();
        let total_inventory_value: f64 = batches.iter().map(|b| b.batch_value).sum();
        let total_expected_loss: f64 = batches.iter().map(|b| b.expected_loss).sum();

        let high_risk: Vec<&RiskAssessedBatch> = batches
            .iter()
            .filter(|b| b.risk_tier.is_high_risk())
            .collect();
        let high_risk_batches = high_risk.len();
        let high_risk_value: f64 = high_risk.iter().map(|b| b.batch_value).sum();

        let high_risk_ratio_pct = ratio_pct(high_risk_batches as f64, total_batches as f64);
        let high_risk_value_ratio_pct = ratio_pct(high_risk_value, total_inventory_value);

        let avg_age_days = if total_batches > 0 {
            batches.iter().map(|b| b.batch.age_days as f64).sum::<f64>() / total_batches as f64
        } else {
            0.0
        };
        let turnover_rate = if avg_age_days > 0.0 {
            365.0 / avg_age_days
        } else {
            0.0
        };

        let tier_stats = RiskTier::BY_SEVERITY_DESC
            .iter()
            .map(|tier| {
                let in_tier = batches.iter().filter(|b| b.risk_tier == *tier);
                let (batch_count, total_value, expected_loss) = in_tier
                    .fold((0usize, 0.0f64, 0.0f64), |(n, v, l), b| {
                        (n + 1, v + b.batch_value, l + b.expected_loss)
                    });
                RiskTierStat {
                    risk_tier: *tier,
                    batch_count,
                    total_value,
                    expected_loss,
                }
            })
            .collect();

        InventoryMetrics {
            total_batches,
            high_risk_batches,
            high_risk_ratio_pct,
            total_inventory_value,
            high_risk_value,
            high_risk_value_ratio_pct,
            avg_age_days,
            health_score: if total_batches > 0 {
                100.0 - high_risk_ratio_pct
            } else {
                0.0
            },
            turnover_rate,
            total_expected_loss,
            tier_stats,
        }
    }

    /// 批次明细：按条件筛选，严重程度降序、库龄降序
    pub fn filter_and_sort(
        &self,
        batches: &[RiskAssessedBatch],
        filter: &BatchFilter,
    ) -> Vec<RiskAssessedBatch> {
        let mut rows: Vec<RiskAssessedBatch> = batches
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        rows.sort_by(compare_by_severity);
        rows
    }

    /// 高风险批次（极高 + 高），按预期损失降序
    pub fn high_risk_batches(&self, batches: &[RiskAssessedBatch]) -> Vec<RiskAssessedBatch> {
        let mut rows: Vec<RiskAssessedBatch> = batches
            .iter()
            .filter(|b| b.risk_tier.is_high_risk())
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.expected_loss
                .partial_cmp(&a.expected_loss)
                .unwrap_or(Ordering::Equal)
                .then_with(|| compare_by_severity(a, b))
        });
        rows
    }
}

impl Default for InventoryMetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn ratio_pct(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

fn compare_by_severity(a: &RiskAssessedBatch, b: &RiskAssessedBatch) -> Ordering {
    b.risk_tier
        .cmp(&a.risk_tier)
        .then_with(|| b.batch.age_days.cmp(&a.batch.age_days))
        .then_with(|| a.batch.source_row.cmp(&b.batch.source_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::{BatchRecord, RiskAssessment};
    use chrono::NaiveDate;

    fn assessed(age_days: i64, tier: RiskTier, value: f64, loss: f64) -> RiskAssessedBatch {
        RiskAssessedBatch::new(
            BatchRecord {
                product_code: "F001".to_string(),
                product_name: "产品".to_string(),
                production_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                batch_number: String::new(),
                quantity: value,
                unit_price: 1.0,
                age_days,
                source_row: age_days as usize,
            },
            RiskAssessment {
                risk_tier: tier,
                advice: String::new(),
                expected_loss: loss,
            },
        )
    }

    #[test]
    fn test_empty_metrics_are_zero() {
        let metrics = InventoryMetricsEngine::new().compute(&[]);
        assert_eq!(metrics.total_batches, 0);
        assert_eq!(metrics.high_risk_ratio_pct, 0.0);
        assert_eq!(metrics.avg_age_days, 0.0);
        assert_eq!(metrics.turnover_rate, 0.0);
        assert_eq!(metrics.tier_stats.len(), 5);
    }

    #[test]
    fn test_metrics_values() {
        let batches = vec![
            assessed(10, RiskTier::Minimal, 50.0, 0.0),
            assessed(70, RiskTier::Medium, 50.0, 5.0),
            assessed(100, RiskTier::High, 100.0, 20.0),
            assessed(185, RiskTier::Extreme, 200.0, 60.0),
        ];
        let metrics = InventoryMetricsEngine::new().compute(&batches);

        assert_eq!(metrics.high_risk_batches, 2);
        assert_eq!(metrics.high_risk_ratio_pct, 50.0);
        assert_eq!(metrics.health_score, 50.0);
        assert_eq!(metrics.total_inventory_value, 400.0);
        assert_eq!(metrics.high_risk_value_ratio_pct, 75.0);
        assert_eq!(metrics.avg_age_days, 91.25);
        assert_eq!(metrics.total_expected_loss, 85.0);
        assert_eq!(metrics.count_of(RiskTier::Medium), 1);
        assert_eq!(metrics.count_of(RiskTier::Low), 0);
    }

    #[test]
    fn test_filter_and_sort_by_severity_then_age() {
        let batches = vec![
            assessed(35, RiskTier::Low, 10.0, 0.0),
            assessed(125, RiskTier::Extreme, 10.0, 3.0),
            assessed(150, RiskTier::Extreme, 10.0, 3.0),
            assessed(95, RiskTier::High, 500.0, 100.0),
        ];
        let engine = InventoryMetricsEngine::new();

        let all = engine.filter_and_sort(&batches, &BatchFilter::default());
        let ages: Vec<i64> = all.iter().map(|b| b.batch.age_days).collect();
        assert_eq!(ages, vec![150, 125, 95, 35]);

        let filtered = engine.filter_and_sort(
            &batches,
            &BatchFilter {
                min_value: Some(100.0),
                ..BatchFilter::default()
            },
        );
        assert_eq!(filtered.len(), 1);

        let high = engine.high_risk_batches(&batches);
        assert_eq!(high[0].batch.age_days, 95);
    }
}
