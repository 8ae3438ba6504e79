// ==========================================
// 智能库存预警分析系统 - 库龄风险分级引擎
// ==========================================
// 职责: 库龄 → 风险等级 + 处理建议 + 预期损失
// 规则: 阈值为含下限，从最严重等级开始判定
//   >=120 极高 (损失 30%) / >=90 高 (20%) / >=60 中 (10%) / >=30 低 / 其余 极低
// 红线: 全函数，无错误分支；库龄基于整次分析统一的参考日期
// ==========================================

use crate::config::RiskThresholds;
use crate::domain::batch::{BatchRecord, RiskAssessedBatch, RiskAssessment};
use crate::domain::types::RiskTier;

// ==========================================
// AgingRiskClassifier
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AgingRiskClassifier {
    thresholds: RiskThresholds,
}

impl AgingRiskClassifier {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// 库龄 → 风险等级
    pub fn tier_for_age(&self, age_days: i64) -> RiskTier {
        let t = &self.thresholds;
        if age_days >= t.extreme_days {
            RiskTier::Extreme
        } else if age_days >= t.high_days {
            RiskTier::High
        } else if age_days >= t.medium_days {
            RiskTier::Medium
        } else if age_days >= t.low_days {
            RiskTier::Low
        } else {
            RiskTier::Minimal
        }
    }

    /// 风险等级对应的预期损失率
    pub fn loss_rate(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::Extreme => self.thresholds.loss_rate_extreme,
            RiskTier::High => self.thresholds.loss_rate_high,
            RiskTier::Medium => self.thresholds.loss_rate_medium,
            RiskTier::Low | RiskTier::Minimal => 0.0,
        }
    }

    /// 单批次分级
    ///
    /// # 返回
    /// (风险等级, 处理建议, 预期损失 = 数量 × 单价 × 损失率)
    pub fn classify(&self, age_days: i64, quantity: f64, unit_price: f64) -> RiskAssessment {
        let risk_tier = self.tier_for_age(age_days);
        RiskAssessment {
            risk_tier,
            advice: risk_tier.advice(),
            expected_loss: quantity * unit_price * self.loss_rate(risk_tier),
        }
    }

    /// 批量分级（保持输入顺序）
    pub fn assess_batches(&self, batches: Vec<BatchRecord>) -> Vec<RiskAssessedBatch> {
        let assessed: Vec<RiskAssessedBatch> = batches
            .into_iter()
            .map(|batch| {
                let assessment = self.classify(batch.age_days, batch.quantity, batch.unit_price);
                RiskAssessedBatch::new(batch, assessment)
            })
            .collect();

        tracing::debug!(
            batches = assessed.len(),
            high_risk = assessed.iter().filter(|b| b.risk_tier.is_high_risk()).count(),
            "库龄风险分级完成"
        );
        assessed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let classifier = AgingRiskClassifier::default();
        assert_eq!(classifier.tier_for_age(0), RiskTier::Minimal);
        assert_eq!(classifier.tier_for_age(29), RiskTier::Minimal);
        assert_eq!(classifier.tier_for_age(30), RiskTier::Low);
        assert_eq!(classifier.tier_for_age(59), RiskTier::Low);
        assert_eq!(classifier.tier_for_age(60), RiskTier::Medium);
        assert_eq!(classifier.tier_for_age(90), RiskTier::High);
        assert_eq!(classifier.tier_for_age(119), RiskTier::High);
        assert_eq!(classifier.tier_for_age(120), RiskTier::Extreme);
        assert_eq!(classifier.tier_for_age(10_000), RiskTier::Extreme);
    }

    #[test]
    fn test_expected_loss_by_tier() {
        let classifier = AgingRiskClassifier::default();
        assert_eq!(classifier.classify(130, 5.0, 10.0).expected_loss, 15.0);
        assert_eq!(classifier.classify(95, 5.0, 10.0).expected_loss, 10.0);
        assert_eq!(classifier.classify(65, 5.0, 10.0).expected_loss, 5.0);
        assert_eq!(classifier.classify(45, 5.0, 10.0).expected_loss, 0.0);
        assert_eq!(classifier.classify(1, 5.0, 10.0).expected_loss, 0.0);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = AgingRiskClassifier::new(RiskThresholds {
            extreme_days: 60,
            high_days: 45,
            medium_days: 30,
            low_days: 15,
            ..RiskThresholds::default()
        });
        assert_eq!(classifier.tier_for_age(61), RiskTier::Extreme);
        assert_eq!(classifier.tier_for_age(20), RiskTier::Low);
    }
}
