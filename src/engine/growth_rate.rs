// ==========================================
// 智能库存预警分析系统 - 同比增长分析引擎
// ==========================================
// 职责: 产品滚动三个月销量同比 → 趋势分类 → 备货建议
// 规则:
//   窗口 = (m-2, m-1, m)，m ∈ [3, 12]；缺失月份按 0 计
//   仅比较相邻年份 (上年, 本年)，两个窗口合计都 > 0 才产出一行
//   增长率 = (本年 - 上年) / 上年 × 100，截断到配置区间
// 红线: 历史不足两年的产品没有增长行，不得默认为"维持"
// ==========================================

use crate::config::GrowthConfig;
use crate::domain::growth::{GrowthReport, ProductGrowthRow};
use crate::domain::sales::ActualSalesFact;
use crate::domain::types::{StockAction, Trend};
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

/// 产品 → (年, 月) → 销量
type ProductPivot = BTreeMap<String, BTreeMap<(i32, u32), f64>>;

#[derive(Debug, Clone, Default)]
pub struct GrowthRateAnalyzer {
    config: GrowthConfig,
}

impl GrowthRateAnalyzer {
    /// 无效配置（非有限值、区间倒置、除数 <= 0）回落到默认值
    pub fn new(config: GrowthConfig) -> Self {
        if config.is_valid() {
            Self { config }
        } else {
            tracing::warn!(?config, "增长率配置无效，使用默认值");
            Self {
                config: GrowthConfig::default(),
            }
        }
    }

    /// 增长率截断
    pub fn clamp_rate(&self, growth_rate_pct: f64) -> f64 {
        growth_rate_pct
            .max(self.config.min_rate_pct)
            .min(self.config.max_rate_pct)
    }

    /// 两个窗口合计 → 截断后的增长率；任一窗口 <= 0 时不可比
    pub fn growth_rate(&self, current_3m: f64, prior_3m: f64) -> Option<f64> {
        if current_3m > 0.0 && prior_3m > 0.0 {
            Some(self.clamp_rate((current_3m - prior_3m) / prior_3m * 100.0))
        } else {
            None
        }
    }

    /// 趋势 → (备货建议, 调整幅度 %)
    pub fn recommend(&self, trend: Trend, growth_rate_pct: f64) -> (StockAction, i64) {
        match trend {
            Trend::StrongGrowth => (StockAction::IncreaseStock, growth_rate_pct.round() as i64),
            Trend::Growth => (
                StockAction::IncreaseSlightly,
                (growth_rate_pct / 2.0).round() as i64,
            ),
            Trend::SlightDecline => (StockAction::Maintain, 0),
            Trend::SignificantDecline => (
                StockAction::DecreaseStock,
                (growth_rate_pct.abs() / self.config.decline_divisor).round() as i64,
            ),
        }
    }

    /// 计算全部产品的增长行
    ///
    /// # 参数
    /// - actuals: 月度实际销量事实
    /// - regions: 区域子集（None 表示全部区域；只影响进入透视表的行）
    #[instrument(skip_all, fields(facts = actuals.len(), regions = ?regions))]
    pub fn analyze(&self, actuals: &[ActualSalesFact], regions: Option<&[String]>) -> GrowthReport {
        let pivot = build_pivot(actuals, regions);

        let mut report = GrowthReport::default();
        for (product_code, months) in &pivot {
            let rows = self.product_rows(product_code, months);
            match rows.iter().max_by_key(|r| r.period()) {
                Some(latest) => report.latest.push(latest.clone()),
                None => report.insufficient_history.push(product_code.clone()),
            }
            report.rows.extend(rows);
        }

        tracing::info!(
            products = pivot.len(),
            rows = report.rows.len(),
            insufficient = report.insufficient_history.len(),
            "同比增长分析完成"
        );
        report
    }

    fn product_rows(
        &self,
        product_code: &str,
        months: &BTreeMap<(i32, u32), f64>,
    ) -> Vec<ProductGrowthRow> {
        let years: BTreeSet<i32> = months.keys().map(|(y, _)| *y).collect();
        if years.len() < 2 {
            return Vec::new();
        }

        let window_sum = |year: i32, month: u32| -> f64 {
            (month - 2..=month)
                .map(|m| months.get(&(year, m)).copied().unwrap_or(0.0))
                .sum()
        };

        let mut rows = Vec::new();
        for &current_year in years.iter().skip(1) {
            let prior_year = current_year - 1;
            if !years.contains(&prior_year) {
                continue;
            }

            for month in 3..=12u32 {
                let current_3m = window_sum(current_year, month);
                let prior_3m = window_sum(prior_year, month);
                let Some(growth_rate_pct) = self.growth_rate(current_3m, prior_3m) else {
                    continue;
                };

                let trend = Trend::from_growth_rate(growth_rate_pct);
                let (recommendation, adjustment_pct) = self.recommend(trend, growth_rate_pct);
                rows.push(ProductGrowthRow {
                    product_code: product_code.to_string(),
                    year: current_year,
                    month,
                    rolling_3m_actual: current_3m,
                    rolling_3m_prior_year: prior_3m,
                    growth_rate_pct,
                    trend,
                    recommendation,
                    adjustment_pct,
                });
            }
        }
        rows
    }
}

fn build_pivot(actuals: &[ActualSalesFact], regions: Option<&[String]>) -> ProductPivot {
    let mut pivot: ProductPivot = BTreeMap::new();
    for fact in actuals {
        if let Some(regions) = regions {
            if !regions.iter().any(|r| r == &fact.region) {
                continue;
            }
        }
        *pivot
            .entry(fact.product_code.clone())
            .or_default()
            .entry((fact.year_month.year, fact.year_month.month))
            .or_insert(0.0) += fact.quantity;
    }
    pivot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::YearMonth;

    fn fact(product: &str, region: &str, year: i32, month: u32, quantity: f64) -> ActualSalesFact {
        ActualSalesFact {
            year_month: YearMonth::new(year, month).unwrap(),
            region: region.to_string(),
            salesperson: "张三".to_string(),
            product_code: product.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_trend_recommendation_mapping() {
        let analyzer = GrowthRateAnalyzer::default();
        assert_eq!(
            analyzer.recommend(Trend::StrongGrowth, 25.4),
            (StockAction::IncreaseStock, 25)
        );
        assert_eq!(
            analyzer.recommend(Trend::Growth, 7.0),
            (StockAction::IncreaseSlightly, 4)
        );
        assert_eq!(
            analyzer.recommend(Trend::SlightDecline, -5.0),
            (StockAction::Maintain, 0)
        );
        assert_eq!(
            analyzer.recommend(Trend::SignificantDecline, -40.0),
            (StockAction::DecreaseStock, 20)
        );
    }

    #[test]
    fn test_decline_divisor_one() {
        let analyzer = GrowthRateAnalyzer::new(GrowthConfig {
            decline_divisor: 1.0,
            ..GrowthConfig::default()
        });
        assert_eq!(
            analyzer.recommend(Trend::SignificantDecline, -40.0),
            (StockAction::DecreaseStock, 40)
        );
    }

    #[test]
    fn test_invalid_config_falls_back_without_panic() {
        let configs = [
            GrowthConfig {
                min_rate_pct: 600.0,
                max_rate_pct: 500.0,
                decline_divisor: 2.0,
            },
            GrowthConfig {
                min_rate_pct: f64::NAN,
                ..GrowthConfig::default()
            },
            GrowthConfig {
                decline_divisor: f64::NAN,
                ..GrowthConfig::default()
            },
            GrowthConfig {
                decline_divisor: 0.0,
                ..GrowthConfig::default()
            },
        ];
        for config in configs {
            let analyzer = GrowthRateAnalyzer::new(config);
            assert_eq!(analyzer.growth_rate(1000.0, 1.0), Some(500.0));
            assert_eq!(analyzer.growth_rate(1.0, 1000.0).map(|r| r.round()), Some(-100.0));
            assert_eq!(
                analyzer.recommend(Trend::SignificantDecline, -40.0),
                (StockAction::DecreaseStock, 20)
            );
        }
    }

    #[test]
    fn test_missing_months_count_as_zero() {
        let analyzer = GrowthRateAnalyzer::default();
        // 2023 年只有 3 月，2024 年 1~3 月
        let actuals = vec![
            fact("F001", "华东", 2023, 3, 30.0),
            fact("F001", "华东", 2024, 1, 10.0),
            fact("F001", "华东", 2024, 2, 10.0),
            fact("F001", "华东", 2024, 3, 10.0),
        ];
        let report = analyzer.analyze(&actuals, None);
        let march = report
            .rows
            .iter()
            .find(|r| r.year == 2024 && r.month == 3)
            .unwrap();
        assert_eq!(march.rolling_3m_actual, 30.0);
        assert_eq!(march.rolling_3m_prior_year, 30.0);
        assert_eq!(march.growth_rate_pct, 0.0);
        assert_eq!(march.trend, Trend::SlightDecline);
    }

    #[test]
    fn test_region_filter_changes_input_rows() {
        let analyzer = GrowthRateAnalyzer::default();
        let actuals = vec![
            fact("F001", "华东", 2023, 3, 10.0),
            fact("F001", "华东", 2024, 3, 20.0),
            fact("F001", "华南", 2024, 3, 80.0),
        ];

        let all = analyzer.analyze(&actuals, None);
        assert_eq!(all.latest[0].growth_rate_pct, 500.0);

        let east_only = vec!["华东".to_string()];
        let east = analyzer.analyze(&actuals, Some(&east_only));
        assert_eq!(east.latest[0].growth_rate_pct, 100.0);
    }

    #[test]
    fn test_non_consecutive_years_not_compared() {
        let analyzer = GrowthRateAnalyzer::default();
        let actuals = vec![
            fact("F001", "华东", 2022, 3, 10.0),
            fact("F001", "华东", 2024, 3, 20.0),
        ];
        let report = analyzer.analyze(&actuals, None);
        assert!(report.rows.is_empty());
        assert_eq!(report.insufficient_history, vec!["F001".to_string()]);
    }
}
