// ==========================================
// 智能库存预警分析系统 - 预测准确率引擎
// ==========================================
// 职责: 实际出货与人工预测按分组键外连接，计算差异/差异率/准确率
// 规则:
//   差异 = 实际 - 预测
//   差异率: 实际 > 0 → 差异 / 实际 × 100；实际 <= 0 且预测 > 0 → -100；否则 0
//   准确率 = max(0, 100 - |差异率|) / 100，截断到 [0, 1]
// 红线: 两种汇总口径必须各自独立计算，不得互相推导
//   - 汇总后求比率（全国口径）: aggregate_accuracy
//   - 分实体求比率再平均: average_accuracy
// ==========================================

use crate::config::AccuracyTargets;
use crate::domain::accuracy::{
    AccuracyReport, AccuracySummary, EntityAverageAccuracy, GroupBy, GroupKey, MergedAccuracyRow,
};
use crate::domain::sales::{
    ActualSalesFact, ForecastFact, ForecastRecord, ShipmentRecord, YearMonth,
};
use crate::domain::types::AccuracyBand;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::instrument;

type FactKey = (YearMonth, String, String, String);

// ==========================================
// 原始明细 → 月度事实
// ==========================================

/// 出货明细按 (年月, 区域, 销售员, 产品) 汇总
pub fn actual_facts(shipments: &[ShipmentRecord]) -> Vec<ActualSalesFact> {
    let mut sums: BTreeMap<FactKey, f64> = BTreeMap::new();
    for s in shipments {
        let key = (
            YearMonth::from_date(s.order_date),
            s.region.clone(),
            s.salesperson.clone(),
            s.product_code.clone(),
        );
        *sums.entry(key).or_insert(0.0) += s.quantity;
    }

    sums.into_iter()
        .map(
            |((year_month, region, salesperson, product_code), quantity)| ActualSalesFact {
                year_month,
                region,
                salesperson,
                product_code,
                quantity,
            },
        )
        .collect()
}

/// 预测明细按 (年月, 区域, 销售员, 产品) 汇总
pub fn forecast_facts(forecasts: &[ForecastRecord]) -> Vec<ForecastFact> {
    let mut sums: BTreeMap<FactKey, f64> = BTreeMap::new();
    for f in forecasts {
        let key = (
            f.year_month,
            f.region.clone(),
            f.salesperson.clone(),
            f.product_code.clone(),
        );
        *sums.entry(key).or_insert(0.0) += f.forecast_quantity;
    }

    sums.into_iter()
        .map(
            |((year_month, region, salesperson, product_code), forecast_quantity)| ForecastFact {
                year_month,
                region,
                salesperson,
                product_code,
                forecast_quantity,
            },
        )
        .collect()
}

// ==========================================
// 单行指标
// ==========================================

/// 差异率（%）
pub fn difference_rate(actual: f64, forecast: f64) -> f64 {
    if actual > 0.0 {
        (actual - forecast) / actual * 100.0
    } else if forecast > 0.0 {
        -100.0
    } else {
        0.0
    }
}

/// 准确率（0~1）；实际与预测均为 0 时恰为 1.0
pub fn accuracy(actual: f64, forecast: f64) -> f64 {
    if actual == 0.0 && forecast == 0.0 {
        return 1.0;
    }
    clip_unit((100.0 - difference_rate(actual, forecast).abs()).max(0.0) / 100.0)
}

fn clip_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn merged_row(key: GroupKey, actual: f64, forecast: f64) -> MergedAccuracyRow {
    MergedAccuracyRow {
        key,
        actual,
        forecast,
        difference: actual - forecast,
        difference_rate: difference_rate(actual, forecast),
        accuracy: accuracy(actual, forecast),
    }
}

// ==========================================
// ForecastAccuracyEngine
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ForecastAccuracyEngine {
    targets: AccuracyTargets,
}

impl ForecastAccuracyEngine {
    pub fn new(targets: AccuracyTargets) -> Self {
        Self { targets }
    }

    /// 按分组维度分别汇总实际/预测后外连接（缺失侧补 0）
    ///
    /// # 返回
    /// 按分组键升序的合并行；没有任何数据的分组键不会出现
    pub fn merge(
        &self,
        actuals: &[ActualSalesFact],
        forecasts: &[ForecastFact],
        group_by: GroupBy,
    ) -> Vec<MergedAccuracyRow> {
        let mut sums: BTreeMap<GroupKey, (f64, f64)> = BTreeMap::new();

        for a in actuals {
            let key = group_by.key(a.year_month, &a.region, &a.salesperson, &a.product_code);
            sums.entry(key).or_insert((0.0, 0.0)).0 += a.quantity;
        }
        for f in forecasts {
            let key = group_by.key(f.year_month, &f.region, &f.salesperson, &f.product_code);
            sums.entry(key).or_insert((0.0, 0.0)).1 += f.forecast_quantity;
        }

        sums.into_iter()
            .map(|(key, (actual, forecast))| merged_row(key, actual, forecast))
            .collect()
    }

    /// 汇总后求比率：先对全部行求实际/预测总量，再算一次差异率与准确率
    pub fn aggregate_accuracy(
        &self,
        actuals: &[ActualSalesFact],
        forecasts: &[ForecastFact],
    ) -> AccuracySummary {
        let total_actual: f64 = actuals.iter().map(|a| a.quantity).sum();
        let total_forecast: f64 = forecasts.iter().map(|f| f.forecast_quantity).sum();
        self.summarize(total_actual, total_forecast)
    }

    /// 分实体求比率再平均：每个实体先算准确率（截断到 [0,1]），再取算术平均
    pub fn average_accuracy(
        &self,
        actuals: &[ActualSalesFact],
        forecasts: &[ForecastFact],
        group_by: GroupBy,
    ) -> EntityAverageAccuracy {
        let rows = self.merge(actuals, forecasts, group_by);
        EntityAverageAccuracy {
            group_by,
            entity_count: rows.len(),
            mean_accuracy: mean_accuracy(&rows),
        }
    }

    /// 由总量生成汇总结果（含分档与提升空间）
    pub fn summarize(&self, total_actual: f64, total_forecast: f64) -> AccuracySummary {
        let accuracy = accuracy(total_actual, total_forecast);
        let accuracy_pct = accuracy * 100.0;
        AccuracySummary {
            total_actual,
            total_forecast,
            difference: total_actual - total_forecast,
            difference_rate: difference_rate(total_actual, total_forecast),
            accuracy,
            band: AccuracyBand::classify(
                accuracy_pct,
                self.targets.target_pct,
                self.targets.warning_pct,
            ),
            improvement_potential_pct: (self.targets.target_pct - accuracy_pct).max(0.0),
        }
    }

    /// 生成全部准确率视图
    #[instrument(skip_all, fields(actuals = actuals.len(), forecasts = forecasts.len()))]
    pub fn report(&self, actuals: &[ActualSalesFact], forecasts: &[ForecastFact]) -> AccuracyReport {
        let mut top_products = self.merge(actuals, forecasts, GroupBy::PRODUCT);
        top_products.sort_by(|a, b| {
            b.actual
                .partial_cmp(&a.actual)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        top_products.truncate(self.targets.top_products);

        let month_region_product = self.merge(actuals, forecasts, GroupBy::MONTH_REGION_PRODUCT);
        let distribution_pct = month_region_product
            .iter()
            .map(|r| r.accuracy * 100.0)
            .collect();

        let report = AccuracyReport {
            national: self.aggregate_accuracy(actuals, forecasts),
            regional_average: self.average_accuracy(actuals, forecasts, GroupBy::REGION),
            product_average: self.average_accuracy(actuals, forecasts, GroupBy::PRODUCT),
            salesperson_average: self.average_accuracy(actuals, forecasts, GroupBy::SALESPERSON),
            monthly: self.merge(actuals, forecasts, GroupBy::MONTHLY),
            by_region: self.merge(actuals, forecasts, GroupBy::REGION),
            top_products,
            by_salesperson: self.merge(actuals, forecasts, GroupBy::SALESPERSON),
            month_region_product,
            detail: self.merge(actuals, forecasts, GroupBy::DETAIL),
            distribution_pct,
        };

        tracing::info!(
            national_accuracy = report.national.accuracy,
            regional_mean = ?report.regional_average.mean_accuracy,
            "预测准确率计算完成"
        );
        report
    }
}

/// 合并行准确率的算术平均（逐项截断到 [0,1]）
pub fn mean_accuracy(rows: &[MergedAccuracyRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = rows.iter().map(|r| clip_unit(r.accuracy)).sum();
    Some(sum / rows.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn actual(month: u32, region: &str, product: &str, quantity: f64) -> ActualSalesFact {
        ActualSalesFact {
            year_month: ym(2025, month),
            region: region.to_string(),
            salesperson: "张三".to_string(),
            product_code: product.to_string(),
            quantity,
        }
    }

    fn forecast(month: u32, region: &str, product: &str, quantity: f64) -> ForecastFact {
        ForecastFact {
            year_month: ym(2025, month),
            region: region.to_string(),
            salesperson: "张三".to_string(),
            product_code: product.to_string(),
            forecast_quantity: quantity,
        }
    }

    #[test]
    fn test_zero_denominator_policy() {
        assert_eq!(difference_rate(0.0, 0.0), 0.0);
        assert_eq!(accuracy(0.0, 0.0), 1.0);
        assert_eq!(difference_rate(0.0, 50.0), -100.0);
        assert_eq!(accuracy(0.0, 50.0), 0.0);
        assert_eq!(difference_rate(100.0, 80.0), 20.0);
        assert!((accuracy(100.0, 80.0) - 0.8).abs() < 1e-12);
        // 预测远超实际时准确率截断为 0
        assert_eq!(accuracy(10.0, 1000.0), 0.0);
    }

    #[test]
    fn test_actual_facts_sum_order_dates_into_months() {
        let shipments = vec![
            ShipmentRecord {
                order_date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
                region: "华东".to_string(),
                salesperson: "张三".to_string(),
                product_code: "F001".to_string(),
                quantity: 4.0,
            },
            ShipmentRecord {
                order_date: NaiveDate::from_ymd_opt(2025, 1, 28).unwrap(),
                region: "华东".to_string(),
                salesperson: "张三".to_string(),
                product_code: "F001".to_string(),
                quantity: 6.0,
            },
        ];
        let facts = actual_facts(&shipments);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].quantity, 10.0);
        assert_eq!(facts[0].year_month, ym(2025, 1));
    }

    #[test]
    fn test_merge_outer_join_fills_zero() {
        let engine = ForecastAccuracyEngine::default();
        let actuals = vec![actual(1, "华东", "F001", 100.0)];
        let forecasts = vec![forecast(1, "华南", "F001", 40.0)];

        let rows = engine.merge(&actuals, &forecasts, GroupBy::REGION);
        assert_eq!(rows.len(), 2);

        let east = rows
            .iter()
            .find(|r| r.key.region.as_deref() == Some("华东"))
            .unwrap();
        assert_eq!(east.forecast, 0.0);
        assert_eq!(east.difference_rate, 100.0);
        assert_eq!(east.accuracy, 0.0);

        let south = rows
            .iter()
            .find(|r| r.key.region.as_deref() == Some("华南"))
            .unwrap();
        assert_eq!(south.actual, 0.0);
        assert_eq!(south.difference, -40.0);
        assert_eq!(south.accuracy, 0.0);
    }

    #[test]
    fn test_average_of_empty_is_none() {
        let engine = ForecastAccuracyEngine::default();
        let avg = engine.average_accuracy(&[], &[], GroupBy::REGION);
        assert_eq!(avg.entity_count, 0);
        assert_eq!(avg.mean_accuracy, None);
    }

    #[test]
    fn test_summary_band_and_improvement() {
        let engine = ForecastAccuracyEngine::default();
        let summary = engine.summarize(100.0, 80.0);
        assert_eq!(summary.band, AccuracyBand::Warning);
        assert!((summary.improvement_potential_pct - 5.0).abs() < 1e-9);

        let summary = engine.summarize(100.0, 95.0);
        assert_eq!(summary.band, AccuracyBand::Good);
        assert_eq!(summary.improvement_potential_pct, 0.0);
    }

    #[test]
    fn test_report_top_products_sorted_by_actual() {
        let engine = ForecastAccuracyEngine::new(AccuracyTargets {
            top_products: 2,
            ..AccuracyTargets::default()
        });
        let actuals = vec![
            actual(1, "华东", "F001", 10.0),
            actual(1, "华东", "F002", 30.0),
            actual(1, "华东", "F003", 20.0),
        ];
        let report = engine.report(&actuals, &[]);
        let codes: Vec<&str> = report
            .top_products
            .iter()
            .filter_map(|r| r.key.product_code.as_deref())
            .collect();
        assert_eq!(codes, vec!["F002", "F003"]);
        assert_eq!(report.distribution_pct.len(), 3);
    }
}
