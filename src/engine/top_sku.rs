// ==========================================
// 智能库存预警分析系统 - TOP SKU 选择器（80% 规则）
// ==========================================
// 职责: 按销量/销售额降序排名，取累计占比首次达到阈值的最短前缀
// 规则:
//   - 跨过阈值的那一行包含在结果内；首行单独超过阈值时只返回首行
//   - 总量 <= 0 无法计算占比时，回退为固定数量（全国 5 / 区域 3）
//   - 区域口径在各区域内部独立排名、独立归一化，不是全国排名的切片
// ==========================================

use crate::config::TopSkuConfig;
use crate::domain::catalog::{ProductCatalog, UnitPriceTable};
use crate::domain::sales::ActualSalesFact;
use crate::domain::top_sku::{RankedProduct, TopSkuReport, TopSkuRow};
use crate::domain::types::TopSkuMetric;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// 累计占比比较容差（浮点累加误差）
const SHARE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct TopSkuSelector {
    config: TopSkuConfig,
}

impl TopSkuSelector {
    pub fn new(config: TopSkuConfig) -> Self {
        Self { config }
    }

    /// 汇总并降序排名（同值按产品代码升序）
    ///
    /// # 参数
    /// - region: Some 时只统计该区域的行
    pub fn rank(
        &self,
        actuals: &[ActualSalesFact],
        metric: TopSkuMetric,
        prices: &UnitPriceTable,
        default_unit_price: f64,
        region: Option<&str>,
    ) -> Vec<RankedProduct> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for fact in actuals {
            if region.is_some_and(|r| r != fact.region) {
                continue;
            }
            let amount = match metric {
                TopSkuMetric::Volume => fact.quantity,
                TopSkuMetric::Value => {
                    fact.quantity * prices.price_or(&fact.product_code, default_unit_price)
                }
            };
            *totals.entry(fact.product_code.as_str()).or_insert(0.0) += amount;
        }

        let mut ranked: Vec<RankedProduct> = totals
            .into_iter()
            .map(|(code, value)| RankedProduct {
                product_code: code.to_string(),
                value,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.product_code.cmp(&b.product_code))
        });
        ranked
    }

    /// 对已排名列表应用 80% 规则
    pub fn select(
        &self,
        ranked: &[RankedProduct],
        min_count: usize,
        region: Option<&str>,
    ) -> Vec<TopSkuRow> {
        let total: f64 = ranked.iter().map(|r| r.value).sum();

        if total <= 0.0 {
            return ranked
                .iter()
                .take(min_count)
                .enumerate()
                .map(|(idx, item)| TopSkuRow {
                    region: region.map(str::to_string),
                    rank: idx + 1,
                    product_code: item.product_code.clone(),
                    product_name: None,
                    value: item.value,
                    share_pct: 0.0,
                    cumulative_share_pct: 0.0,
                })
                .collect();
        }

        let mut rows = Vec::new();
        let mut cumulative = 0.0;
        for (idx, item) in ranked.iter().enumerate() {
            let share_pct = item.value / total * 100.0;
            cumulative += share_pct;
            rows.push(TopSkuRow {
                region: region.map(str::to_string),
                rank: idx + 1,
                product_code: item.product_code.clone(),
                product_name: None,
                value: item.value,
                share_pct,
                cumulative_share_pct: cumulative,
            });
            if cumulative + SHARE_EPSILON >= self.config.threshold_pct {
                break;
            }
        }
        rows
    }

    /// 全国 + 各区域独立的 TOP SKU
    pub fn report(
        &self,
        actuals: &[ActualSalesFact],
        metric: TopSkuMetric,
        prices: &UnitPriceTable,
        default_unit_price: f64,
        catalog: &ProductCatalog,
    ) -> TopSkuReport {
        let with_names = |mut rows: Vec<TopSkuRow>| -> Vec<TopSkuRow> {
            for row in &mut rows {
                row.product_name = catalog.name(&row.product_code).map(str::to_string);
            }
            rows
        };

        let national_ranked = self.rank(actuals, metric, prices, default_unit_price, None);
        let national = with_names(self.select(&national_ranked, self.config.min_national, None));

        let regions: BTreeSet<&str> = actuals.iter().map(|a| a.region.as_str()).collect();
        let regional = regions
            .into_iter()
            .map(|region| {
                let ranked = self.rank(actuals, metric, prices, default_unit_price, Some(region));
                let rows = self.select(&ranked, self.config.min_regional, Some(region));
                (region.to_string(), with_names(rows))
            })
            .collect();

        tracing::debug!(metric = %metric, national = national.len(), "TOP SKU 计算完成");
        TopSkuReport {
            metric,
            national,
            regional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(values: &[(&str, f64)]) -> Vec<RankedProduct> {
        values
            .iter()
            .map(|(code, value)| RankedProduct {
                product_code: code.to_string(),
                value: *value,
            })
            .collect()
    }

    #[test]
    fn test_prefix_includes_crossing_row() {
        let selector = TopSkuSelector::default();
        let rows = selector.select(
            &ranked(&[("A", 50.0), ("B", 20.0), ("C", 15.0), ("D", 10.0), ("E", 5.0)]),
            5,
            None,
        );
        let codes: Vec<&str> = rows.iter().map(|r| r.product_code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B", "C"]);
        assert!((rows[2].cumulative_share_pct - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_row_alone_exceeds_threshold() {
        let selector = TopSkuSelector::default();
        let rows = selector.select(&ranked(&[("A", 90.0), ("B", 10.0)]), 5, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 1);
    }

    #[test]
    fn test_zero_total_falls_back_to_min_count() {
        let selector = TopSkuSelector::default();
        let items = ranked(&[("A", 0.0), ("B", 0.0), ("C", 0.0), ("D", 0.0)]);
        assert_eq!(selector.select(&items, 3, Some("华东")).len(), 3);
        assert_eq!(selector.select(&items, 5, None).len(), 4);
        assert!(selector.select(&[], 5, None).is_empty());
    }
}
