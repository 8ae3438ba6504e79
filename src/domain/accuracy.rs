// ==========================================
// 智能库存预警分析系统 - 预测准确率实体
// ==========================================
// 职责: 分组维度 / 分组键 / 合并行 / 汇总口径
// 红线: 全国汇总口径与分实体平均口径必须分别计算、分别标注
// ==========================================

use crate::domain::sales::YearMonth;
use crate::domain::types::AccuracyBand;
use serde::{Deserialize, Serialize};

// ==========================================
// GroupBy - 分组维度组合
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupBy {
    pub month: bool,
    pub region: bool,
    pub salesperson: bool,
    pub product: bool,
}

impl GroupBy {
    /// 全国（完全折叠）
    pub const NATIONAL: GroupBy = GroupBy::new(false, false, false, false);
    /// 全国月度趋势
    pub const MONTHLY: GroupBy = GroupBy::new(true, false, false, false);
    /// 区域
    pub const REGION: GroupBy = GroupBy::new(false, true, false, false);
    /// 产品
    pub const PRODUCT: GroupBy = GroupBy::new(false, false, false, true);
    /// 销售员
    pub const SALESPERSON: GroupBy = GroupBy::new(false, false, true, false);
    /// 月 × 区域 × 产品
    pub const MONTH_REGION_PRODUCT: GroupBy = GroupBy::new(true, true, false, true);
    /// 月 × 区域 × 销售员 × 产品
    pub const DETAIL: GroupBy = GroupBy::new(true, true, true, true);

    pub const fn new(month: bool, region: bool, salesperson: bool, product: bool) -> Self {
        Self {
            month,
            region,
            salesperson,
            product,
        }
    }

    /// 按维度组合投影出分组键
    pub fn key(
        &self,
        year_month: YearMonth,
        region: &str,
        salesperson: &str,
        product_code: &str,
    ) -> GroupKey {
        GroupKey {
            year_month: self.month.then_some(year_month),
            region: self.region.then(|| region.to_string()),
            salesperson: self.salesperson.then(|| salesperson.to_string()),
            product_code: self.product.then(|| product_code.to_string()),
        }
    }
}

// ==========================================
// GroupKey - 分组键（未参与分组的维度为 None）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub year_month: Option<YearMonth>,
    pub region: Option<String>,
    pub salesperson: Option<String>,
    pub product_code: Option<String>,
}

impl GroupKey {
    /// 可读标签（用于图表轴/日志）
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ym) = self.year_month {
            parts.push(ym.to_string());
        }
        if let Some(region) = &self.region {
            parts.push(region.clone());
        }
        if let Some(salesperson) = &self.salesperson {
            parts.push(salesperson.clone());
        }
        if let Some(code) = &self.product_code {
            parts.push(code.clone());
        }
        if parts.is_empty() {
            "全国".to_string()
        } else {
            parts.join(" / ")
        }
    }
}

// ==========================================
// MergedAccuracyRow - 实际与预测外连接后的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedAccuracyRow {
    #[serde(flatten)]
    pub key: GroupKey,

    /// 实际销量（缺失补 0）
    pub actual: f64,

    /// 预测销量（缺失补 0）
    pub forecast: f64,

    /// 差异 = 实际 - 预测
    pub difference: f64,

    /// 差异率（%）
    pub difference_rate: f64,

    /// 准确率（0~1）
    pub accuracy: f64,
}

// ==========================================
// AccuracySummary - 汇总后再求比率（全国口径）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    pub total_actual: f64,
    pub total_forecast: f64,
    pub difference: f64,
    pub difference_rate: f64,
    pub accuracy: f64,
    pub band: AccuracyBand,
    /// 距离目标线的提升空间（百分点，>= 0）
    pub improvement_potential_pct: f64,
}

// ==========================================
// EntityAverageAccuracy - 先分实体求比率再平均
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAverageAccuracy {
    /// 参与平均的实体维度
    pub group_by: GroupBy,

    /// 实体数量
    pub entity_count: usize,

    /// 各实体准确率的算术平均（0~1）；无实体时为 None
    pub mean_accuracy: Option<f64>,
}

// ==========================================
// AccuracyReport - 预测准确率全量输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// 全国：汇总后再求比率
    pub national: AccuracySummary,

    /// 区域：先分区域求比率再平均
    pub regional_average: EntityAverageAccuracy,

    /// 产品：先分产品求比率再平均
    pub product_average: EntityAverageAccuracy,

    /// 销售员：先分销售员求比率再平均
    pub salesperson_average: EntityAverageAccuracy,

    /// 全国月度趋势
    pub monthly: Vec<MergedAccuracyRow>,

    /// 区域对比
    pub by_region: Vec<MergedAccuracyRow>,

    /// 产品（按实际销量降序，取前 N）
    pub top_products: Vec<MergedAccuracyRow>,

    /// 销售员
    pub by_salesperson: Vec<MergedAccuracyRow>,

    /// 月 × 区域 × 产品
    pub month_region_product: Vec<MergedAccuracyRow>,

    /// 月 × 区域 × 销售员 × 产品
    pub detail: Vec<MergedAccuracyRow>,

    /// 月 × 区域 × 产品 粒度的准确率分布（百分比）
    pub distribution_pct: Vec<f64>,
}
