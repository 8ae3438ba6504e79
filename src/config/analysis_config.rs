// ==========================================
// 智能库存预警分析系统 - 分析参数
// ==========================================
// 职责: 一次分析运行所需的全部阈值/参数（只读快照）
// ==========================================

use serde::{Deserialize, Serialize};

/// 库龄风险阈值（含下限，单位: 天）与损失率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub extreme_days: i64,
    pub high_days: i64,
    pub medium_days: i64,
    pub low_days: i64,
    pub loss_rate_extreme: f64,
    pub loss_rate_high: f64,
    pub loss_rate_medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            extreme_days: 120,
            high_days: 90,
            medium_days: 60,
            low_days: 30,
            loss_rate_extreme: 0.30,
            loss_rate_high: 0.20,
            loss_rate_medium: 0.10,
        }
    }
}

impl RiskThresholds {
    /// 阈值必须严格递减且非负，否则等级不再单调
    pub fn is_valid(&self) -> bool {
        self.extreme_days > self.high_days
            && self.high_days > self.medium_days
            && self.medium_days > self.low_days
            && self.low_days >= 0
            && [
                self.loss_rate_extreme,
                self.loss_rate_high,
                self.loss_rate_medium,
            ]
            .iter()
            .all(|r| (0.0..=1.0).contains(r))
    }
}

/// 同比增长参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// 增长率下限（%）
    pub min_rate_pct: f64,

    /// 增长率上限（%）
    pub max_rate_pct: f64,

    /// 显著下降时的调整幅度除数（1 = 不折半）
    pub decline_divisor: f64,
}

impl GrowthConfig {
    /// 区间必须有限且 min < max，除数必须为有限正数
    pub fn is_valid(&self) -> bool {
        self.min_rate_pct.is_finite()
            && self.max_rate_pct.is_finite()
            && self.min_rate_pct < self.max_rate_pct
            && self.decline_divisor.is_finite()
            && self.decline_divisor > 0.0
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            min_rate_pct: -100.0,
            max_rate_pct: 500.0,
            decline_divisor: 2.0,
        }
    }
}

/// TOP SKU 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSkuConfig {
    /// 累计占比阈值（%）
    pub threshold_pct: f64,

    /// 全国口径兜底数量
    pub min_national: usize,

    /// 区域口径兜底数量
    pub min_regional: usize,
}

impl Default for TopSkuConfig {
    fn default() -> Self {
        Self {
            threshold_pct: 80.0,
            min_national: 5,
            min_regional: 3,
        }
    }
}

/// 预测准确率目标线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyTargets {
    pub target_pct: f64,
    pub warning_pct: f64,
    /// 产品准确率视图保留的产品数量
    pub top_products: usize,
}

impl Default for AccuracyTargets {
    fn default() -> Self {
        Self {
            target_pct: 85.0,
            warning_pct: 75.0,
            top_products: 10,
        }
    }
}

/// 输入文件名（相对数据目录）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFiles {
    pub shipment: String,
    pub forecast: String,
    pub unit_price: String,
    pub inventory: String,
    pub product_info: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            shipment: "2409~250224出货数据.xlsx".to_string(),
            forecast: "2409~2502人工预测.xlsx".to_string(),
            unit_price: "单价.xlsx".to_string(),
            inventory: "含批次库存0221(2).xlsx".to_string(),
            product_info: "产品信息.xlsx".to_string(),
        }
    }
}

/// 一次分析运行的参数快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub risk: RiskThresholds,
    pub default_unit_price: f64,
    pub product_code_prefix: String,
    pub growth: GrowthConfig,
    pub top_sku: TopSkuConfig,
    pub accuracy: AccuracyTargets,
    pub files: InputFiles,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl AnalysisConfig {
    pub fn standard() -> Self {
        Self {
            risk: RiskThresholds::default(),
            default_unit_price: 100.0,
            product_code_prefix: "F".to_string(),
            growth: GrowthConfig::default(),
            top_sku: TopSkuConfig::default(),
            accuracy: AccuracyTargets::default(),
            files: InputFiles::default(),
        }
    }
}
