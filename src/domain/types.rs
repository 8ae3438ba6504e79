// ==========================================
// 智能库存预警分析系统 - 领域类型定义
// ==========================================
// 职责: 风险等级 / 趋势 / 备货建议 / 准确率分档 等枚举
// 红线: 等级制,不是评分制
// ==========================================

use crate::i18n::t;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库龄风险等级 (Risk Tier)
// ==========================================
// 顺序: Minimal < Low < Medium < High < Extreme
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Minimal, // 极低风险（新鲜库存）
    Low,     // 低风险
    Medium,  // 中风险
    High,    // 高风险
    Extreme, // 极高风险
}

impl RiskTier {
    /// 全部等级（按严重程度从高到低）
    pub const BY_SEVERITY_DESC: [RiskTier; 5] = [
        RiskTier::Extreme,
        RiskTier::High,
        RiskTier::Medium,
        RiskTier::Low,
        RiskTier::Minimal,
    ];

    /// 是否计入"高风险"口径（极高 + 高）
    pub fn is_high_risk(&self) -> bool {
        matches!(self, RiskTier::Extreme | RiskTier::High)
    }

    /// 本地化显示名称
    pub fn label(&self) -> String {
        t(&format!("risk.{}.label", self.key()))
    }

    /// 本地化处理建议
    pub fn advice(&self) -> String {
        t(&format!("risk.{}.advice", self.key()))
    }

    fn key(&self) -> &'static str {
        match self {
            RiskTier::Minimal => "minimal",
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Extreme => "extreme",
        }
    }

    /// 从字符串解析（支持英文代码与中文名称）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MINIMAL" | "极低风险" => Some(RiskTier::Minimal),
            "LOW" | "低风险" => Some(RiskTier::Low),
            "MEDIUM" | "中风险" => Some(RiskTier::Medium),
            "HIGH" | "高风险" => Some(RiskTier::High),
            "EXTREME" | "极高风险" => Some(RiskTier::Extreme),
            _ => None,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Minimal => write!(f, "MINIMAL"),
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::Medium => write!(f, "MEDIUM"),
            RiskTier::High => write!(f, "HIGH"),
            RiskTier::Extreme => write!(f, "EXTREME"),
        }
    }
}

// ==========================================
// 销量趋势 (Trend)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    StrongGrowth,       // 强劲增长 (> 10%)
    Growth,             // 增长 (> 0%)
    SlightDecline,      // 轻微下降 (> -10%)
    SignificantDecline, // 显著下降
}

impl Trend {
    /// 按同比增长率分档
    pub fn from_growth_rate(growth_rate_pct: f64) -> Self {
        if growth_rate_pct > 10.0 {
            Trend::StrongGrowth
        } else if growth_rate_pct > 0.0 {
            Trend::Growth
        } else if growth_rate_pct > -10.0 {
            Trend::SlightDecline
        } else {
            Trend::SignificantDecline
        }
    }

    pub fn label(&self) -> String {
        match self {
            Trend::StrongGrowth => t("trend.strong_growth"),
            Trend::Growth => t("trend.growth"),
            Trend::SlightDecline => t("trend.slight_decline"),
            Trend::SignificantDecline => t("trend.significant_decline"),
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::StrongGrowth => write!(f, "STRONG_GROWTH"),
            Trend::Growth => write!(f, "GROWTH"),
            Trend::SlightDecline => write!(f, "SLIGHT_DECLINE"),
            Trend::SignificantDecline => write!(f, "SIGNIFICANT_DECLINE"),
        }
    }
}

// ==========================================
// 备货建议 (Stock Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockAction {
    IncreaseStock,    // 增加备货
    IncreaseSlightly, // 小幅增加
    Maintain,         // 维持现状
    DecreaseStock,    // 减少备货
}

impl StockAction {
    pub fn label(&self) -> String {
        match self {
            StockAction::IncreaseStock => t("stock_action.increase_stock"),
            StockAction::IncreaseSlightly => t("stock_action.increase_slightly"),
            StockAction::Maintain => t("stock_action.maintain"),
            StockAction::DecreaseStock => t("stock_action.decrease_stock"),
        }
    }
}

impl fmt::Display for StockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockAction::IncreaseStock => write!(f, "INCREASE_STOCK"),
            StockAction::IncreaseSlightly => write!(f, "INCREASE_SLIGHTLY"),
            StockAction::Maintain => write!(f, "MAINTAIN"),
            StockAction::DecreaseStock => write!(f, "DECREASE_STOCK"),
        }
    }
}

// ==========================================
// 准确率分档 (Accuracy Band)
// ==========================================
// 目标线默认 85%，预警线默认 75%
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccuracyBand {
    Poor,    // 低于预警线
    Warning, // 预警线 ~ 目标线
    Good,    // 达到目标
}

impl AccuracyBand {
    pub fn label(&self) -> String {
        match self {
            AccuracyBand::Poor => t("accuracy_band.poor"),
            AccuracyBand::Warning => t("accuracy_band.warning"),
            AccuracyBand::Good => t("accuracy_band.good"),
        }
    }

    /// 按百分比准确率分档
    ///
    /// # 参数
    /// - accuracy_pct: 准确率（0~100）
    /// - target_pct: 目标线
    /// - warning_pct: 预警线
    pub fn classify(accuracy_pct: f64, target_pct: f64, warning_pct: f64) -> Self {
        if accuracy_pct >= target_pct {
            AccuracyBand::Good
        } else if accuracy_pct >= warning_pct {
            AccuracyBand::Warning
        } else {
            AccuracyBand::Poor
        }
    }
}

impl fmt::Display for AccuracyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccuracyBand::Poor => write!(f, "POOR"),
            AccuracyBand::Warning => write!(f, "WARNING"),
            AccuracyBand::Good => write!(f, "GOOD"),
        }
    }
}

// ==========================================
// TOP SKU 排名口径
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopSkuMetric {
    Volume, // 按销量（箱）
    Value,  // 按销售额（销量 × 单价）
}

impl fmt::Display for TopSkuMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopSkuMetric::Volume => write!(f, "VOLUME"),
            TopSkuMetric::Value => write!(f, "VALUE"),
        }
    }
}

// ==========================================
// 输入表类型 (Input Table)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputTable {
    Shipment,    // 出货数据
    Forecast,    // 人工预测
    UnitPrice,   // 单价
    Inventory,   // 含批次库存
    ProductInfo, // 产品信息（可选）
}

impl InputTable {
    pub fn label(&self) -> String {
        match self {
            InputTable::Shipment => t("table.shipment"),
            InputTable::Forecast => t("table.forecast"),
            InputTable::UnitPrice => t("table.unit_price"),
            InputTable::Inventory => t("table.inventory"),
            InputTable::ProductInfo => t("table.product_info"),
        }
    }
}

impl fmt::Display for InputTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputTable::Shipment => write!(f, "SHIPMENT"),
            InputTable::Forecast => write!(f, "FORECAST"),
            InputTable::UnitPrice => write!(f, "UNIT_PRICE"),
            InputTable::Inventory => write!(f, "INVENTORY"),
            InputTable::ProductInfo => write!(f, "PRODUCT_INFO"),
        }
    }
}
