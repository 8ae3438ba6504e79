// ==========================================
// 智能库存预警分析系统 - TOP SKU 实体
// ==========================================
// 职责: 80% 规则下的核心产品行
// ==========================================

use crate::domain::types::TopSkuMetric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个排名条目（排名前的输入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    pub product_code: String,
    pub value: f64,
}

/// TOP SKU 行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSkuRow {
    /// 区域（None 表示全国口径）
    pub region: Option<String>,

    /// 排名（从 1 开始）
    pub rank: usize,

    pub product_code: String,

    pub product_name: Option<String>,

    /// 销量或销售额
    pub value: f64,

    /// 占比（%）
    pub share_pct: f64,

    /// 累计占比（%）
    pub cumulative_share_pct: f64,
}

/// TOP SKU 输出（全国 + 各区域独立排名）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSkuReport {
    pub metric: TopSkuMetric,
    pub national: Vec<TopSkuRow>,
    pub regional: BTreeMap<String, Vec<TopSkuRow>>,
}
