// ==========================================
// 智能库存预警分析系统 - 同比增长实体
// ==========================================
// 职责: 滚动三个月同比增长行
// 红线: 历史不足两年的产品没有增长行（不得默认为 0 或"维持"）
// ==========================================

use crate::domain::types::{StockAction, Trend};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductGrowthRow - 单产品单月的滚动同比
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGrowthRow {
    pub product_code: String,

    /// 窗口结束年份
    pub year: i32,

    /// 窗口结束月份（3..=12）
    pub month: u32,

    /// 本年 (m-2, m-1, m) 三个月销量合计
    pub rolling_3m_actual: f64,

    /// 上年同窗口销量合计
    pub rolling_3m_prior_year: f64,

    /// 同比增长率（%，已截断到配置区间）
    pub growth_rate_pct: f64,

    pub trend: Trend,

    pub recommendation: StockAction,

    /// 建议调整幅度（%，取整）
    pub adjustment_pct: i64,
}

impl ProductGrowthRow {
    /// 排序键：越新的 (year, month) 越大
    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}

// ==========================================
// GrowthReport - 增长分析输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrowthReport {
    /// 全部增长行（产品代码 + 年月升序）
    pub rows: Vec<ProductGrowthRow>,

    /// 每个产品最新一期的增长行（产品代码升序）
    pub latest: Vec<ProductGrowthRow>,

    /// 因历史不足无法计算增长的产品（界面显示"数据不足"）
    pub insufficient_history: Vec<String>,
}
