// ==========================================
// 智能库存预警分析系统 - 批次库存实体
// ==========================================
// 职责: 原始库存行（表头/明细交错）+ 批次记录 + 风险标注
// 红线: BatchRecord 构造后不可变；每次加载全量重算
// ==========================================

use crate::domain::types::RiskTier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryRow - 含批次库存表的单行
// ==========================================
// 一张表通过行顺序表达"产品 → 批次"一对多关系：
// 表头行携带产品代码/描述，其后的明细行携带批次信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryRow {
    /// 表头行：产品代码非空且匹配产品代码前缀
    Header {
        row_number: usize,
        product_code: String,
        description: String,
    },

    /// 明细行：生产日期非空且可解析
    Detail {
        row_number: usize,
        production_date: NaiveDate,
        quantity: f64,
        batch_number: String,
    },

    /// 无法识别的行（静默丢弃）
    Unrecognized { row_number: usize },
}

impl InventoryRow {
    pub fn row_number(&self) -> usize {
        match self {
            InventoryRow::Header { row_number, .. }
            | InventoryRow::Detail { row_number, .. }
            | InventoryRow::Unrecognized { row_number } => *row_number,
        }
    }
}

// ==========================================
// BatchRecord - 批次记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    /// 产品代码（继承自最近的表头行）
    pub product_code: String,

    /// 产品名称（继承自最近的表头行）
    pub product_name: String,

    /// 生产日期
    pub production_date: NaiveDate,

    /// 生产批号（可为空）
    pub batch_number: String,

    /// 数量（箱，空值按 0）
    pub quantity: f64,

    /// 单价（缺失时取默认单价）
    pub unit_price: f64,

    /// 库龄（天，>= 0，基于本次分析统一的 now）
    pub age_days: i64,

    /// 来源行号（用于回溯原表）
    pub source_row: usize,
}

impl BatchRecord {
    /// 批次价值 = 数量 × 单价
    pub fn batch_value(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

// ==========================================
// RiskAssessment - 库龄风险判定结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_tier: RiskTier,
    pub advice: String,
    pub expected_loss: f64,
}

// ==========================================
// RiskAssessedBatch - 带风险标注的批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessedBatch {
    #[serde(flatten)]
    pub batch: BatchRecord,

    pub risk_tier: RiskTier,

    /// 处理建议（本地化文本）
    pub advice: String,

    /// 批次价值
    pub batch_value: f64,

    /// 预期损失
    pub expected_loss: f64,
}

impl RiskAssessedBatch {
    pub fn new(batch: BatchRecord, assessment: RiskAssessment) -> Self {
        let batch_value = batch.batch_value();
        Self {
            batch,
            risk_tier: assessment.risk_tier,
            advice: assessment.advice,
            batch_value,
            expected_loss: assessment.expected_loss,
        }
    }
}

// ==========================================
// BatchFilter - 批次明细筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchFilter {
    /// 风险等级（None 表示全部）
    #[serde(default)]
    pub risk_tier: Option<RiskTier>,

    /// 最小批次价值
    #[serde(default)]
    pub min_value: Option<f64>,

    /// 最大库龄（天）
    #[serde(default)]
    pub max_age_days: Option<i64>,
}

impl BatchFilter {
    pub fn matches(&self, row: &RiskAssessedBatch) -> bool {
        if let Some(tier) = self.risk_tier {
            if row.risk_tier != tier {
                return false;
            }
        }
        if let Some(min_value) = self.min_value {
            if row.batch_value < min_value {
                return false;
            }
        }
        if let Some(max_age) = self.max_age_days {
            if row.batch.age_days > max_age {
                return false;
            }
        }
        true
    }
}
