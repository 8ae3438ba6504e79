// ==========================================
// 智能库存预警分析系统 - 产品目录与单价表
// ==========================================
// 职责: 产品代码 → 显示名称 / 单价 查询
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 单价表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub product_code: String,
    pub unit_price: f64,
}

/// 产品信息表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfoRecord {
    pub product_code: String,
    pub product_name: String,
    pub short_name: Option<String>,
}

// ==========================================
// UnitPriceTable - 单价表（按产品代码精确匹配）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitPriceTable {
    prices: HashMap<String, f64>,
}

impl UnitPriceTable {
    /// 由单价行构造；同一产品出现多次时以首行为准，非正单价忽略
    pub fn from_records(records: &[PriceRecord]) -> Self {
        let mut prices = HashMap::new();
        for record in records {
            if record.unit_price > 0.0 && record.unit_price.is_finite() {
                prices
                    .entry(record.product_code.clone())
                    .or_insert(record.unit_price);
            }
        }
        Self { prices }
    }

    pub fn get(&self, product_code: &str) -> Option<f64> {
        self.prices.get(product_code).copied()
    }

    /// 查询单价，缺失时返回默认单价
    pub fn price_or(&self, product_code: &str, default_price: f64) -> f64 {
        self.get(product_code).unwrap_or(default_price)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

// ==========================================
// ProductCatalog - 产品名称映射
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    names: HashMap<String, String>,
    short_names: HashMap<String, String>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记产品名称（来自库存表头行，同一产品多次出现时以最后一行为准）
    pub fn register(&mut self, product_code: &str, name: &str) {
        if name.trim().is_empty() {
            return;
        }
        self.names
            .insert(product_code.to_string(), name.trim().to_string());
    }

    /// 合并产品信息表（覆盖已有名称）
    pub fn merge_info(&mut self, records: &[ProductInfoRecord]) {
        for record in records {
            if !record.product_name.trim().is_empty() {
                self.names
                    .insert(record.product_code.clone(), record.product_name.clone());
            }
            if let Some(short) = record.short_name.as_ref().filter(|s| !s.trim().is_empty()) {
                self.short_names
                    .insert(record.product_code.clone(), short.clone());
            }
        }
    }

    pub fn name(&self, product_code: &str) -> Option<&str> {
        self.names.get(product_code).map(|s| s.as_str())
    }

    /// 显示名称：简称 > 全称 > 产品代码
    pub fn display_name(&self, product_code: &str) -> String {
        self.short_names
            .get(product_code)
            .or_else(|| self.names.get(product_code))
            .cloned()
            .unwrap_or_else(|| product_code.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
