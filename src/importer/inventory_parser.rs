// ==========================================
// 智能库存预警分析系统 - 含批次库存表解析
// ==========================================
// 职责: 表头/明细交错的库存行 → 批次记录 + 产品名称映射
// 规则: 从上到下顺序折叠，携带"当前产品"上下文；
//       明细行之前没有任何表头行时静默丢弃
// ==========================================

use crate::domain::batch::{BatchRecord, InventoryRow};
use crate::domain::catalog::{ProductCatalog, UnitPriceTable};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::importer_trait::RawTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 解析统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryParseStats {
    pub header_rows: usize,
    pub detail_rows: usize,
    /// 出现在任何表头之前的明细行
    pub orphan_detail_rows: usize,
    pub unrecognized_rows: usize,
}

/// 解析产物
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryParseOutput {
    pub batches: Vec<BatchRecord>,
    pub catalog: ProductCatalog,
    pub stats: InventoryParseStats,
}

/// 折叠时携带的当前表头上下文
struct CurrentProduct {
    code: String,
    name: String,
    unit_price: f64,
}

// ==========================================
// SpreadsheetRecordParser
// ==========================================
#[derive(Debug, Clone)]
pub struct SpreadsheetRecordParser {
    product_code_prefix: String,
    default_unit_price: f64,
    mapper: FieldMapper,
}

impl SpreadsheetRecordParser {
    pub fn new(product_code_prefix: impl Into<String>, default_unit_price: f64) -> Self {
        Self {
            product_code_prefix: product_code_prefix.into(),
            default_unit_price,
            mapper: FieldMapper::new(),
        }
    }

    /// 原始表 → 带标签的库存行（保持原表顺序）
    pub fn classify(&self, raw: &RawTable) -> Vec<InventoryRow> {
        raw.rows
            .iter()
            .map(|row| {
                self.mapper
                    .classify_inventory_row(row, &self.product_code_prefix)
            })
            .collect()
    }

    /// 顺序折叠为批次记录
    ///
    /// # 参数
    /// - rows: 已分类的库存行（原表顺序）
    /// - prices: 单价表（按产品代码精确匹配，缺失取默认单价）
    /// - today: 本次分析统一的参考日期
    #[instrument(skip(self, rows, prices), fields(rows = rows.len()))]
    pub fn parse(
        &self,
        rows: &[InventoryRow],
        prices: &UnitPriceTable,
        today: NaiveDate,
    ) -> InventoryParseOutput {
        let mut output = InventoryParseOutput::default();
        let mut current: Option<CurrentProduct> = None;

        for row in rows {
            match row {
                InventoryRow::Header {
                    product_code,
                    description,
                    ..
                } => {
                    output.stats.header_rows += 1;
                    output.catalog.register(product_code, description);
                    current = Some(CurrentProduct {
                        code: product_code.clone(),
                        name: description.clone(),
                        unit_price: prices.price_or(product_code, self.default_unit_price),
                    });
                }
                InventoryRow::Detail {
                    row_number,
                    production_date,
                    quantity,
                    batch_number,
                } => {
                    let Some(product) = current.as_ref() else {
                        output.stats.orphan_detail_rows += 1;
                        tracing::debug!(row = row_number, "明细行之前无表头行，跳过");
                        continue;
                    };

                    output.stats.detail_rows += 1;
                    output.batches.push(BatchRecord {
                        product_code: product.code.clone(),
                        product_name: product.name.clone(),
                        production_date: *production_date,
                        batch_number: batch_number.clone(),
                        quantity: *quantity,
                        unit_price: product.unit_price,
                        age_days: (today - *production_date).num_days().max(0),
                        source_row: *row_number,
                    });
                }
                InventoryRow::Unrecognized { .. } => {
                    output.stats.unrecognized_rows += 1;
                }
            }
        }

        tracing::info!(
            batches = output.batches.len(),
            products = output.catalog.len(),
            orphan = output.stats.orphan_detail_rows,
            unrecognized = output.stats.unrecognized_rows,
            "库存批次解析完成"
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::PriceRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn header(row_number: usize, code: &str) -> InventoryRow {
        InventoryRow::Header {
            row_number,
            product_code: code.to_string(),
            description: format!("{}名称", code),
        }
    }

    fn detail(row_number: usize, production_date: NaiveDate, quantity: f64) -> InventoryRow {
        InventoryRow::Detail {
            row_number,
            production_date,
            quantity,
            batch_number: format!("B{}", row_number),
        }
    }

    #[test]
    fn test_details_inherit_nearest_header() {
        let today = date(2025, 2, 21);
        let rows = vec![
            detail(1, date(2025, 1, 1), 3.0),
            header(2, "F001"),
            detail(3, date(2025, 1, 1), 5.0),
            InventoryRow::Unrecognized { row_number: 4 },
            header(5, "F002"),
            detail(6, date(2025, 2, 1), 7.0),
            detail(7, date(2025, 2, 11), 9.0),
        ];
        let prices = UnitPriceTable::from_records(&[PriceRecord {
            product_code: "F001".to_string(),
            unit_price: 10.0,
        }]);

        let output = SpreadsheetRecordParser::new("F", 100.0).parse(&rows, &prices, today);

        assert_eq!(output.batches.len(), 3);
        assert_eq!(output.batches[0].product_code, "F001");
        assert_eq!(output.batches[0].unit_price, 10.0);
        assert_eq!(output.batches[0].age_days, 51);
        assert_eq!(output.batches[1].product_code, "F002");
        assert_eq!(output.batches[1].unit_price, 100.0);
        assert_eq!(output.batches[2].source_row, 7);
        assert_eq!(output.stats.orphan_detail_rows, 1);
        assert_eq!(output.stats.unrecognized_rows, 1);
        assert_eq!(output.catalog.name("F002"), Some("F002名称"));
    }

    #[test]
    fn test_future_production_date_clamps_age_to_zero() {
        let today = date(2025, 2, 21);
        let rows = vec![header(1, "F001"), detail(2, date(2025, 3, 1), 1.0)];
        let output =
            SpreadsheetRecordParser::new("F", 100.0).parse(&rows, &UnitPriceTable::default(), today);
        assert_eq!(output.batches[0].age_days, 0);
    }
}
