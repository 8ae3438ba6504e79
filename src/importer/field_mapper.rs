// ==========================================
// 智能库存预警分析系统 - 字段映射器实现
// ==========================================
// 职责: 源列名（含别名）→ 标准字段映射 + 类型转换 + 必需列校验
// 约定: 列名是外部契约；单行格式错误只跳过该行，不中断整表
// ==========================================

use crate::domain::batch::InventoryRow;
use crate::domain::catalog::{PriceRecord, ProductInfoRecord};
use crate::domain::sales::{ForecastRecord, ShipmentRecord, YearMonth};
use crate::domain::types::InputTable;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{RawRow, RawTable};

/// 标准列名（与原始报表表头一致）
pub mod columns {
    // 出货表
    pub const ORDER_DATE: &str = "订单日期";
    pub const REGION: &str = "所属区域";
    pub const APPLICANT: &str = "申请人";
    pub const PRODUCT_CODE: &str = "产品代码";
    pub const SHIPPED_QUANTITY: &str = "求和项:数量（箱）";

    // 预测表
    pub const LARGE_REGION: &str = "所属大区";
    pub const SALESPERSON: &str = "销售员";
    pub const YEAR_MONTH: &str = "所属年月";
    pub const FORECAST_QUANTITY: &str = "预计销售量";

    // 单价表
    pub const UNIT_PRICE: &str = "单价";

    // 库存表
    pub const MATERIAL: &str = "物料";
    pub const DESCRIPTION: &str = "描述";
    pub const PRODUCTION_DATE: &str = "生产日期";
    pub const QUANTITY: &str = "数量";
    pub const BATCH_NUMBER: &str = "生产批号";

    // 产品信息表
    pub const PRODUCT_NAME: &str = "产品名称";
    pub const SHORT_NAME: &str = "产品简称";
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列名别名（首项为标准列名）
    fn aliases(key: &str) -> Vec<&str> {
        use columns::*;
        match key {
            ORDER_DATE => vec![ORDER_DATE, "order_date"],
            REGION => vec![REGION, "区域", "region"],
            APPLICANT => vec![APPLICANT, SALESPERSON, "salesperson"],
            PRODUCT_CODE => vec![PRODUCT_CODE, "product_code"],
            SHIPPED_QUANTITY => vec![SHIPPED_QUANTITY, "数量（箱）", "quantity"],
            // 预测表的"所属大区"统一为区域口径
            LARGE_REGION => vec![LARGE_REGION, REGION, "region"],
            SALESPERSON => vec![SALESPERSON, APPLICANT, "salesperson"],
            YEAR_MONTH => vec![YEAR_MONTH, "年月", "year_month"],
            FORECAST_QUANTITY => vec![FORECAST_QUANTITY, "forecast_quantity"],
            UNIT_PRICE => vec![UNIT_PRICE, "unit_price"],
            MATERIAL => vec![MATERIAL, PRODUCT_CODE, "product_code"],
            DESCRIPTION => vec![DESCRIPTION, "description"],
            PRODUCTION_DATE => vec![PRODUCTION_DATE, "production_date"],
            QUANTITY => vec![QUANTITY, "quantity"],
            BATCH_NUMBER => vec![BATCH_NUMBER, "batch_number"],
            PRODUCT_NAME => vec![PRODUCT_NAME, "product_name"],
            SHORT_NAME => vec![SHORT_NAME, "short_name"],
            _ => vec![key],
        }
    }

    /// 各表必需列
    pub fn required_columns(table: InputTable) -> &'static [&'static str] {
        use columns::*;
        match table {
            InputTable::Shipment => &[ORDER_DATE, REGION, APPLICANT, PRODUCT_CODE, SHIPPED_QUANTITY],
            InputTable::Forecast => &[LARGE_REGION, SALESPERSON, YEAR_MONTH, PRODUCT_CODE, FORECAST_QUANTITY],
            InputTable::UnitPrice => &[PRODUCT_CODE, UNIT_PRICE],
            InputTable::Inventory => &[MATERIAL, PRODUCTION_DATE, QUANTITY],
            InputTable::ProductInfo => &[PRODUCT_CODE, PRODUCT_NAME],
        }
    }

    /// 校验必需列（任一别名存在即可）
    pub fn validate_columns(&self, table: InputTable, raw: &RawTable) -> ImportResult<()> {
        for column in Self::required_columns(table) {
            let present = Self::aliases(column)
                .iter()
                .any(|alias| raw.has_column(alias));
            if !present {
                return Err(ImportError::MissingColumn {
                    table: table.label(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 提取字符串字段，按别名顺序取第一个非空值
    pub fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        Self::aliases(key)
            .into_iter()
            .find_map(|alias| self.cleaner.normalize_null(row.get(alias).map(str::to_string)))
    }

    fn get_f64(&self, row: &RawRow, key: &str) -> Option<f64> {
        self.get_string(row, key)
            .and_then(|v| self.cleaner.parse_f64(&v))
    }

    /// 解析数量字段：空值按 0，非法值报错
    fn get_quantity(&self, row: &RawRow, key: &str) -> ImportResult<f64> {
        match self.get_string(row, key) {
            None => Ok(0.0),
            Some(value) => self
                .cleaner
                .parse_f64(&value)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: key.to_string(),
                    message: format!("无法解析为数值: {}", value),
                }),
        }
    }

    // ===== 出货表 =====

    pub fn map_shipment(&self, row: &RawRow) -> ImportResult<ShipmentRecord> {
        let raw_date = self.get_string(row, columns::ORDER_DATE).unwrap_or_default();
        let order_date =
            self.cleaner
                .parse_date(&raw_date)
                .ok_or_else(|| ImportError::DateFormatError {
                    row: row.row_number,
                    field: columns::ORDER_DATE.to_string(),
                    value: raw_date.clone(),
                })?;

        let product_code = self.require(row, columns::PRODUCT_CODE)?;

        Ok(ShipmentRecord {
            order_date,
            region: self.get_string(row, columns::REGION).unwrap_or_default(),
            salesperson: self.get_string(row, columns::APPLICANT).unwrap_or_default(),
            product_code,
            quantity: self.get_quantity(row, columns::SHIPPED_QUANTITY)?,
        })
    }

    // ===== 预测表 =====

    pub fn map_forecast(&self, row: &RawRow) -> ImportResult<ForecastRecord> {
        let raw_month = self.get_string(row, columns::YEAR_MONTH).unwrap_or_default();
        let year_month = YearMonth::parse(&raw_month)
            .or_else(|| self.cleaner.parse_date(&raw_month).map(YearMonth::from_date))
            .ok_or_else(|| ImportError::DateFormatError {
                row: row.row_number,
                field: columns::YEAR_MONTH.to_string(),
                value: raw_month.clone(),
            })?;

        let product_code = self.require(row, columns::PRODUCT_CODE)?;

        Ok(ForecastRecord {
            year_month,
            region: self.get_string(row, columns::LARGE_REGION).unwrap_or_default(),
            salesperson: self.get_string(row, columns::SALESPERSON).unwrap_or_default(),
            product_code,
            forecast_quantity: self.get_quantity(row, columns::FORECAST_QUANTITY)?,
        })
    }

    // ===== 单价表 =====

    pub fn map_price(&self, row: &RawRow) -> ImportResult<PriceRecord> {
        let product_code = self.require(row, columns::PRODUCT_CODE)?;
        let unit_price = self
            .get_f64(row, columns::UNIT_PRICE)
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row.row_number,
                field: columns::UNIT_PRICE.to_string(),
                message: "单价为空或非数值".to_string(),
            })?;

        Ok(PriceRecord {
            product_code,
            unit_price,
        })
    }

    // ===== 产品信息表 =====

    pub fn map_product_info(&self, row: &RawRow) -> ImportResult<ProductInfoRecord> {
        Ok(ProductInfoRecord {
            product_code: self.require(row, columns::PRODUCT_CODE)?,
            product_name: self.require(row, columns::PRODUCT_NAME)?,
            short_name: self.get_string(row, columns::SHORT_NAME),
        })
    }

    // ===== 库存表 =====

    /// 库存行分类
    ///
    /// # 规则
    /// - 物料列非空且以产品代码前缀开头 → 表头行（优先）
    /// - 生产日期非空且可解析 → 明细行（数量空值按 0，批号空值为空串）
    /// - 其余 → 无法识别
    pub fn classify_inventory_row(&self, row: &RawRow, product_code_prefix: &str) -> InventoryRow {
        if let Some(code) = self.get_string(row, columns::MATERIAL) {
            if code.starts_with(product_code_prefix) {
                return InventoryRow::Header {
                    row_number: row.row_number,
                    product_code: code,
                    description: self
                        .get_string(row, columns::DESCRIPTION)
                        .unwrap_or_default(),
                };
            }
        }

        let production_date = self
            .get_string(row, columns::PRODUCTION_DATE)
            .and_then(|v| self.cleaner.parse_date(&v));

        match production_date {
            Some(production_date) => {
                let quantity = self.get_f64(row, columns::QUANTITY).unwrap_or(0.0);
                if quantity < 0.0 {
                    tracing::warn!(row = row.row_number, quantity, "明细行数量为负数，按无法识别行处理");
                    return InventoryRow::Unrecognized {
                        row_number: row.row_number,
                    };
                }
                InventoryRow::Detail {
                    row_number: row.row_number,
                    production_date,
                    quantity,
                    batch_number: self
                        .get_string(row, columns::BATCH_NUMBER)
                        .unwrap_or_default(),
                }
            }
            None => InventoryRow::Unrecognized {
                row_number: row.row_number,
            },
        }
    }

    fn require(&self, row: &RawRow, key: &str) -> ImportResult<String> {
        self.get_string(row, key)
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row.row_number,
                field: key.to_string(),
                message: "必填字段为空".to_string(),
            })
    }
}
