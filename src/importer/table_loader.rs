// ==========================================
// 智能库存预警分析系统 - 输入表加载器
// ==========================================
// 职责: 数据目录下的各输入文件 → LoadResult
// 红线: 单表失败（缺文件/缺列/空表/解析失败）只回退该表，
//       不中断整个分析；回退必须记录 warn 日志并可被调用方识别
// ==========================================

use crate::config::InputFiles;
use crate::domain::batch::InventoryRow;
use crate::domain::catalog::{PriceRecord, ProductInfoRecord};
use crate::domain::load::{LoadResult, LoadWarning};
use crate::domain::sales::{ForecastRecord, ShipmentRecord};
use crate::domain::types::InputTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{RawRow, RawTable};
use crate::importer::sample_data;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// 一次分析运行加载到的全部输入表
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub shipments: LoadResult<Vec<ShipmentRecord>>,
    pub forecasts: LoadResult<Vec<ForecastRecord>>,
    pub prices: LoadResult<Vec<PriceRecord>>,
    pub inventory: LoadResult<Vec<InventoryRow>>,
    pub product_info: LoadResult<Vec<ProductInfoRecord>>,
}

impl LoadedTables {
    /// 收集所有非正常加载的表（界面据此提示"使用了样例数据"）
    pub fn warnings(&self) -> Vec<LoadWarning> {
        [
            self.shipments.warning(InputTable::Shipment),
            self.forecasts.warning(InputTable::Forecast),
            self.prices.warning(InputTable::UnitPrice),
            self.inventory.warning(InputTable::Inventory),
            self.product_info.warning(InputTable::ProductInfo),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ==========================================
// TableLoader
// ==========================================
#[derive(Debug, Clone)]
pub struct TableLoader {
    data_dir: PathBuf,
    files: InputFiles,
    product_code_prefix: String,
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl TableLoader {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        files: InputFiles,
        product_code_prefix: impl Into<String>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            files,
            product_code_prefix: product_code_prefix.into(),
            parser: UniversalFileParser,
            mapper: FieldMapper::new(),
        }
    }

    /// 输入文件的完整路径（表类型, 路径）
    pub fn input_paths(&self) -> Vec<(InputTable, PathBuf)> {
        vec![
            (InputTable::Shipment, self.data_dir.join(&self.files.shipment)),
            (InputTable::Forecast, self.data_dir.join(&self.files.forecast)),
            (InputTable::UnitPrice, self.data_dir.join(&self.files.unit_price)),
            (InputTable::Inventory, self.data_dir.join(&self.files.inventory)),
            (InputTable::ProductInfo, self.data_dir.join(&self.files.product_info)),
        ]
    }

    /// 加载全部输入表
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    pub fn load_all(&self, today: NaiveDate) -> LoadedTables {
        let tables = LoadedTables {
            shipments: self.load_shipments(),
            forecasts: self.load_forecasts(),
            prices: self.load_prices(),
            inventory: self.load_inventory(today),
            product_info: self.load_product_info(),
        };
        tracing::info!(warnings = tables.warnings().len(), "输入表加载完成");
        tables
    }

    pub fn load_shipments(&self) -> LoadResult<Vec<ShipmentRecord>> {
        let path = self.data_dir.join(&self.files.shipment);
        with_fallback(
            InputTable::Shipment,
            self.read_records(InputTable::Shipment, &path, |row| self.mapper.map_shipment(row)),
            sample_data::sample_shipments,
        )
    }

    pub fn load_forecasts(&self) -> LoadResult<Vec<ForecastRecord>> {
        let path = self.data_dir.join(&self.files.forecast);
        with_fallback(
            InputTable::Forecast,
            self.read_records(InputTable::Forecast, &path, |row| self.mapper.map_forecast(row)),
            sample_data::sample_forecasts,
        )
    }

    pub fn load_prices(&self) -> LoadResult<Vec<PriceRecord>> {
        let path = self.data_dir.join(&self.files.unit_price);
        with_fallback(
            InputTable::UnitPrice,
            self.read_records(InputTable::UnitPrice, &path, |row| self.mapper.map_price(row)),
            sample_data::sample_prices,
        )
    }

    /// 库存表：返回分类后的行（折叠为批次需要单价表，由流水线完成）
    pub fn load_inventory(&self, today: NaiveDate) -> LoadResult<Vec<InventoryRow>> {
        let path = self.data_dir.join(&self.files.inventory);
        let result = self.read_table(InputTable::Inventory, &path).and_then(|raw| {
            let rows: Vec<InventoryRow> = raw
                .rows
                .iter()
                .map(|row| {
                    self.mapper
                        .classify_inventory_row(row, &self.product_code_prefix)
                })
                .collect();
            let has_header = rows
                .iter()
                .any(|r| matches!(r, InventoryRow::Header { .. }));
            if has_header {
                Ok(rows)
            } else {
                Err(ImportError::EmptyTable(InputTable::Inventory.label()))
            }
        });
        with_fallback(InputTable::Inventory, result, || {
            sample_data::sample_inventory_rows(today)
        })
    }

    /// 产品信息表（可选）：文件不存在 → 空表；文件存在但无法使用 → Fatal
    pub fn load_product_info(&self) -> LoadResult<Vec<ProductInfoRecord>> {
        let path = self.data_dir.join(&self.files.product_info);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "未提供产品信息表");
            return LoadResult::Ok(Vec::new());
        }

        match self.read_records(InputTable::ProductInfo, &path, |row| {
            self.mapper.map_product_info(row)
        }) {
            Ok(records) => LoadResult::Ok(records),
            Err(e) => {
                tracing::warn!(table = %InputTable::ProductInfo, error = %e, "产品信息表不可用");
                LoadResult::Fatal(e.to_string())
            }
        }
    }

    fn read_table(&self, table: InputTable, path: &Path) -> ImportResult<RawTable> {
        let raw = self.parser.parse(path)?;
        self.mapper.validate_columns(table, &raw)?;
        if raw.is_empty() {
            return Err(ImportError::EmptyTable(table.label()));
        }
        Ok(raw)
    }

    /// 读取并逐行映射；单行映射失败只跳过该行
    fn read_records<T, F>(&self, table: InputTable, path: &Path, map: F) -> ImportResult<Vec<T>>
    where
        F: Fn(&RawRow) -> ImportResult<T>,
    {
        let raw = self.read_table(table, path)?;

        let mut records = Vec::with_capacity(raw.rows.len());
        let mut skipped = 0usize;
        for row in &raw.rows {
            match map(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    tracing::debug!(table = %table, error = %e, "跳过格式错误的行");
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(table = %table, skipped, "部分行格式错误已跳过");
        }
        if records.is_empty() {
            return Err(ImportError::EmptyTable(table.label()));
        }

        tracing::info!(table = %table, rows = records.len(), path = %path.display(), "输入表加载成功");
        Ok(records)
    }
}

/// 表级失败 → 样例数据回退
fn with_fallback<T, F>(table: InputTable, result: ImportResult<T>, fallback: F) -> LoadResult<T>
where
    F: FnOnce() -> T,
{
    match result {
        Ok(data) => LoadResult::Ok(data),
        Err(e) => {
            tracing::warn!(table = %table, error = %e, "输入表加载失败，使用样例数据");
            LoadResult::Fallback {
                data: fallback(),
                reason: e.to_string(),
            }
        }
    }
}
