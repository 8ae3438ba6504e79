// ==========================================
// 智能库存预警分析系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod accuracy;
pub mod batch;
pub mod catalog;
pub mod growth;
pub mod load;
pub mod metrics;
pub mod sales;
pub mod top_sku;
pub mod types;

// 重导出核心类型
pub use accuracy::{
    AccuracyReport, AccuracySummary, EntityAverageAccuracy, GroupBy, GroupKey, MergedAccuracyRow,
};
pub use batch::{BatchFilter, BatchRecord, InventoryRow, RiskAssessedBatch, RiskAssessment};
pub use catalog::{PriceRecord, ProductCatalog, ProductInfoRecord, UnitPriceTable};
pub use growth::{GrowthReport, ProductGrowthRow};
pub use load::{LoadResult, LoadWarning};
pub use metrics::{InventoryMetrics, RiskTierStat};
pub use sales::{ActualSalesFact, ForecastFact, ForecastRecord, ShipmentRecord, YearMonth};
pub use top_sku::{RankedProduct, TopSkuReport, TopSkuRow};
pub use types::{AccuracyBand, InputTable, RiskTier, StockAction, TopSkuMetric, Trend};
