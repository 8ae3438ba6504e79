// ==========================================
// 智能库存预警分析系统 - 引擎层
// ==========================================
// 职责: 实现分析规则,不做文件读取
// 红线: 引擎均为纯计算，输出新表，不修改输入
// ==========================================

pub mod aging_risk;
pub mod cache;
pub mod forecast_accuracy;
pub mod growth_rate;
pub mod inventory_metrics;
pub mod pipeline;
pub mod top_sku;

// 重导出核心引擎
pub use aging_risk::AgingRiskClassifier;
pub use cache::{fingerprint_inputs, AnalysisCache, CacheKey, CacheStats};
pub use forecast_accuracy::{
    accuracy, actual_facts, difference_rate, forecast_facts, mean_accuracy,
    ForecastAccuracyEngine,
};
pub use growth_rate::GrowthRateAnalyzer;
pub use inventory_metrics::InventoryMetricsEngine;
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use top_sku::TopSkuSelector;
