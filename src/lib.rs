// ==========================================
// 智能库存预警分析系统 - 核心库
// ==========================================
// 职责: 库龄风险分级 + 销售预测准确率 + 同比增长 + 重点SKU
// 系统定位: 决策支持系统（只读分析，不回写任何数据源）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分析规则
pub mod engine;

// 导入层 - 外部报表
pub mod importer;

// 配置层 - 分析参数
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 看板接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AccuracyBand, InputTable, RiskTier, StockAction, TopSkuMetric, Trend};

// 领域实体
pub use domain::{
    AccuracyReport, BatchFilter, BatchRecord, GrowthReport, InventoryMetrics, LoadResult,
    LoadWarning, RiskAssessedBatch, TopSkuReport, YearMonth,
};

// 引擎
pub use engine::{
    AgingRiskClassifier, AnalysisCache, AnalysisPipeline, AnalysisReport, ForecastAccuracyEngine,
    GrowthRateAnalyzer, InventoryMetricsEngine, TopSkuSelector,
};

// 配置
pub use config::{AnalysisConfig, ConfigManager};

// API
pub use api::{ApiError, ApiResult, DashboardApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "智能库存预警分析系统";
