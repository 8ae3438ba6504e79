// ==========================================
// 智能库存预警分析系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持文件覆写
// 存储: JSON 配置文件（缺省时全部取默认值）
// ==========================================

pub mod analysis_config;
pub mod config_manager;

// 重导出核心配置管理器
pub use analysis_config::{
    AccuracyTargets, AnalysisConfig, GrowthConfig, InputFiles, RiskThresholds, TopSkuConfig,
};
pub use config_manager::{config_keys, default_config_path, ConfigError, ConfigManager};
