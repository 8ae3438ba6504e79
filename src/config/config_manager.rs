// ==========================================
// 智能库存预警分析系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 文件（扁平 key-value，值均为字符串）
// ==========================================

use crate::config::analysis_config::{
    AccuracyTargets, AnalysisConfig, GrowthConfig, InputFiles, RiskThresholds, TopSkuConfig,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载
    ///
    /// # 格式
    /// 扁平对象；数值/布尔值会被转为字符串保存，嵌套对象/数组忽略
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut values = HashMap::new();
        for (key, value) in parsed {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    tracing::warn!(config_key = %key, "配置值不是标量，忽略");
                    continue;
                }
            };
            values.insert(key, text);
        }

        tracing::info!(path = %path.display(), count = values.len(), "配置文件加载完成");
        Ok(Self { values })
    }

    /// 加载用户目录下的默认配置（不存在则全部取默认值）
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                tracing::debug!("未找到默认配置文件，使用内置默认值");
                Ok(Self::new())
            }
        }
    }

    /// 覆写单个配置项
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn get_config_value(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// 读取并解析配置值；解析失败时告警并取默认值
    fn get_parsed<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                default
            }),
        }
    }

    // ===== 库龄风险配置 =====

    pub fn get_risk_thresholds(&self) -> RiskThresholds {
        let defaults = RiskThresholds::default();
        let thresholds = RiskThresholds {
            extreme_days: self.get_parsed(config_keys::RISK_EXTREME_DAYS, defaults.extreme_days),
            high_days: self.get_parsed(config_keys::RISK_HIGH_DAYS, defaults.high_days),
            medium_days: self.get_parsed(config_keys::RISK_MEDIUM_DAYS, defaults.medium_days),
            low_days: self.get_parsed(config_keys::RISK_LOW_DAYS, defaults.low_days),
            loss_rate_extreme: self
                .get_parsed(config_keys::LOSS_RATE_EXTREME, defaults.loss_rate_extreme),
            loss_rate_high: self.get_parsed(config_keys::LOSS_RATE_HIGH, defaults.loss_rate_high),
            loss_rate_medium: self
                .get_parsed(config_keys::LOSS_RATE_MEDIUM, defaults.loss_rate_medium),
        };

        if thresholds.is_valid() {
            thresholds
        } else {
            tracing::warn!(?thresholds, "库龄阈值配置不单调，使用默认阈值");
            defaults
        }
    }

    pub fn get_default_unit_price(&self) -> f64 {
        let price: f64 = self.get_parsed(config_keys::DEFAULT_UNIT_PRICE, 100.0);
        if price.is_finite() && price > 0.0 {
            price
        } else {
            tracing::warn!(price, "默认单价必须为正数，使用 100");
            100.0
        }
    }

    pub fn get_product_code_prefix(&self) -> String {
        self.get_config_or_default(config_keys::PRODUCT_CODE_PREFIX, "F")
    }

    // ===== 同比增长配置 =====

    pub fn get_growth_config(&self) -> GrowthConfig {
        let defaults = GrowthConfig::default();
        let min_rate_pct = self.get_parsed(config_keys::GROWTH_RATE_MIN, defaults.min_rate_pct);
        let max_rate_pct = self.get_parsed(config_keys::GROWTH_RATE_MAX, defaults.max_rate_pct);
        let decline_divisor =
            self.get_parsed(config_keys::DECLINE_DIVISOR, defaults.decline_divisor);

        let config = GrowthConfig {
            min_rate_pct,
            max_rate_pct,
            decline_divisor,
        };
        if !config.is_valid() {
            tracing::warn!(
                min_rate_pct,
                max_rate_pct,
                decline_divisor,
                "增长率配置无效，使用默认值"
            );
            return defaults;
        }
        config
    }

    // ===== TOP SKU 配置 =====

    pub fn get_top_sku_config(&self) -> TopSkuConfig {
        let defaults = TopSkuConfig::default();
        let threshold_pct = self.get_parsed(config_keys::TOP_SKU_THRESHOLD_PCT, defaults.threshold_pct);
        TopSkuConfig {
            threshold_pct: if threshold_pct > 0.0 && threshold_pct <= 100.0 {
                threshold_pct
            } else {
                defaults.threshold_pct
            },
            min_national: self.get_parsed(config_keys::TOP_SKU_MIN_NATIONAL, defaults.min_national),
            min_regional: self.get_parsed(config_keys::TOP_SKU_MIN_REGIONAL, defaults.min_regional),
        }
    }

    // ===== 准确率目标 =====

    pub fn get_accuracy_targets(&self) -> AccuracyTargets {
        let defaults = AccuracyTargets::default();
        AccuracyTargets {
            target_pct: self.get_parsed(config_keys::ACCURACY_TARGET_PCT, defaults.target_pct),
            warning_pct: self.get_parsed(config_keys::ACCURACY_WARNING_PCT, defaults.warning_pct),
            top_products: self.get_parsed(config_keys::ACCURACY_TOP_PRODUCTS, defaults.top_products),
        }
    }

    // ===== 输入文件 =====

    pub fn get_input_files(&self) -> InputFiles {
        let defaults = InputFiles::default();
        InputFiles {
            shipment: self.get_config_or_default(config_keys::SHIPMENT_FILE, &defaults.shipment),
            forecast: self.get_config_or_default(config_keys::FORECAST_FILE, &defaults.forecast),
            unit_price: self.get_config_or_default(config_keys::PRICE_FILE, &defaults.unit_price),
            inventory: self.get_config_or_default(config_keys::INVENTORY_FILE, &defaults.inventory),
            product_info: self
                .get_config_or_default(config_keys::PRODUCT_INFO_FILE, &defaults.product_info),
        }
    }

    /// 生成本次分析的参数快照
    pub fn to_analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            risk: self.get_risk_thresholds(),
            default_unit_price: self.get_default_unit_price(),
            product_code_prefix: self.get_product_code_prefix(),
            growth: self.get_growth_config(),
            top_sku: self.get_top_sku_config(),
            accuracy: self.get_accuracy_targets(),
            files: self.get_input_files(),
        }
    }
}

/// 默认配置文件路径: <系统配置目录>/inventory-alert/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("inventory-alert").join("config.json"))
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 库龄风险
    pub const RISK_EXTREME_DAYS: &str = "risk_extreme_days";
    pub const RISK_HIGH_DAYS: &str = "risk_high_days";
    pub const RISK_MEDIUM_DAYS: &str = "risk_medium_days";
    pub const RISK_LOW_DAYS: &str = "risk_low_days";
    pub const LOSS_RATE_EXTREME: &str = "loss_rate_extreme";
    pub const LOSS_RATE_HIGH: &str = "loss_rate_high";
    pub const LOSS_RATE_MEDIUM: &str = "loss_rate_medium";
    pub const DEFAULT_UNIT_PRICE: &str = "default_unit_price";

    // 库存表解析
    pub const PRODUCT_CODE_PREFIX: &str = "product_code_prefix";

    // 同比增长
    pub const GROWTH_RATE_MIN: &str = "growth_rate_min";
    pub const GROWTH_RATE_MAX: &str = "growth_rate_max";
    pub const DECLINE_DIVISOR: &str = "decline_divisor";

    // TOP SKU
    pub const TOP_SKU_THRESHOLD_PCT: &str = "top_sku_threshold_pct";
    pub const TOP_SKU_MIN_NATIONAL: &str = "top_sku_min_national";
    pub const TOP_SKU_MIN_REGIONAL: &str = "top_sku_min_regional";

    // 预测准确率
    pub const ACCURACY_TARGET_PCT: &str = "accuracy_target_pct";
    pub const ACCURACY_WARNING_PCT: &str = "accuracy_warning_pct";
    pub const ACCURACY_TOP_PRODUCTS: &str = "accuracy_top_products";

    // 输入文件
    pub const SHIPMENT_FILE: &str = "shipment_file";
    pub const FORECAST_FILE: &str = "forecast_file";
    pub const PRICE_FILE: &str = "price_file";
    pub const INVENTORY_FILE: &str = "inventory_file";
    pub const PRODUCT_INFO_FILE: &str = "product_info_file";
}
