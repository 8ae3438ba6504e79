// ==========================================
// 智能库存预警分析系统 - 看板 API
// ==========================================
// 职责: 展示层唯一入口；封装分析流水线与结果缓存
// 架构: 展示层 → DashboardApi → AnalysisPipeline → 各引擎
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AnalysisConfig, ConfigManager};
use crate::domain::batch::{BatchFilter, RiskAssessedBatch};
use crate::domain::growth::GrowthReport;
use crate::domain::types::{InputTable, RiskTier};
use crate::engine::cache::{fingerprint_inputs, AnalysisCache, CacheKey, CacheStats};
use crate::engine::growth_rate::GrowthRateAnalyzer;
use crate::engine::inventory_metrics::InventoryMetricsEngine;
use crate::engine::pipeline::{AnalysisPipeline, AnalysisReport};
use crate::importer::{FieldMapper, UniversalFileParser};

/// 风险等级说明（图例用）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskTierLegend {
    pub risk_tier: RiskTier,
    pub label: String,
    pub advice: String,
}

/// 输入表预检结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub table: InputTable,
    pub path: String,
    pub headers: Vec<String>,
    pub row_count: usize,
}

// ==========================================
// DashboardApi
// ==========================================
pub struct DashboardApi {
    data_dir: PathBuf,
    pipeline: AnalysisPipeline,
    cache: Mutex<AnalysisCache>,
}

impl DashboardApi {
    /// 创建看板 API
    ///
    /// # 参数
    /// - data_dir: 输入报表所在目录（不存在时各表回退为样例数据）
    /// - config: 分析参数
    pub fn new<P: AsRef<Path>>(data_dir: P, config: AnalysisConfig) -> ApiResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if data_dir.is_file() {
            return Err(ApiError::InvalidInput(format!(
                "数据目录不能是文件: {}",
                data_dir.display()
            )));
        }
        if !data_dir.exists() {
            tracing::warn!(data_dir = %data_dir.display(), "数据目录不存在，所有输入表将使用样例数据");
        }

        Ok(Self {
            data_dir,
            pipeline: AnalysisPipeline::new(config),
            cache: Mutex::new(AnalysisCache::new()),
        })
    }

    pub fn from_config_manager<P: AsRef<Path>>(data_dir: P, manager: &ConfigManager) -> ApiResult<Self> {
        Self::new(data_dir, manager.to_analysis_config())
    }

    /// 从配置文件创建
    pub fn from_config_file<P: AsRef<Path>, Q: AsRef<Path>>(
        data_dir: P,
        config_path: Q,
    ) -> ApiResult<Self> {
        let manager = ConfigManager::from_file(config_path)?;
        Self::from_config_manager(data_dir, &manager)
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.pipeline.config()
    }

    fn lock_cache(&self) -> ApiResult<MutexGuard<'_, AnalysisCache>> {
        self.cache
            .lock()
            .map_err(|e| ApiError::InternalError(format!("分析缓存锁异常: {}", e)))
    }

    fn cache_key(&self, now: NaiveDateTime) -> CacheKey {
        let inputs = self.pipeline.loader(&self.data_dir).input_paths();
        CacheKey::new(
            fingerprint_inputs(&inputs, self.config()),
            now.date(),
            crate::i18n::current_locale(),
        )
    }

    // ==========================================
    // 分析运行
    // ==========================================

    /// 执行分析（同一输入、同一日期命中缓存）
    ///
    /// # 参数
    /// - now: 调用方捕获的参考时间（整次运行统一）
    pub fn analyze(&self, now: NaiveDateTime) -> ApiResult<Arc<AnalysisReport>> {
        let key = self.cache_key(now);
        if let Some(report) = self.lock_cache()?.get(&key) {
            return Ok(report);
        }

        let report = self.pipeline.run_from_dir(&self.data_dir, now);
        Ok(self.lock_cache()?.insert(key, report))
    }

    /// 忽略缓存重新分析（"刷新数据"）
    pub fn refresh(&self, now: NaiveDateTime) -> ApiResult<Arc<AnalysisReport>> {
        self.lock_cache()?.clear();
        self.analyze(now)
    }

    pub fn cache_stats(&self) -> ApiResult<CacheStats> {
        Ok(self.lock_cache()?.stats())
    }

    // ==========================================
    // 二次查询（基于已计算的报告）
    // ==========================================

    /// 批次明细筛选
    pub fn list_batches(&self, report: &AnalysisReport, filter: &BatchFilter) -> ApiResult<Vec<RiskAssessedBatch>> {
        if let Some(min_value) = filter.min_value {
            if !min_value.is_finite() || min_value < 0.0 {
                return Err(ApiError::InvalidInput(format!("最小批次价值无效: {}", min_value)));
            }
        }
        if filter.max_age_days.is_some_and(|d| d < 0) {
            return Err(ApiError::InvalidInput("最大库龄不能为负数".to_string()));
        }
        Ok(InventoryMetricsEngine::new().filter_and_sort(&report.batches, filter))
    }

    /// 高风险批次（按预期损失降序）
    pub fn high_risk_batches(&self, report: &AnalysisReport) -> Vec<RiskAssessedBatch> {
        InventoryMetricsEngine::new().high_risk_batches(&report.batches)
    }

    /// 报告中出现的全部区域（升序）
    pub fn regions(&self, report: &AnalysisReport) -> Vec<String> {
        let mut regions: Vec<String> = report
            .actual_facts
            .iter()
            .map(|f| f.region.clone())
            .collect();
        regions.sort();
        regions.dedup();
        regions
    }

    /// 指定区域子集的同比增长
    pub fn regional_growth(&self, report: &AnalysisReport, regions: &[String]) -> ApiResult<GrowthReport> {
        if regions.is_empty() {
            return Err(ApiError::InvalidInput("区域列表不能为空".to_string()));
        }
        let known = self.regions(report);
        if let Some(unknown) = regions.iter().find(|r| !known.contains(*r)) {
            return Err(ApiError::InvalidInput(format!("未知区域: {}", unknown)));
        }

        Ok(GrowthRateAnalyzer::new(self.config().growth.clone())
            .analyze(&report.actual_facts, Some(regions)))
    }

    /// 风险等级图例（严重程度降序）
    pub fn risk_tier_legend(&self) -> Vec<RiskTierLegend> {
        RiskTier::BY_SEVERITY_DESC
            .iter()
            .map(|tier| RiskTierLegend {
                risk_tier: *tier,
                label: tier.label(),
                advice: tier.advice(),
            })
            .collect()
    }

    /// 输入表预检：解析表头并校验必需列
    pub fn inspect_table(&self, table: InputTable) -> ApiResult<TablePreview> {
        let path = self
            .pipeline
            .loader(&self.data_dir)
            .input_paths()
            .into_iter()
            .find(|(t, _)| *t == table)
            .map(|(_, p)| p)
            .ok_or_else(|| ApiError::InternalError(format!("未配置输入表: {}", table)))?;

        let raw = UniversalFileParser.parse(&path)?;
        FieldMapper::new().validate_columns(table, &raw)?;

        Ok(TablePreview {
            table,
            path: path.display().to_string(),
            headers: raw.headers,
            row_count: raw.rows.len(),
        })
    }
}
