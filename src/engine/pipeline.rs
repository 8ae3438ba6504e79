// ==========================================
// 智能库存预警分析系统 - 分析流水线
// ==========================================
// 职责: 编排一次完整分析
//   输入表 → 库存批次折叠 → 库龄风险 → 关键指标
//   出货/预测 → 月度事实 → 准确率 / 同比增长 / TOP SKU
// 红线: 参考时间 now 每次运行只取一次；各阶段只产出新表，不原地修改输入
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::accuracy::AccuracyReport;
use crate::domain::batch::RiskAssessedBatch;
use crate::domain::catalog::{ProductCatalog, UnitPriceTable};
use crate::domain::growth::GrowthReport;
use crate::domain::load::LoadWarning;
use crate::domain::metrics::InventoryMetrics;
use crate::domain::sales::ActualSalesFact;
use crate::domain::top_sku::TopSkuReport;
use crate::domain::types::TopSkuMetric;
use crate::engine::aging_risk::AgingRiskClassifier;
use crate::engine::forecast_accuracy::{self, ForecastAccuracyEngine};
use crate::engine::growth_rate::GrowthRateAnalyzer;
use crate::engine::inventory_metrics::InventoryMetricsEngine;
use crate::engine::top_sku::TopSkuSelector;
use crate::importer::inventory_parser::{InventoryParseStats, SpreadsheetRecordParser};
use crate::importer::table_loader::{LoadedTables, TableLoader};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::Path;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// AnalysisReport - 一次分析运行的全部输出
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// 运行标识
    pub run_id: String,

    /// 本次运行统一的参考时间
    pub generated_at: NaiveDateTime,

    /// 库龄计算的参考日期
    pub analysis_date: NaiveDate,

    /// 加载告警（哪些表使用了样例数据 / 不可用）
    pub warnings: Vec<LoadWarning>,

    /// 风险标注后的批次（原表顺序）
    pub batches: Vec<RiskAssessedBatch>,
    pub parse_stats: InventoryParseStats,
    pub inventory_metrics: InventoryMetrics,

    /// 产品名称映射
    pub catalog: ProductCatalog,

    pub accuracy: AccuracyReport,
    pub growth: GrowthReport,
    pub top_skus_by_volume: TopSkuReport,
    pub top_skus_by_value: TopSkuReport,

    /// 月度实际销量事实（区域增长等二次查询使用）
    #[serde(skip_serializing)]
    pub actual_facts: Vec<ActualSalesFact>,

    #[serde(skip_serializing)]
    pub prices: UnitPriceTable,
}

impl AnalysisReport {
    pub fn used_sample_data(&self) -> bool {
        self.warnings.iter().any(|w| w.used_sample_data)
    }
}

// ==========================================
// AnalysisPipeline
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 数据目录对应的加载器
    pub fn loader<P: AsRef<Path>>(&self, data_dir: P) -> TableLoader {
        TableLoader::new(
            data_dir.as_ref(),
            self.config.files.clone(),
            self.config.product_code_prefix.clone(),
        )
    }

    /// 从数据目录加载并分析
    pub fn run_from_dir<P: AsRef<Path>>(&self, data_dir: P, now: NaiveDateTime) -> AnalysisReport {
        let tables = self.loader(data_dir).load_all(now.date());
        self.run(&tables, now)
    }

    /// 对已加载的输入表执行分析
    #[instrument(skip(self, tables))]
    pub fn run(&self, tables: &LoadedTables, now: NaiveDateTime) -> AnalysisReport {
        let today = now.date();
        let warnings = tables.warnings();
        for warning in &warnings {
            tracing::warn!(
                table = %warning.table,
                used_sample_data = warning.used_sample_data,
                reason = %warning.reason,
                "输入表未正常加载"
            );
        }

        // 1. 单价表 + 库存批次折叠
        let prices = UnitPriceTable::from_records(
            tables.prices.data().map(Vec::as_slice).unwrap_or_default(),
        );
        let inventory_rows = tables.inventory.data().map(Vec::as_slice).unwrap_or_default();
        let parsed = SpreadsheetRecordParser::new(
            self.config.product_code_prefix.as_str(),
            self.config.default_unit_price,
        )
        .parse(inventory_rows, &prices, today);

        let mut catalog = parsed.catalog;
        if let Some(info) = tables.product_info.data() {
            catalog.merge_info(info);
        }

        // 2. 库龄风险 + 关键指标
        let batches = AgingRiskClassifier::new(self.config.risk.clone()).assess_batches(parsed.batches);
        let inventory_metrics = InventoryMetricsEngine::new().compute(&batches);

        // 3. 出货/预测 → 月度事实
        let actual_facts = forecast_accuracy::actual_facts(
            tables.shipments.data().map(Vec::as_slice).unwrap_or_default(),
        );
        let forecast_facts = forecast_accuracy::forecast_facts(
            tables.forecasts.data().map(Vec::as_slice).unwrap_or_default(),
        );

        // 4. 准确率 / 同比增长 / TOP SKU
        let accuracy = ForecastAccuracyEngine::new(self.config.accuracy.clone())
            .report(&actual_facts, &forecast_facts);
        let growth = GrowthRateAnalyzer::new(self.config.growth.clone()).analyze(&actual_facts, None);

        let selector = TopSkuSelector::new(self.config.top_sku.clone());
        let top_skus_by_volume = selector.report(
            &actual_facts,
            TopSkuMetric::Volume,
            &prices,
            self.config.default_unit_price,
            &catalog,
        );
        let top_skus_by_value = selector.report(
            &actual_facts,
            TopSkuMetric::Value,
            &prices,
            self.config.default_unit_price,
            &catalog,
        );

        let report = AnalysisReport {
            run_id: Uuid::new_v4().to_string(),
            generated_at: now,
            analysis_date: today,
            warnings,
            batches,
            parse_stats: parsed.stats,
            inventory_metrics,
            catalog,
            accuracy,
            growth,
            top_skus_by_volume,
            top_skus_by_value,
            actual_facts,
            prices,
        };

        tracing::info!(
            run_id = %report.run_id,
            batches = report.batches.len(),
            warnings = report.warnings.len(),
            "分析运行完成"
        );
        report
    }
}
