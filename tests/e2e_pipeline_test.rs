// ==========================================
// 分析流水线 端到端测试
// ==========================================
// 场景: 数据目录 → 加载 → 批次折叠 → 风险 → 准确率 / 增长 / TOP SKU
// ==========================================

mod helpers;

use helpers::test_data_builder::{analysis_day, analysis_now, csv_config, DataDirBuilder};
use inventory_alert::domain::types::{RiskTier, StockAction, Trend};
use inventory_alert::engine::AnalysisPipeline;
use inventory_alert::logging;

#[test]
fn test_full_pipeline_on_csv_inputs() {
    logging::init_test();
    let dir = DataDirBuilder::complete();
    let pipeline = AnalysisPipeline::new(csv_config());
    let report = pipeline.run_from_dir(dir.path(), analysis_now());

    assert!(report.warnings.is_empty());
    assert!(!report.used_sample_data());
    assert_eq!(report.analysis_date, analysis_day());
    assert_eq!(report.generated_at, analysis_now());

    // ===== 库存批次 =====
    assert_eq!(report.batches.len(), 3);
    let extreme = &report.batches[0];
    assert_eq!(extreme.batch.product_code, "F001");
    assert_eq!(extreme.batch.age_days, 130);
    assert_eq!(extreme.risk_tier, RiskTier::Extreme);
    assert!((extreme.expected_loss - 30.0).abs() < 1e-9);
    assert!((extreme.batch_value - 100.0).abs() < 1e-9);

    assert_eq!(report.batches[1].risk_tier, RiskTier::Minimal);
    assert_eq!(report.batches[2].risk_tier, RiskTier::High);
    assert!((report.batches[2].expected_loss - 20.0).abs() < 1e-9);

    let metrics = &report.inventory_metrics;
    assert_eq!(metrics.total_batches, 3);
    assert_eq!(metrics.high_risk_batches, 2);
    assert!((metrics.total_expected_loss - 50.0).abs() < 1e-9);

    // ===== 预测准确率 =====
    assert_eq!(report.accuracy.national.total_actual, 680.0);
    assert_eq!(report.accuracy.national.total_forecast, 380.0);
    assert_eq!(report.accuracy.by_region.len(), 2);

    // ===== 同比增长 =====
    // F001: 2025-04 窗口 150 vs 200 → -25%，调整幅度 12.5 四舍五入为 13
    let latest = &report.growth.latest;
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].product_code, "F001");
    assert_eq!(latest[0].period(), (2025, 4));
    assert!((latest[0].growth_rate_pct + 25.0).abs() < 1e-9);
    assert_eq!(latest[0].trend, Trend::SignificantDecline);
    assert_eq!(latest[0].recommendation, StockAction::DecreaseStock);
    assert_eq!(latest[0].adjustment_pct, 13);
    assert_eq!(report.growth.insufficient_history, vec!["F002".to_string()]);

    // ===== TOP SKU =====
    let by_volume: Vec<&str> = report
        .top_skus_by_volume
        .national
        .iter()
        .map(|r| r.product_code.as_str())
        .collect();
    assert_eq!(by_volume, vec!["F001"]);

    let by_value: Vec<&str> = report
        .top_skus_by_value
        .national
        .iter()
        .map(|r| r.product_code.as_str())
        .collect();
    assert_eq!(by_value, vec!["F001", "F002"]);
    assert_eq!(
        report.top_skus_by_value.national[0].product_name.as_deref(),
        Some("口力薄荷糖")
    );
}

#[test]
fn test_empty_directory_runs_on_sample_data() {
    let dir = DataDirBuilder::new();
    let report = AnalysisPipeline::new(csv_config()).run_from_dir(dir.path(), analysis_now());

    assert!(report.used_sample_data());
    assert_eq!(report.warnings.len(), 4);
    assert!(!report.batches.is_empty());
    assert!(report.inventory_metrics.count_of(RiskTier::Extreme) > 0);
    assert!(report.inventory_metrics.count_of(RiskTier::Minimal) > 0);
    assert!(!report.growth.latest.is_empty());
    assert!(!report.top_skus_by_volume.national.is_empty());
}

#[test]
fn test_product_info_overrides_names() {
    let dir = DataDirBuilder::complete().product_info("产品代码,产品名称\nF002,口力果味糖 80G\n");
    let report = AnalysisPipeline::new(csv_config()).run_from_dir(dir.path(), analysis_now());

    assert!(report.warnings.is_empty());
    assert_eq!(report.catalog.name("F002"), Some("口力果味糖 80G"));
    assert_eq!(report.catalog.name("F001"), Some("口力薄荷糖"));
}

#[test]
fn test_report_serializes_to_json() {
    let dir = DataDirBuilder::complete();
    let report = AnalysisPipeline::new(csv_config()).run_from_dir(dir.path(), analysis_now());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["batches"][0]["risk_tier"], "EXTREME");
    assert_eq!(json["batches"][0]["product_code"], "F001");
    assert!(json.get("actual_facts").is_none());
    assert_eq!(json["analysis_date"], "2025-02-21");
}

#[test]
fn test_single_header_with_three_aged_batches() {
    // 参考日期 2025-02-21：库龄 10 / 70 / 95 / 130 天
    let dir = DataDirBuilder::new()
        .prices("产品代码,单价\nF001,10\n")
        .inventory(
            "\
物料,描述,生产日期,生产批号,数量
F001,口力薄荷糖,,,
,,2025-02-11,B1,5
,,2024-12-13,B2,5
,,2024-11-18,B3,5
,,2024-10-14,B4,5
",
        );
    let report = AnalysisPipeline::new(csv_config()).run_from_dir(dir.path(), analysis_now());

    let ages: Vec<i64> = report.batches.iter().map(|b| b.batch.age_days).collect();
    assert_eq!(ages, vec![10, 70, 95, 130]);

    let tiers: Vec<RiskTier> = report.batches.iter().map(|b| b.risk_tier).collect();
    assert_eq!(
        tiers,
        vec![RiskTier::Minimal, RiskTier::Medium, RiskTier::High, RiskTier::Extreme]
    );

    let losses: Vec<f64> = report.batches.iter().map(|b| b.expected_loss).collect();
    for (loss, expected) in losses.iter().zip([0.0, 5.0, 10.0, 15.0]) {
        assert!((loss - expected).abs() < 1e-9);
    }
    assert!(report.batches.iter().all(|b| (b.batch_value - 50.0).abs() < 1e-9));
    assert!(report.batches.iter().all(|b| b.batch.product_code == "F001"));

    // 出货/预测表缺失时仍回退样例数据，库存分析不受影响
    assert!(report.used_sample_data());
}
