// ==========================================
// 智能库存预警分析系统 - 固定样例数据
// ==========================================
// 职责: 某张输入表加载失败时的回退数据集
// 约定: 完全确定性（同一参考日期生成相同数据），调用方必须通过
//       LoadResult::Fallback 告知界面该表使用了样例数据
// ==========================================

use crate::domain::batch::InventoryRow;
use crate::domain::catalog::PriceRecord;
use crate::domain::sales::{ForecastRecord, ShipmentRecord, YearMonth};
use chrono::{Duration, NaiveDate};

const PRODUCTS: [(&str, &str, f64); 6] = [
    ("F0101", "原味口香糖", 12.5),
    ("F0102", "薄荷口香糖", 18.0),
    ("F0103", "水果软糖", 25.0),
    ("F0104", "棒棒糖", 9.8),
    ("F0105", "巧克力豆", 30.0),
    ("F0106", "礼盒装", 45.0),
];

const PRODUCT_BASE_QTY: [f64; 6] = [120.0, 90.0, 60.0, 40.0, 25.0, 10.0];

const REGIONS: [(&str, &str, f64); 4] = [
    ("华东", "张三", 4.0),
    ("华南", "李四", 3.0),
    ("华北", "王五", 2.0),
    ("西南", "赵六", 1.0),
];

/// 出货样例覆盖的月份（跨两年，保证同比增长可计算）
const SHIPMENT_MONTHS: (YearMonth, YearMonth) = (
    YearMonth { year: 2023, month: 9 },
    YearMonth { year: 2025, month: 2 },
);

/// 预测样例覆盖的月份
const FORECAST_MONTHS: (YearMonth, YearMonth) = (
    YearMonth { year: 2024, month: 9 },
    YearMonth { year: 2025, month: 2 },
);

/// 库存样例：(产品序号, 库龄天数, 数量)
const INVENTORY_BATCHES: [(usize, i64, f64); 12] = [
    (0, 10, 80.0),
    (0, 45, 60.0),
    (0, 130, 20.0),
    (1, 20, 50.0),
    (1, 75, 40.0),
    (2, 95, 30.0),
    (2, 5, 70.0),
    (3, 65, 90.0),
    (4, 150, 15.0),
    (4, 35, 25.0),
    (5, 25, 12.0),
    (5, 100, 8.0),
];

fn months_between(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut current = start;
    while current <= end {
        months.push(current);
        current = if current.month == 12 {
            YearMonth {
                year: current.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: current.year,
                month: current.month + 1,
            }
        };
    }
    months
}

/// 确定性的月度销量：产品基数 × 区域权重 + 季节波动，2024 年起上浮 10%
fn sample_quantity(product_idx: usize, region_idx: usize, ym: YearMonth) -> f64 {
    let base = PRODUCT_BASE_QTY[product_idx] * REGIONS[region_idx].2;
    let seasonal = f64::from(ym.month % 4) * 5.0;
    let growth = if ym.year >= 2024 { 1.1 } else { 1.0 };
    ((base + seasonal) * growth).round()
}

/// 出货样例（每月 15 日一条汇总订单）
pub fn sample_shipments() -> Vec<ShipmentRecord> {
    let mut records = Vec::new();
    for ym in months_between(SHIPMENT_MONTHS.0, SHIPMENT_MONTHS.1) {
        let Some(order_date) = NaiveDate::from_ymd_opt(ym.year, ym.month, 15) else {
            continue;
        };
        for (region_idx, (region, salesperson, _)) in REGIONS.iter().enumerate() {
            for (product_idx, (code, _, _)) in PRODUCTS.iter().enumerate() {
                records.push(ShipmentRecord {
                    order_date,
                    region: region.to_string(),
                    salesperson: salesperson.to_string(),
                    product_code: code.to_string(),
                    quantity: sample_quantity(product_idx, region_idx, ym),
                });
            }
        }
    }
    records
}

/// 预测样例（在实际销量基础上做 -20% ~ +20% 的确定性偏差）
pub fn sample_forecasts() -> Vec<ForecastRecord> {
    let mut records = Vec::new();
    for ym in months_between(FORECAST_MONTHS.0, FORECAST_MONTHS.1) {
        for (region_idx, (region, salesperson, _)) in REGIONS.iter().enumerate() {
            for (product_idx, (code, _, _)) in PRODUCTS.iter().enumerate() {
                let offset = ((product_idx + region_idx + ym.month as usize) % 5) as f64 - 2.0;
                let actual = sample_quantity(product_idx, region_idx, ym);
                records.push(ForecastRecord {
                    year_month: ym,
                    region: region.to_string(),
                    salesperson: salesperson.to_string(),
                    product_code: code.to_string(),
                    forecast_quantity: (actual * (1.0 + offset * 0.1)).round(),
                });
            }
        }
    }
    records
}

/// 单价样例
pub fn sample_prices() -> Vec<PriceRecord> {
    PRODUCTS
        .iter()
        .map(|(code, _, price)| PriceRecord {
            product_code: code.to_string(),
            unit_price: *price,
        })
        .collect()
}

/// 库存样例（生产日期相对参考日期生成，保证各风险等级都有批次）
pub fn sample_inventory_rows(today: NaiveDate) -> Vec<InventoryRow> {
    let mut rows = Vec::new();
    let mut row_number = 2;
    let mut last_product: Option<usize> = None;

    for (product_idx, age_days, quantity) in INVENTORY_BATCHES {
        if last_product != Some(product_idx) {
            let (code, name, _) = PRODUCTS[product_idx];
            rows.push(InventoryRow::Header {
                row_number,
                product_code: code.to_string(),
                description: name.to_string(),
            });
            row_number += 1;
            last_product = Some(product_idx);
        }

        rows.push(InventoryRow::Detail {
            row_number,
            production_date: today - Duration::days(age_days),
            quantity,
            batch_number: format!("SAMPLE-{:03}", row_number),
        });
        row_number += 1;
    }
    rows
}
