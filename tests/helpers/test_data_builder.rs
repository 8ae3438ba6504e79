// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use inventory_alert::config::{AnalysisConfig, InputFiles};
use inventory_alert::domain::batch::BatchRecord;
use inventory_alert::domain::sales::{ActualSalesFact, ForecastFact, YearMonth};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// 测试统一的参考日期（2025-02-21）
pub fn analysis_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 21).unwrap()
}

pub fn analysis_now() -> NaiveDateTime {
    analysis_day().and_hms_opt(9, 30, 0).unwrap()
}

pub fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

// ==========================================
// 月度事实
// ==========================================

pub fn actual(
    year_month: YearMonth,
    region: &str,
    salesperson: &str,
    product_code: &str,
    quantity: f64,
) -> ActualSalesFact {
    ActualSalesFact {
        year_month,
        region: region.to_string(),
        salesperson: salesperson.to_string(),
        product_code: product_code.to_string(),
        quantity,
    }
}

pub fn forecast(
    year_month: YearMonth,
    region: &str,
    salesperson: &str,
    product_code: &str,
    forecast_quantity: f64,
) -> ForecastFact {
    ForecastFact {
        year_month,
        region: region.to_string(),
        salesperson: salesperson.to_string(),
        product_code: product_code.to_string(),
        forecast_quantity,
    }
}

/// 同一产品在若干月份的实际销量（华东/张三）
pub fn monthly_actuals(product_code: &str, entries: &[(i32, u32, f64)]) -> Vec<ActualSalesFact> {
    entries
        .iter()
        .map(|(y, m, q)| actual(ym(*y, *m), "华东", "张三", product_code, *q))
        .collect()
}

// ==========================================
// BatchRecord 构建器
// ==========================================

pub struct BatchBuilder {
    product_code: String,
    product_name: String,
    age_days: i64,
    quantity: f64,
    unit_price: f64,
    batch_number: String,
    source_row: usize,
}

impl BatchBuilder {
    pub fn new(product_code: &str) -> Self {
        Self {
            product_code: product_code.to_string(),
            product_name: format!("{} 测试产品", product_code),
            age_days: 0,
            quantity: 1.0,
            unit_price: 100.0,
            batch_number: "B001".to_string(),
            source_row: 2,
        }
    }

    pub fn age_days(mut self, days: i64) -> Self {
        self.age_days = days;
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit_price(mut self, price: f64) -> Self {
        self.unit_price = price;
        self
    }

    pub fn batch_number(mut self, batch_number: &str) -> Self {
        self.batch_number = batch_number.to_string();
        self
    }

    pub fn source_row(mut self, row: usize) -> Self {
        self.source_row = row;
        self
    }

    pub fn build(self) -> BatchRecord {
        BatchRecord {
            product_code: self.product_code,
            product_name: self.product_name,
            production_date: analysis_day() - Duration::days(self.age_days),
            batch_number: self.batch_number,
            quantity: self.quantity,
            unit_price: self.unit_price,
            age_days: self.age_days,
            source_row: self.source_row,
        }
    }
}

// ==========================================
// 数据目录构建器（CSV 输入表）
// ==========================================

pub const SHIPMENT_FILE: &str = "出货数据.csv";
pub const FORECAST_FILE: &str = "人工预测.csv";
pub const PRICE_FILE: &str = "单价.csv";
pub const INVENTORY_FILE: &str = "含批次库存.csv";
pub const PRODUCT_INFO_FILE: &str = "产品信息.csv";

/// 指向 CSV 文件名的输入表配置
pub fn csv_input_files() -> InputFiles {
    InputFiles {
        shipment: SHIPMENT_FILE.to_string(),
        forecast: FORECAST_FILE.to_string(),
        unit_price: PRICE_FILE.to_string(),
        inventory: INVENTORY_FILE.to_string(),
        product_info: PRODUCT_INFO_FILE.to_string(),
    }
}

pub fn csv_config() -> AnalysisConfig {
    AnalysisConfig {
        files: csv_input_files(),
        ..AnalysisConfig::standard()
    }
}

pub struct DataDirBuilder {
    dir: TempDir,
}

impl DataDirBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(self, name: &str, content: &str) -> Self {
        fs::write(self.dir.path().join(name), content).unwrap();
        self
    }

    pub fn shipments(self, content: &str) -> Self {
        self.file(SHIPMENT_FILE, content)
    }

    pub fn forecasts(self, content: &str) -> Self {
        self.file(FORECAST_FILE, content)
    }

    pub fn prices(self, content: &str) -> Self {
        self.file(PRICE_FILE, content)
    }

    pub fn inventory(self, content: &str) -> Self {
        self.file(INVENTORY_FILE, content)
    }

    pub fn product_info(self, content: &str) -> Self {
        self.file(PRODUCT_INFO_FILE, content)
    }

    /// 四张必需表全部有效的数据目录
    pub fn complete() -> Self {
        Self::new()
            .shipments(SHIPMENT_CSV)
            .forecasts(FORECAST_CSV)
            .prices(PRICE_CSV)
            .inventory(INVENTORY_CSV)
    }

    pub fn into_temp_dir(self) -> TempDir {
        self.dir
    }
}

pub const SHIPMENT_CSV: &str = "\
订单日期,所属区域,申请人,产品代码,求和项:数量（箱）
2024-01-10,华东,张三,F001,100
2024-02-10,华东,张三,F001,100
2024-03-10,华东,张三,F001,100
2025-01-10,华东,张三,F001,150
2025-01-20,华南,李四,F002,50
2025-02-10,华东,张三,F001,150
2025-02-15,华南,李四,F002,30
";

pub const FORECAST_CSV: &str = "\
所属大区,销售员,所属年月,产品代码,预计销售量
华东,张三,2025-01,F001,120
华南,李四,2025-01,F002,50
华东,张三,2025-02,F001,150
华南,李四,2025-02,F002,60
";

pub const PRICE_CSV: &str = "\
产品代码,单价
F001,10
F002,25
";

// 参考日期 2025-02-21：2024-10-14 库龄 130 天，2025-02-11 库龄 10 天
pub const INVENTORY_CSV: &str = "\
物料,描述,生产日期,生产批号,数量
F001,口力薄荷糖,,,
,,2024-10-14,B1,10
,,2025-02-11,B2,5
F002,口力果味糖,,,
,,2024-11-23,B3,4
";
