// ==========================================
// 智能库存预警分析系统 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析 / 日期解析（含 Excel 序列日期）
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Excel 序列日期起点（1900 日期系统，已包含 1900-02-29 偏差修正）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 可识别为日期的 Excel 序列范围（约 1954 ~ 2119 年）
const EXCEL_SERIAL_RANGE: std::ops::RangeInclusive<f64> = 20000.0..=80000.0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d", "%Y年%m月%d日"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    /// 空串与常见空值占位符统一为 None
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            match trimmed {
                "" | "-" | "NaN" | "nan" | "NULL" | "null" | "None" | "#N/A" => None,
                _ => Some(trimmed.to_string()),
            }
        })
    }

    /// 解析数值（容忍千分位逗号）
    pub fn parse_f64(&self, value: &str) -> Option<f64> {
        let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 解析日期，支持常见文本格式与 Excel 序列日期
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Some(date);
            }
        }
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(dt.date());
            }
        }

        value
            .parse::<f64>()
            .ok()
            .filter(|serial| EXCEL_SERIAL_RANGE.contains(serial))
            .and_then(|serial| self.excel_serial_to_datetime(serial))
            .map(|dt| dt.date())
    }

    /// Excel 序列值 → 日期时间
    pub fn excel_serial_to_datetime(&self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let (y, m, d) = EXCEL_EPOCH;
        let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
        let days = serial.trunc() as i64;
        let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
        epoch
            .checked_add_signed(Duration::days(days))?
            .checked_add_signed(Duration::seconds(seconds))
    }
}
