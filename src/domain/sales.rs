// ==========================================
// 智能库存预警分析系统 - 销售与预测实体
// ==========================================
// 职责: 年月 / 出货明细 / 预测明细 / 月度事实
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// YearMonth - 年月（不含日）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// 构造年月，月份不在 1..=12 时返回 None
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 解析 "YYYY-MM" / "YYYY/MM" / "YYYYMM" / "YYYY-MM-DD"
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let digits_only: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
        let parts: Vec<&str> = value
            .split(|c: char| c == '-' || c == '/' || c == '.' || c == ' ')
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() >= 2 {
            let year = parts[0].parse::<i32>().ok()?;
            let month = parts[1].parse::<u32>().ok()?;
            return Self::new(year, month);
        }

        if digits_only.len() == 6 && digits_only.len() == value.len() {
            let year = digits_only[..4].parse::<i32>().ok()?;
            let month = digits_only[4..].parse::<u32>().ok()?;
            return Self::new(year, month);
        }

        None
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// ShipmentRecord - 出货明细（订单日期粒度）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub order_date: NaiveDate,
    pub region: String,
    /// 申请人/销售员
    pub salesperson: String,
    pub product_code: String,
    /// 数量（箱）
    pub quantity: f64,
}

// ==========================================
// ForecastRecord - 人工预测明细
// ==========================================
// 源表区域列为"所属大区"，导入时统一改名为 region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub year_month: YearMonth,
    pub region: String,
    pub salesperson: String,
    pub product_code: String,
    pub forecast_quantity: f64,
}

// ==========================================
// ActualSalesFact - 月度实际销量事实
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualSalesFact {
    pub year_month: YearMonth,
    pub region: String,
    pub salesperson: String,
    pub product_code: String,
    pub quantity: f64,
}

// ==========================================
// ForecastFact - 月度预测事实
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastFact {
    pub year_month: YearMonth,
    pub region: String,
    pub salesperson: String,
    pub product_code: String,
    pub forecast_quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_parse_formats() {
        let expected = YearMonth::new(2024, 9);
        assert_eq!(YearMonth::parse("2024-09"), expected);
        assert_eq!(YearMonth::parse("2024/9"), expected);
        assert_eq!(YearMonth::parse("202409"), expected);
        assert_eq!(YearMonth::parse("2024-09-01"), expected);
        assert_eq!(YearMonth::parse("2024-09-01 00:00:00"), expected);
    }

    #[test]
    fn test_year_month_parse_invalid() {
        assert_eq!(YearMonth::parse(""), None);
        assert_eq!(YearMonth::parse("2024-13"), None);
        assert_eq!(YearMonth::parse("abc"), None);
    }

    #[test]
    fn test_year_month_ordering_and_display() {
        let a = YearMonth::new(2024, 12).unwrap();
        let b = YearMonth::new(2025, 1).unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "2024-12");
    }
}
