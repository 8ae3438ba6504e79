// ==========================================
// 智能库存预警分析系统 - 导入 Trait 与原始表结构
// ==========================================
// 职责: 定义文件解析接口与解析产物（不包含实现）
// ==========================================

use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawRow / RawTable - 解析后的原始表
// ==========================================

/// 原始数据行（列名 → 单元格文本，已 TRIM）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 原表行号（表头为第 1 行，数据从第 2 行开始）
    pub row_number: usize,
    pub cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: HashMap<String, String>) -> Self {
        Self { row_number, cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(|v| v.as_str())
    }
}

/// 原始表：表头 + 按原表顺序排列的数据行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
// 约定: 行顺序必须与原表一致（库存表依赖行顺序表达表头/明细关系）
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 非空数据行
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}
