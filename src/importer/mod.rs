// ==========================================
// 智能库存预警分析系统 - 导入层
// ==========================================
// 职责: 外部报表导入,生成领域记录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod inventory_parser;
pub mod sample_data;
pub mod table_loader;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{columns, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use importer_trait::{FileParser, RawRow, RawTable};
pub use inventory_parser::{InventoryParseOutput, InventoryParseStats, SpreadsheetRecordParser};
pub use table_loader::{LoadedTables, TableLoader};
