// ==========================================
// 智能库存预警分析系统 - API 层
// ==========================================
// 职责: 提供看板 API 接口,供展示层调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, RiskTierLegend, TablePreview};
pub use error::{ApiError, ApiResult};
