// ==========================================
// 智能库存预警分析系统 - 加载结果
// ==========================================
// 职责: 表级加载结果（正常 / 回退样例数据 / 致命）
// 红线: 单表失败不得拖垮整个分析流程，回退必须可被调用方识别
// ==========================================

use crate::domain::types::InputTable;
use crate::i18n::t_with_args;
use serde::{Deserialize, Serialize};

/// 单表加载结果
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult<T> {
    /// 正常加载
    Ok(T),

    /// 加载失败，已替换为固定样例数据
    Fallback { data: T, reason: String },

    /// 加载失败且无可用回退
    Fatal(String),
}

impl<T> LoadResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, LoadResult::Ok(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadResult::Fallback { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, LoadResult::Fatal(_))
    }

    /// 回退/致命原因
    pub fn reason(&self) -> Option<&str> {
        match self {
            LoadResult::Ok(_) => None,
            LoadResult::Fallback { reason, .. } | LoadResult::Fatal(reason) => Some(reason),
        }
    }

    /// 取出可用数据（致命时为 None）
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadResult::Ok(data) | LoadResult::Fallback { data, .. } => Some(data),
            LoadResult::Fatal(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            LoadResult::Ok(data) | LoadResult::Fallback { data, .. } => Some(data),
            LoadResult::Fatal(_) => None,
        }
    }

    /// 转换为面向界面的告警（正常加载时为 None）
    pub fn warning(&self, table: InputTable) -> Option<LoadWarning> {
        match self {
            LoadResult::Ok(_) => None,
            LoadResult::Fallback { reason, .. } => Some(LoadWarning {
                table,
                used_sample_data: true,
                reason: reason.clone(),
            }),
            LoadResult::Fatal(reason) => Some(LoadWarning {
                table,
                used_sample_data: false,
                reason: reason.clone(),
            }),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadResult<U> {
        match self {
            LoadResult::Ok(data) => LoadResult::Ok(f(data)),
            LoadResult::Fallback { data, reason } => LoadResult::Fallback {
                data: f(data),
                reason,
            },
            LoadResult::Fatal(reason) => LoadResult::Fatal(reason),
        }
    }
}

/// 加载告警（界面需明示哪张表使用了样例数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadWarning {
    pub table: InputTable,
    pub used_sample_data: bool,
    pub reason: String,
}

impl LoadWarning {
    /// 本地化提示文本
    pub fn message(&self) -> String {
        let key = if self.used_sample_data {
            "load.fallback"
        } else {
            "load.fatal"
        };
        t_with_args(
            key,
            &[("table", &self.table.label()), ("reason", &self.reason)],
        )
    }
}
