// ==========================================
// 智能库存预警分析系统 - 分析结果缓存
// ==========================================
// 职责: 按 (输入指纹, 分析日期, 界面语言) 缓存完整分析结果
// 规则: 指纹 = SHA-256(各输入文件字节 + 分析参数)
//       日期变化时旧日期的条目全部失效（库龄随日期变化），即使输入未变
//       同一日期只保留最新写入的一份结果
//       报告内含已本地化的建议文本，语言不同即视为不同结果
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::types::InputTable;
use crate::engine::pipeline::AnalysisReport;
use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// 缓存键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub fingerprint: String,
    pub analysis_date: NaiveDate,
    pub locale: String,
}

impl CacheKey {
    pub fn new(
        fingerprint: impl Into<String>,
        analysis_date: NaiveDate,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            analysis_date,
            locale: locale.into(),
        }
    }
}

/// 缓存统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<CacheKey, Arc<AnalysisReport>>,
    stats: CacheStats,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询；同时淘汰早于查询日期的条目
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<AnalysisReport>> {
        self.invalidate_before(key.analysis_date);
        match self.entries.get(key) {
            Some(report) => {
                self.stats.hits += 1;
                tracing::debug!(fingerprint = %short(&key.fingerprint), "分析缓存命中");
                Some(Arc::clone(report))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// 写入；同时淘汰早于该日期的条目以及同日的其他条目
    pub fn insert(&mut self, key: CacheKey, report: AnalysisReport) -> Arc<AnalysisReport> {
        self.invalidate_before(key.analysis_date);

        let before = self.entries.len();
        self.entries
            .retain(|k, _| k.analysis_date != key.analysis_date || k == &key);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            self.stats.evictions += evicted as u64;
            tracing::debug!(evicted, fingerprint = %short(&key.fingerprint), "同日旧分析结果已替换");
        }

        let report = Arc::new(report);
        self.entries.insert(key, Arc::clone(&report));
        self.stats.entries = self.entries.len();
        report
    }

    /// 淘汰分析日期早于 day 的条目（跨日失效）
    pub fn invalidate_before(&mut self, day: NaiveDate) {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.analysis_date >= day);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            self.stats.evictions += evicted as u64;
            tracing::info!(evicted, day = %day, "跨日失效，已清理旧分析结果");
        }
        self.stats.entries = self.entries.len();
    }

    pub fn clear(&mut self) {
        self.stats.evictions += self.entries.len() as u64;
        self.entries.clear();
        self.stats.entries = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }
}

/// 计算输入指纹：各表文件内容（缺失文件记为固定标记）+ 分析参数
pub fn fingerprint_inputs(inputs: &[(InputTable, PathBuf)], config: &AnalysisConfig) -> String {
    let mut hasher = Sha256::new();
    for (table, path) in inputs {
        hasher.update(table.to_string().as_bytes());
        match std::fs::read(path) {
            Ok(bytes) => {
                hasher.update((bytes.len() as u64).to_le_bytes());
                hasher.update(&bytes);
            }
            Err(_) => hasher.update(b"<missing>"),
        }
    }
    // 参数快照序列化失败时退化为 Debug 文本，仍可区分不同参数
    let config_text =
        serde_json::to_string(config).unwrap_or_else(|_| format!("{:?}", config));
    hasher.update(config_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::AnalysisPipeline;
    use crate::importer::table_loader::TableLoader;
    use std::io::Write;

    fn report_for(day: NaiveDate) -> AnalysisReport {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = AnalysisPipeline::default();
        let tables = TableLoader::new(dir.path(), Default::default(), "F").load_all(day);
        pipeline.run(&tables, day.and_hms_opt(9, 0, 0).unwrap())
    }

    #[test]
    fn test_hit_then_day_rollover_invalidates() {
        let day1 = NaiveDate::from_ymd_opt(2025, 2, 21).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2025, 2, 22).unwrap();
        let mut cache = AnalysisCache::new();

        let key1 = CacheKey::new("abc", day1, "zh-CN");
        cache.insert(key1.clone(), report_for(day1));
        assert!(cache.get(&key1).is_some());

        // 同一指纹、次日查询：未命中且旧条目被清理
        let key2 = CacheKey::new("abc", day2, "zh-CN");
        assert!(cache.get(&key2).is_none());
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_same_day_insert_replaces_stale_entry() {
        let day = NaiveDate::from_ymd_opt(2025, 2, 21).unwrap();
        let mut cache = AnalysisCache::new();

        let old = CacheKey::new("abc", day, "zh-CN");
        let new = CacheKey::new("def", day, "zh-CN");
        cache.insert(old.clone(), report_for(day));
        cache.insert(new.clone(), report_for(day));
        cache.insert(new.clone(), report_for(day));

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&old).is_none());
        assert!(cache.get(&new).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_locale_is_part_of_key() {
        let day = NaiveDate::from_ymd_opt(2025, 2, 21).unwrap();
        let mut cache = AnalysisCache::new();

        let zh = CacheKey::new("abc", day, "zh-CN");
        cache.insert(zh.clone(), report_for(day));
        assert!(cache.get(&CacheKey::new("abc", day, "en")).is_none());
        assert!(cache.get(&zh).is_some());
    }

    #[test]
    fn test_fingerprint_changes_with_content_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("单价.csv");
        let inputs = vec![(InputTable::UnitPrice, path.clone())];
        let config = AnalysisConfig::standard();

        let missing = fingerprint_inputs(&inputs, &config);

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "产品代码,单价\nF001,10").unwrap();
        let present = fingerprint_inputs(&inputs, &config);
        assert_ne!(missing, present);
        assert_eq!(present, fingerprint_inputs(&inputs, &config));

        let mut other = AnalysisConfig::standard();
        other.default_unit_price = 50.0;
        assert_ne!(present, fingerprint_inputs(&inputs, &other));
    }
}
