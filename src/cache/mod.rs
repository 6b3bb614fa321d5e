//! 响应缓存：按请求的规范指纹缓存生成结果
//!
//! 缓存是旁路的，读写失败只记录错误，从不阻塞生成。

use md5::{Digest, Md5};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::CacheConfig;
use crate::llm::client::types::TokenUsage;
use crate::types::request::ContentRequest;

pub mod performance_monitor;
pub mod store;

pub use performance_monitor::{CachePerformanceMonitor, CachePerformanceReport};
pub use store::{CacheStore, FileCacheStore, InMemoryCacheStore};

/// 缓存管理器
pub struct CacheManager {
    config: CacheConfig,
    store: Arc<dyn CacheStore>,
    performance_monitor: CachePerformanceMonitor,
}

/// 缓存条目
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: u64,
    /// 请求指纹
    pub fingerprint: String,
    /// 生成时的token使用情况，用于统计节省量
    pub token_usage: Option<TokenUsage>,
    /// 生成时的成本（美元）
    pub cost: f64,
}

impl CacheManager {
    pub fn new(config: CacheConfig, store: Arc<dyn CacheStore>) -> Self {
        Self {
            config,
            store,
            performance_monitor: CachePerformanceMonitor::new(),
        }
    }

    /// 使用配置目录下的文件缓存
    pub fn from_config(config: CacheConfig) -> Self {
        let store = Arc::new(FileCacheStore::new(config.cache_dir.clone()));
        Self::new(config, store)
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// 规范化请求指纹：内容类型、主题、受众、语气、目标长度、行业与严格模式
    pub fn fingerprint(request: &ContentRequest) -> String {
        let topic = request
            .topic
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let canonical = format!(
            "{}|{}|{}|{:?}|{}|{}|{}|{}",
            request.content_type.as_str(),
            topic,
            request.audience,
            request.formality(),
            request.effective_length(),
            request.industry().unwrap_or("").to_lowercase(),
            request.quality.strict,
            request.output_language.source_language_code(),
        );

        let mut hasher = Md5::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// 读取缓存
    pub async fn get<T>(&self, request: &ContentRequest) -> Option<CacheEntry<T>>
    where
        T: DeserializeOwned,
    {
        if !self.config.enabled {
            return None;
        }

        let category = request.content_type.as_str();
        let key = Self::fingerprint(request);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.performance_monitor.record_cache_miss(category);
                return None;
            }
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(category, &format!("Read failed: {:#}", e));
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => {
                self.performance_monitor.record_cache_hit(
                    category,
                    entry.token_usage.unwrap_or_default(),
                    entry.cost,
                );
                Some(entry)
            }
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(category, &format!("Deserialization failed: {}", e));
                None
            }
        }
    }

    /// 写入缓存，有效期按内容类型决定
    pub async fn set<T>(&self, request: &ContentRequest, data: &T, token_usage: TokenUsage, cost: f64)
    where
        T: Serialize,
    {
        if !self.config.enabled {
            return;
        }

        let category = request.content_type.as_str();
        let fingerprint = Self::fingerprint(request);
        let entry = CacheEntry {
            data,
            timestamp: store::now_secs(),
            fingerprint: fingerprint.clone(),
            token_usage: Some(token_usage),
            cost,
        };

        let content = match serde_json::to_string(&entry) {
            Ok(content) => content,
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(category, &format!("Serialization failed: {}", e));
                return;
            }
        };

        let ttl = self.config.ttl_seconds_for(request.content_type);
        match self.store.set(&fingerprint, content, ttl).await {
            Ok(()) => self.performance_monitor.record_cache_write(category),
            Err(e) => self
                .performance_monitor
                .record_cache_error(category, &format!("Write failed: {:#}", e)),
        }
    }

    /// 生成性能报告
    pub fn generate_performance_report(&self) -> CachePerformanceReport {
        self.performance_monitor.generate_report()
    }
}
