//! 缓存存储：按键读写字符串值，过期由存储自行判断

use anyhow::{Context, Result};
use async_trait::async_trait;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

/// 缓存存储接口，同一个键的写入是原子的，后写者覆盖先写者
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// 落盘的记录
#[derive(Debug, Serialize, Deserialize)]
struct StoredValue {
    key: String,
    value: String,
    expires_at: u64,
}

impl StoredValue {
    fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// 基于文件的缓存，文件名为键的MD5
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Md5::new();
        hasher.update(key.as_bytes());
        self.dir.join(format!("{:x}.json", hasher.finalize()))
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read cache file {:?}", path))?;
        let stored: StoredValue = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache file {:?}", path))?;

        if stored.key != key {
            return Ok(None);
        }
        if stored.is_expired(now_secs()) {
            // 删除过期缓存
            let _ = fs::remove_file(&path).await;
            return Ok(None);
        }
        Ok(Some(stored.value))
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create cache dir {:?}", self.dir))?;

        let stored = StoredValue {
            key: key.to_string(),
            value,
            expires_at: now_secs().saturating_add(ttl_seconds),
        };
        let content = serde_json::to_string_pretty(&stored)?;

        // 先写临时文件再重命名，读者不会看到写了一半的文件
        let path = self.path_for(key);
        let tmp_path = self
            .dir
            .join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("Failed to write cache file {:?}", tmp_path))?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to move cache file to {:?}", path));
        }
        Ok(())
    }
}

/// 内存缓存
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, StoredValue>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("cache lock poisoned"))?;
        let expired = match entries.get(key) {
            None => return Ok(None),
            Some(stored) if stored.is_expired(now_secs()) => true,
            Some(stored) => return Ok(Some(stored.value.clone())),
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("cache lock poisoned"))?;
        entries.insert(
            key.to_string(),
            StoredValue {
                key: key.to_string(),
                value,
                expires_at: now_secs().saturating_add(ttl_seconds),
            },
        );
        Ok(())
    }
}
