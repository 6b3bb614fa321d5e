//! 外部研究检索服务接口

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;
use crate::types::routing::{SearchDepth, SearchFilters};

pub mod tavily;

pub use tavily::TavilyResearchProvider;

/// 单条检索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub content: String,
    /// 服务端给出的相关度（0-1）
    pub score: Option<f64>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    /// 内容分类，例如 "article"
    pub classification: Option<String>,
}

/// 抓取到的页面
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScrapedPage {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// 研究检索服务
///
/// 错误必须与空结果区分：没有命中返回 `Ok(vec![])`。
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        depth: SearchDepth,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<SearchHit>, ResearchError>;

    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ResearchError>;
}
