use serde::{Deserialize, Serialize};

use crate::types::analysis::ContentAnalysis;

/// 研究条目的附加元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemMetadata {
    pub author: Option<String>,
    pub published_date: Option<String>,
    /// 内容分类，例如 "article"、"report"
    pub classification: Option<String>,
    pub language: Option<String>,
    pub word_count: usize,
}

impl ItemMetadata {
    pub fn is_article(&self) -> bool {
        self.classification
            .as_deref()
            .map(|c| c.eq_ignore_ascii_case("article"))
            .unwrap_or(false)
    }
}

/// 研究条目，同一请求内按url去重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchItem {
    pub source_id: String,
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// 相关度（0-1）
    pub relevance: f64,
    /// 可信度（0-1）
    pub credibility: f64,
    pub metadata: ItemMetadata,
}

/// 单个研究源抓取失败的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFetchFailure {
    pub source_id: String,
    pub query: String,
    pub error: String,
}

/// 一次研究收集的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResearchOutcome {
    pub items: Vec<ResearchItem>,
    pub failures: Vec<SourceFetchFailure>,
    /// 置信度（0-1），无结果时为0
    pub confidence: f64,
}

/// 研究综合结果，供生成提示词使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResearchSynthesis {
    pub items: Vec<ResearchItem>,
    pub failures: Vec<SourceFetchFailure>,
    pub confidence: f64,
    pub analysis: Option<ContentAnalysis>,
}

impl ResearchSynthesis {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
