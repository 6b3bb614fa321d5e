use serde::{Deserialize, Serialize};

use crate::types::source::SourceDescriptor;

/// 请求复杂度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// 生成所需能力标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    LongForm,
    ShortForm,
    Research,
    Seo,
    Localization,
    IndustryExpertise,
    Persuasion,
}

/// 请求分类结果，不持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestClassification {
    pub complexity: Complexity,
    pub estimated_tokens: u32,
    pub required_capabilities: Vec<Capability>,
    pub suggested_models: Vec<String>,
}

/// 研究路由策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    NorwegianFirst,
    InternationalFirst,
    Balanced,
    Specialized,
    Comprehensive,
    CostOptimized,
    SpeedOptimized,
}

impl RoutingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingStrategy::NorwegianFirst => "norwegian_first",
            RoutingStrategy::InternationalFirst => "international_first",
            RoutingStrategy::Balanced => "balanced",
            RoutingStrategy::Specialized => "specialized",
            RoutingStrategy::Comprehensive => "comprehensive",
            RoutingStrategy::CostOptimized => "cost_optimized",
            RoutingStrategy::SpeedOptimized => "speed_optimized",
        }
    }
}

impl std::fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 检索深度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

/// 检索过滤条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchFilters {
    #[serde(default)]
    pub include_domains: Vec<String>,
    /// 只检索最近N天的内容
    #[serde(default)]
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub language: Option<String>,
}

/// 单个研究源的选择，生命周期为一次请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSelection {
    pub source: SourceDescriptor,
    /// 优先级，1最高
    pub priority: u8,
    pub query: String,
    pub search_depth: SearchDepth,
    pub max_results: usize,
    pub filters: Option<SearchFilters>,
    pub reason: String,
}

/// 路由决策
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub strategy: RoutingStrategy,
    pub queries: Vec<String>,
    pub primary: Vec<SourceSelection>,
    pub secondary: Vec<SourceSelection>,
    pub international: Vec<SourceSelection>,
    /// 估算成本（美元）
    pub estimated_cost: f64,
    /// 估算耗时（毫秒）
    pub estimated_time_ms: u64,
    /// 文化相关度（0-1）
    pub cultural_relevance: f64,
    pub reasoning: Vec<String>,
}

impl RoutingDecision {
    pub fn total_selections(&self) -> usize {
        self.primary.len() + self.secondary.len() + self.international.len()
    }

    /// 按优先顺序返回所有选择
    pub fn all_selections(&self) -> Vec<SourceSelection> {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .chain(self.international.iter())
            .cloned()
            .collect()
    }
}
