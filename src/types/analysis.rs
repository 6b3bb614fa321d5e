use serde::{Deserialize, Serialize};

/// 洞察类别（固定8类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Market,
    Trend,
    Consumer,
    Technology,
    Financial,
    Regulatory,
    Competition,
    Sustainability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    pub category: InsightCategory,
    /// 置信度（0-1）
    pub confidence: f64,
    /// 与主题的相关度（0-1）
    pub relevance: f64,
}

impl Insight {
    pub fn rank_score(&self) -> f64 {
        self.confidence * self.relevance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    Statistic,
    Date,
    Company,
    Monetary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub text: String,
    pub kind: FactKind,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Growth,
    MarketShare,
    Revenue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub kind: MetricKind,
    pub value: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    LowRelevance,
    LowQuality,
    OutdatedContent,
    Paywall,
    MachineTranslation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// 分析警告，从不致命
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
}

/// 内容分析结果，每个条目一个实例，可合并
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentAnalysis {
    /// 相关度（0-1）
    pub relevance_score: f64,
    /// 质量（0-1）
    pub quality_score: f64,
    /// 文化契合度（0-1）
    pub cultural_score: f64,
    /// 每句事实数
    pub factual_density: f64,
    /// 情感倾向（-1..1）
    pub sentiment: f64,
    /// 可读性（0-100）
    pub readability: f64,
    pub insights: Vec<Insight>,
    pub facts: Vec<Fact>,
    pub quotes: Vec<Quote>,
    pub metrics: Vec<Metric>,
    pub warnings: Vec<AnalysisWarning>,
}
