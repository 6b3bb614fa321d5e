use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::llm::client::types::ModelPricing;
use crate::types::request::ContentType;
use crate::types::source::SourceDescriptor;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// 研究源路由配置
    pub routing: RoutingConfig,

    /// 研究检索服务配置
    pub research: ResearchConfig,

    /// 内容分析配置
    pub analysis: AnalysisConfig,

    /// 文本生成配置
    pub generation: GenerationConfig,

    /// 质量评估与迭代改进配置
    pub quality: QualityConfig,

    /// 调用方预算配置
    pub budget: BudgetConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 追加到内置目录的研究源
    pub sources: Vec<SourceDescriptor>,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 研究源路由配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RoutingConfig {
    /// 主要源上限
    pub max_primary_sources: usize,

    /// 补充源上限
    pub max_secondary_sources: usize,

    /// 国际源上限
    pub max_international_sources: usize,

    /// 主要源的最低可信度，补充源会降低一分
    pub min_trust_score: f64,

    /// 单次请求的研究预算（美元）
    pub research_budget: f64,

    /// 是否并行执行各组检索
    pub parallel_execution: bool,

    /// 已配置凭证的域名，需要认证的源只有在这里出现时才会被选中
    pub authenticated_domains: Vec<String>,

    /// basic深度单次检索成本
    pub basic_query_cost: f64,

    /// advanced深度单次检索成本
    pub advanced_query_cost: f64,

    /// premium源的固定附加成本
    pub premium_source_overhead: f64,

    /// 固定基础耗时（毫秒）
    pub base_overhead_ms: u64,

    pub basic_query_ms: u64,

    pub advanced_query_ms: u64,
}

/// 研究检索服务配置（Tavily兼容接口）
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    pub api_base_url: String,

    pub api_key: String,

    /// 单次外部调用超时（秒）
    pub timeout_seconds: u64,

    /// 去重排序后保留的最大条目数
    pub max_items: usize,

    /// 最大并发检索数
    pub max_parallels: usize,

    /// 摘要短于该字符数时尝试抓取全文
    pub scrape_below_chars: usize,

    /// 摘要最大长度
    pub snippet_max_chars: usize,
}

/// 内容分析配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub max_insights: usize,

    pub max_facts: usize,

    pub max_quotes: usize,

    pub max_metrics: usize,

    /// 洞察保留的最低相关度
    pub min_insight_relevance: f64,

    /// 判断过时年份的参考年份，未设置时使用当前年份
    pub reference_year: Option<i32>,
}

/// 模型价格配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModelProfile {
    pub name: String,

    /// 每1000输入token价格（美元）
    pub input_per_1k: f64,

    /// 每1000输出token价格（美元）
    pub output_per_1k: f64,
}

impl ModelProfile {
    pub fn new(name: &str, input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            name: name.to_string(),
            input_per_1k,
            output_per_1k,
        }
    }

    pub fn pricing(&self) -> ModelPricing {
        ModelPricing {
            input_per_1k: self.input_per_1k,
            output_per_1k: self.output_per_1k,
        }
    }
}

/// 单个模型服务商配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderProfile {
    /// 回退链中使用的标识
    pub id: String,

    pub provider: LLMProvider,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_base_url: Option<String>,

    /// 按优先顺序排列的模型
    pub models: Vec<ModelProfile>,
}

/// 文本生成配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// 默认回退链顺序即此列表顺序
    pub providers: Vec<ProviderProfile>,

    /// 长文本优先使用的服务商
    pub long_form_provider: Option<String>,

    /// 短文本优先使用的服务商
    pub short_form_provider: Option<String>,

    /// 温度
    pub temperature: f64,

    /// 最大tokens
    pub max_tokens: u32,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 质量评估与迭代改进配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct QualityConfig {
    /// 最多重新生成的次数
    pub max_refinement_iterations: usize,

    /// 改进提示中最多列出的问题数
    pub max_improvement_items: usize,
}

/// 调用方预算配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BudgetConfig {
    /// 每个调用方的累计消费上限（美元）
    pub per_caller_limit: f64,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 时效性内容的过期时间（小时）
    pub time_sensitive_ttl_hours: u64,

    /// 普通内容的过期时间（小时）
    pub standard_ttl_hours: u64,

    /// 长青内容的过期时间（小时）
    pub evergreen_ttl_hours: u64,
}

impl CacheConfig {
    /// 根据内容类型决定缓存有效期（秒）
    pub fn ttl_seconds_for(&self, content_type: ContentType) -> u64 {
        let hours = if content_type.is_time_sensitive() {
            self.time_sensitive_ttl_hours
        } else if content_type.is_long_form() {
            self.evergreen_ttl_hours
        } else {
            self.standard_ttl_hours
        };
        hours * 3600
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// 服务商专用变量优先，其次是通用的 `SKRIVE_LLM_API_KEY`
fn api_key_from_env(var: &str) -> String {
    std::env::var(var)
        .or_else(|_| std::env::var("SKRIVE_LLM_API_KEY"))
        .unwrap_or_default()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_primary_sources: 3,
            max_secondary_sources: 2,
            max_international_sources: 2,
            min_trust_score: 7.0,
            research_budget: 0.05,
            parallel_execution: true,
            authenticated_domains: vec![],
            basic_query_cost: 0.008,
            advanced_query_cost: 0.016,
            premium_source_overhead: 0.01,
            base_overhead_ms: 1500,
            basic_query_ms: 2000,
            advanced_query_ms: 4500,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("https://api.tavily.com"),
            api_key: std::env::var("SKRIVE_SEARCH_API_KEY").unwrap_or_default(),
            timeout_seconds: 30,
            max_items: 8,
            max_parallels: 6,
            scrape_below_chars: 300,
            snippet_max_chars: 1500,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_insights: 5,
            max_facts: 10,
            max_quotes: 5,
            max_metrics: 5,
            min_insight_relevance: 0.2,
            reference_year: None,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderProfile {
                    id: String::from("openai"),
                    provider: LLMProvider::OpenAI,
                    api_key: api_key_from_env("OPENAI_API_KEY"),
                    api_base_url: None,
                    models: vec![
                        ModelProfile::new("gpt-4o-mini", 0.00015, 0.0006),
                        ModelProfile::new("gpt-4o", 0.0025, 0.01),
                    ],
                },
                ProviderProfile {
                    id: String::from("anthropic"),
                    provider: LLMProvider::Anthropic,
                    api_key: api_key_from_env("ANTHROPIC_API_KEY"),
                    api_base_url: None,
                    models: vec![
                        ModelProfile::new("claude-3-5-sonnet-latest", 0.003, 0.015),
                        ModelProfile::new("claude-3-5-haiku-latest", 0.0008, 0.004),
                    ],
                },
                ProviderProfile {
                    id: String::from("mistral"),
                    provider: LLMProvider::Mistral,
                    api_key: api_key_from_env("MISTRAL_API_KEY"),
                    api_base_url: None,
                    models: vec![ModelProfile::new("mistral-large-latest", 0.002, 0.006)],
                },
            ],
            long_form_provider: Some(String::from("anthropic")),
            short_form_provider: Some(String::from("openai")),
            temperature: 0.7,
            max_tokens: 4096,
            timeout_seconds: 30,
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_refinement_iterations: 3,
            max_improvement_items: 5,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            per_caller_limit: 25.0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".skrive/cache"),
            time_sensitive_ttl_hours: 6,
            standard_ttl_hours: 24,
            evergreen_ttl_hours: 24 * 7,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
