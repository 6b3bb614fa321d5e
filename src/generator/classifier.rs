//! 请求分类：复杂度、所需能力与路由策略
//!
//! 纯函数，不产生副作用。

use std::sync::LazyLock;

use crate::generator::generation::order_candidates;
use crate::llm::client::ModelCandidate;
use crate::types::request::{ContentRequest, ContentType};
use crate::types::routing::{Capability, Complexity, RequestClassification, RoutingStrategy};
use crate::utils::token_estimator::TokenEstimator;

static TOKEN_ESTIMATOR: LazyLock<TokenEstimator> = LazyLock::new(TokenEstimator::new);

/// 专业行业关键词，大小写不敏感的子串匹配
pub const SPECIALIZED_INDUSTRY_KEYWORDS: &[&str] = &[
    "fintech",
    "healthtech",
    "medtech",
    "helseteknologi",
    "biotech",
    "bioteknologi",
    "legemiddel",
    "pharma",
    "juridisk",
    "legal",
    "havbruk",
    "oppdrett",
    "aquaculture",
    "petroleum",
    "offshore",
    "maritim",
    "maritime",
    "shipping",
    "cybersikkerhet",
    "cybersecurity",
    "insurtech",
    "proptech",
    "edtech",
    "agritech",
    "regtech",
    "blockchain",
];

/// 研究阶段附加的prompt token估算
const RESEARCH_BRIEF_TOKENS: u32 = 1500;

/// 推荐模型数量
const SUGGESTED_MODEL_COUNT: usize = 3;

pub fn is_specialized_topic(topic: &str) -> bool {
    let topic = topic.to_lowercase();
    SPECIALIZED_INDUSTRY_KEYWORDS
        .iter()
        .any(|keyword| topic.contains(keyword))
}

/// 计算复杂度得分并分级
pub fn complexity_of(request: &ContentRequest) -> Complexity {
    let mut score = match request.content_type {
        ContentType::Whitepaper | ContentType::CaseStudy => 3,
        ContentType::Article
        | ContentType::BlogPost
        | ContentType::PressRelease
        | ContentType::Newsletter => 1,
        _ => 0,
    };

    let length = request.effective_length();
    if length > 1500 {
        score += 2;
    } else if length > 600 {
        score += 1;
    }

    if request.enable_research {
        score += 1;
    }
    if request.keywords.len() > 5 {
        score += 1;
    }
    if request.seo_primary_keyword().is_some() {
        score += 1;
    }

    match score {
        0..=1 => Complexity::Simple,
        2..=4 => Complexity::Moderate,
        _ => Complexity::Complex,
    }
}

fn required_capabilities(request: &ContentRequest) -> Vec<Capability> {
    let mut capabilities = Vec::new();
    if request.content_type.is_long_form() {
        capabilities.push(Capability::LongForm);
    }
    if request.content_type.is_short_form() {
        capabilities.push(Capability::ShortForm);
    }
    if request.enable_research {
        capabilities.push(Capability::Research);
    }
    if request.seo_primary_keyword().is_some() || !request.keywords.is_empty() {
        capabilities.push(Capability::Seo);
    }
    if request.output_language.is_local() || request.market().is_local() {
        capabilities.push(Capability::Localization);
    }
    if request.industry().is_some() || is_specialized_topic(&request.topic) {
        capabilities.push(Capability::IndustryExpertise);
    }
    if request.content_type.expects_call_to_action() {
        capabilities.push(Capability::Persuasion);
    }
    capabilities
}

fn estimated_tokens(request: &ContentRequest) -> u32 {
    let prompt = TOKEN_ESTIMATOR.estimate_tokens(&request.topic).estimated_tokens as u32;
    let output = TOKEN_ESTIMATOR.estimate_output_tokens(request.effective_length()) as u32;
    let research = if request.enable_research {
        RESEARCH_BRIEF_TOKENS
    } else {
        0
    };
    prompt + output + research
}

/// 对请求进行分类
pub fn classify(
    request: &ContentRequest,
    candidates: &[ModelCandidate],
    long_form_provider: Option<&str>,
    short_form_provider: Option<&str>,
) -> RequestClassification {
    let suggested_models = order_candidates(
        request,
        candidates,
        long_form_provider,
        short_form_provider,
    )
    .into_iter()
    .take(SUGGESTED_MODEL_COUNT)
    .map(|c| format!("{}/{}", c.provider, c.model))
    .collect();

    RequestClassification {
        complexity: complexity_of(request),
        estimated_tokens: estimated_tokens(request),
        required_capabilities: required_capabilities(request),
        suggested_models,
    }
}

/// 选择路由策略，第一条命中的规则生效
pub fn select_strategy(
    request: &ContentRequest,
    classification: &RequestClassification,
) -> RoutingStrategy {
    let local_language = request.output_language.is_local();
    let market = request.market();

    if local_language && market.is_local() {
        RoutingStrategy::NorwegianFirst
    } else if local_language && market.is_regional() {
        RoutingStrategy::Balanced
    } else if classification.complexity == Complexity::Complex {
        RoutingStrategy::Comprehensive
    } else if is_specialized_topic(&request.topic) {
        RoutingStrategy::Specialized
    } else if classification.complexity == Complexity::Simple {
        RoutingStrategy::CostOptimized
    } else if request.content_type.is_short_form() {
        RoutingStrategy::SpeedOptimized
    } else {
        RoutingStrategy::Balanced
    }
}
