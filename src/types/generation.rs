use serde::{Deserialize, Serialize};

use crate::error::ProviderErrorKind;
use crate::llm::client::types::TokenUsage;

/// 生成结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub provider: String,
    pub model: String,
    /// 成本（美元），非负
    pub cost: f64,
    pub usage: TokenUsage,
    pub cache_hit: bool,
}

/// 单次候选尝试的状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptStatus {
    Succeeded,
    SkippedBudget { estimated_cost: f64 },
    Failed { kind: ProviderErrorKind, message: String },
}

/// 回退链的尝试记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub provider: String,
    pub model: String,
    pub status: AttemptStatus,
    pub estimated_cost: f64,
    pub duration_ms: u64,
}
