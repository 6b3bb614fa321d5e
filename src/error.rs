//! 生成流水线的错误类型
//!
//! 只有 `PipelineError::AllProvidersFailed` 会让一次生成请求失败，
//! 研究源与单个模型服务的错误都会被降级处理并记录下来。

use serde::{Deserialize, Serialize};

use crate::types::generation::AttemptRecord;

/// 单个字段的校验问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// 请求校验失败，在任何外部调用之前返回
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid content request: {}", format_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// 研究源抓取错误，只影响单个源
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResearchError {
    #[error("research request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("research transport failed: {message}")]
    Transport { message: String },

    #[error("research API returned HTTP {status}")]
    Http { status: u16 },

    #[error("research response could not be parsed: {message}")]
    Parse { message: String },
}

/// 模型服务错误的分类，供回退链判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    Timeout,
    RateLimited,
    Transport,
    Validation,
    Unavailable,
}

/// 模型服务调用错误
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("provider call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("provider rate limited the request: {message}")]
    RateLimited { message: String },

    #[error("provider transport failed: {message}")]
    Transport { message: String },

    #[error("provider rejected the request: {message}")]
    Validation { message: String },

    #[error("provider {provider} is not registered")]
    Unavailable { provider: String },
}

impl ProviderError {
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Timeout { .. } => ProviderErrorKind::Timeout,
            ProviderError::RateLimited { .. } => ProviderErrorKind::RateLimited,
            ProviderError::Transport { .. } => ProviderErrorKind::Transport,
            ProviderError::Validation { .. } => ProviderErrorKind::Validation,
            ProviderError::Unavailable { .. } => ProviderErrorKind::Unavailable,
        }
    }

    /// 根据错误文本粗略归类，适用于只暴露字符串错误的客户端
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("429") || lower.contains("rate limit") || lower.contains("too many requests") {
            ProviderError::RateLimited { message }
        } else if lower.contains("400")
            || lower.contains("invalid")
            || lower.contains("context length")
        {
            ProviderError::Validation { message }
        } else {
            ProviderError::Transport { message }
        }
    }
}

/// 预算不足，导致候选模型或研究源被跳过
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("budget exceeded for {caller_id}: estimated {estimated_cost:.4} with {remaining:.4} remaining")]
pub struct BudgetExceeded {
    pub caller_id: String,
    pub estimated_cost: f64,
    pub remaining: f64,
}

/// 流水线级别错误
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no provider available: all {} candidates failed", .attempts.len())]
    AllProvidersFailed { attempts: Vec<AttemptRecord> },

    #[error("generation request was cancelled")]
    Cancelled,

    #[error("internal pipeline error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    /// 对外暴露的错误码
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "VALIDATION_ERROR",
            PipelineError::AllProvidersFailed { .. } => "ALL_PROVIDERS_FAILED",
            PipelineError::Cancelled => "CANCELLED",
            PipelineError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
