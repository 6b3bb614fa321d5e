//! 多服务商文本生成，按回退链顺序依次尝试
//!
//! 各候选之间严格串行，不做并发的投机调用。

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::GenerationConfig;
use crate::cost::{BudgetDecision, CostSession};
use crate::error::{PipelineError, ProviderError};
use crate::llm::client::types::{ProviderCall, ProviderReply};
use crate::llm::client::utils::estimate_call_cost;
use crate::llm::client::{LLMClient, ModelCandidate};
use crate::types::generation::{AttemptRecord, AttemptStatus, GenerationResult};
use crate::types::request::ContentRequest;

pub mod fallback;
pub mod prompt;

use fallback::{CandidateOutcome, FallbackState};
pub use prompt::GenerationPrompt;

/// 确定候选顺序：调用方偏好提到最前，否则按长短文本选择偏好服务商，否则保持默认顺序
pub fn order_candidates(
    request: &ContentRequest,
    candidates: &[ModelCandidate],
    long_form_provider: Option<&str>,
    short_form_provider: Option<&str>,
) -> Vec<ModelCandidate> {
    let preferred: Option<Box<dyn Fn(&ModelCandidate) -> bool + '_>> =
        if let Some(preference) = &request.preferred_provider {
            Some(Box::new(move |c: &ModelCandidate| {
                c.provider == preference.provider
                    && preference
                        .model
                        .as_deref()
                        .map(|model| c.model == model)
                        .unwrap_or(true)
            }))
        } else if request.content_type.is_long_form()
            && let Some(provider) = long_form_provider
        {
            Some(Box::new(move |c: &ModelCandidate| c.provider == provider))
        } else if request.content_type.is_short_form()
            && let Some(provider) = short_form_provider
        {
            Some(Box::new(move |c: &ModelCandidate| c.provider == provider))
        } else {
            None
        };

    match preferred {
        Some(is_preferred) => {
            let (mut front, rest): (Vec<_>, Vec<_>) =
                candidates.iter().cloned().partition(|c| is_preferred(c));
            front.extend(rest);
            front
        }
        None => candidates.to_vec(),
    }
}

/// 一次成功生成的结果与完整的尝试记录
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub result: GenerationResult,
    pub attempts: Vec<AttemptRecord>,
}

/// 生成编排器
pub struct GenerationOrchestrator {
    client: LLMClient,
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(client: LLMClient, config: GenerationConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &LLMClient {
        &self.client
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// 本次请求的候选顺序
    pub fn candidates_for(&self, request: &ContentRequest) -> Vec<ModelCandidate> {
        order_candidates(
            request,
            self.client.candidates(),
            self.config.long_form_provider.as_deref(),
            self.config.short_form_provider.as_deref(),
        )
    }

    /// 按回退链生成文本，所有候选都失败时返回 `AllProvidersFailed`
    pub async fn generate(
        &self,
        request: &ContentRequest,
        prompt: &GenerationPrompt,
        session: &mut CostSession,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome, PipelineError> {
        let candidates = self.candidates_for(request);
        let mut attempts = Vec::with_capacity(candidates.len());
        let mut state = FallbackState::start(candidates.len());

        while let Some(index) = state.current() {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            let Some(candidate) = candidates.get(index) else {
                break;
            };

            let call = ProviderCall {
                system_prompt: prompt.system_prompt.clone(),
                user_prompt: prompt.user_prompt.clone(),
                model: candidate.model.clone(),
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            };
            let estimated_cost =
                estimate_call_cost(&call, request.effective_length(), &candidate.pricing);

            if let BudgetDecision::Deny(reason) = session.check_budget(estimated_cost) {
                warn!(
                    provider = %candidate.provider,
                    model = %candidate.model,
                    reason = %reason,
                    "Skipping candidate over budget"
                );
                attempts.push(AttemptRecord {
                    provider: candidate.provider.clone(),
                    model: candidate.model.clone(),
                    status: AttemptStatus::SkippedBudget { estimated_cost },
                    estimated_cost,
                    duration_ms: 0,
                });
                state = state.advance(Some(CandidateOutcome::Skipped), candidates.len());
                continue;
            }

            let started = Instant::now();
            let reply = self.call_candidate(candidate, &call, cancel).await?;
            let duration_ms = started.elapsed().as_millis() as u64;

            match reply {
                Ok(reply) => {
                    let cost = reply.usage.estimate_cost(&candidate.pricing);
                    session.record(&candidate.provider, reply.usage, cost);
                    info!(
                        provider = %candidate.provider,
                        model = %candidate.model,
                        tokens = reply.usage.total_tokens,
                        cost,
                        duration_ms,
                        "Generation succeeded"
                    );
                    attempts.push(AttemptRecord {
                        provider: candidate.provider.clone(),
                        model: candidate.model.clone(),
                        status: AttemptStatus::Succeeded,
                        estimated_cost,
                        duration_ms,
                    });
                    return Ok(GenerationOutcome {
                        result: GenerationResult {
                            text: reply.text,
                            provider: candidate.provider.clone(),
                            model: candidate.model.clone(),
                            cost,
                            usage: reply.usage,
                            cache_hit: false,
                        },
                        attempts,
                    });
                }
                Err(err) => {
                    warn!(
                        provider = %candidate.provider,
                        model = %candidate.model,
                        kind = ?err.kind(),
                        error = %err,
                        "Provider failed, falling back"
                    );
                    attempts.push(AttemptRecord {
                        provider: candidate.provider.clone(),
                        model: candidate.model.clone(),
                        status: AttemptStatus::Failed {
                            kind: err.kind(),
                            message: err.to_string(),
                        },
                        estimated_cost,
                        duration_ms,
                    });
                    state = state.advance(Some(CandidateOutcome::Failed), candidates.len());
                }
            }
        }

        warn!(attempts = attempts.len(), "All generation candidates exhausted");
        Err(PipelineError::AllProvidersFailed { attempts })
    }

    /// 调用单个候选，超时视同传输失败；取消时中止调用
    async fn call_candidate(
        &self,
        candidate: &ModelCandidate,
        call: &ProviderCall,
        cancel: &CancellationToken,
    ) -> Result<Result<ProviderReply, ProviderError>, PipelineError> {
        let Some(provider) = self.client.provider(&candidate.provider) else {
            return Ok(Err(ProviderError::Unavailable {
                provider: candidate.provider.clone(),
            }));
        };

        let timeout_secs = self.config.timeout_seconds;
        let call_future =
            tokio::time::timeout(Duration::from_secs(timeout_secs), provider.generate(call));

        tokio::select! {
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            result = call_future => Ok(match result {
                Ok(Ok(reply)) if reply.text.trim().is_empty() => Err(ProviderError::Transport {
                    message: "provider returned an empty completion".to_string(),
                }),
                Ok(reply) => reply,
                Err(_) => Err(ProviderError::Timeout { timeout_secs }),
            }),
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
