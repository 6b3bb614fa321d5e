//! 内容生成流水线
//!
//! 校验 → 缓存 → 分类 → 路由 → 研究 → 生成 → 文化适配 → 质量评估 → 迭代改进

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::cost::CostSession;
use crate::error::PipelineError;
use crate::generator::adaptation::AdaptationContext;
use crate::generator::classifier::{classify, select_strategy};
use crate::generator::context::GeneratorContext;
use crate::generator::generation::GenerationPrompt;
use crate::generator::generation::prompt::{build_prompt, research_brief};
use crate::generator::quality::{QualityContext, improvement_items};
use crate::generator::research::gatherer::ResearchGatherer;
use crate::generator::research::router::SourceRouter;
use crate::generator::research::synthesize;
use crate::types::adaptation::CulturalAdaptationResult;
use crate::types::generation::{AttemptRecord, GenerationResult};
use crate::types::quality::QualityAssessment;
use crate::types::request::ContentRequest;
use crate::types::research::ResearchSynthesis;
use crate::types::routing::{RequestClassification, RoutingDecision, RoutingStrategy};

pub mod trace;

pub use trace::{
    PipelineEvent, PipelineObserver, PipelineStage, PipelineTrace, RecordingObserver,
    TimingScope, TracingObserver,
};

/// 迭代改进的硬上限，配置值超过时按此截断
pub const MAX_REFINEMENT_ITERATIONS: usize = 3;

/// 改进提示中最多列出的问题数
pub const MAX_IMPROVEMENT_ITEMS: usize = 5;

/// 最终响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse {
    /// 适配后的最终文本
    pub content: String,
    pub generation: GenerationResult,
    /// 全部生成尝试，包括改进轮次
    pub attempts: Vec<AttemptRecord>,
    pub adaptation: CulturalAdaptationResult,
    pub quality: QualityAssessment,
    pub classification: RequestClassification,
    pub strategy: RoutingStrategy,
    pub routing: Option<RoutingDecision>,
    pub research: Option<ResearchSynthesis>,
    /// 实际执行的重新生成次数
    pub refinement_iterations: usize,
    /// 总分低于请求阈值
    pub flagged: bool,
    /// 本次请求提交到台账的总成本（美元），缓存命中时为0
    pub total_cost: f64,
    #[serde(default)]
    pub trace: PipelineTrace,
}

/// 一轮生成、适配、评估的结果
struct Draft {
    generation: GenerationResult,
    adaptation: CulturalAdaptationResult,
    quality: QualityAssessment,
}

/// 单轮生成所需的请求级上下文
struct DraftScope<'a> {
    request: &'a ContentRequest,
    adaptation: &'a AdaptationContext,
    quality: &'a QualityContext,
    cancel: &'a CancellationToken,
}

/// 每次运行的可变记录
struct RunState {
    trace: PipelineTrace,
    timing: TimingScope,
    attempts: Vec<AttemptRecord>,
}

/// 内容生成流水线
pub struct ContentPipeline {
    context: GeneratorContext,
    observer: Arc<dyn PipelineObserver>,
}

impl ContentPipeline {
    pub fn new(context: GeneratorContext) -> Self {
        Self {
            context,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn context(&self) -> &GeneratorContext {
        &self.context
    }

    pub async fn run(&self, request: ContentRequest) -> Result<ContentResponse, PipelineError> {
        self.run_cancellable(request, CancellationToken::new()).await
    }

    /// 运行流水线；取消时中止进行中的外部调用，未提交的成本直接丢弃
    pub async fn run_cancellable(
        &self,
        request: ContentRequest,
        cancel: CancellationToken,
    ) -> Result<ContentResponse, PipelineError> {
        let mut state = RunState {
            trace: PipelineTrace::default(),
            timing: TimingScope::new(),
            attempts: Vec::new(),
        };
        self.emit(
            &mut state.trace,
            PipelineEvent::Started {
                caller_id: request.caller_id.clone(),
            },
        );

        state.timing.start_phase(PipelineStage::Validate);
        request.validate()?;
        state.timing.end_phase(PipelineStage::Validate);
        ensure_active(&cancel)?;

        state.timing.start_phase(PipelineStage::Cache);
        let cached = self
            .context
            .cache_manager
            .get::<ContentResponse>(&request)
            .await;
        state.timing.end_phase(PipelineStage::Cache);
        // 阈值不参与指纹，低于本次阈值的缓存结果按未命中处理
        let threshold = request.quality.min_overall_score;
        let cached = cached.filter(|entry| {
            let usable = entry.data.quality.overall >= threshold;
            if !usable {
                debug!(
                    cached_overall = entry.data.quality.overall,
                    threshold, "cached response below threshold, regenerating"
                );
            }
            usable
        });
        if let Some(entry) = cached {
            self.emit(
                &mut state.trace,
                PipelineEvent::CacheHit {
                    fingerprint: entry.fingerprint.clone(),
                },
            );
            let mut response = entry.data;
            response.generation.cache_hit = true;
            response.total_cost = 0.0;
            response.flagged = response.quality.overall < threshold;
            state.timing.finish(&mut state.trace);
            response.trace = state.trace;
            return Ok(response);
        }

        state.timing.start_phase(PipelineStage::Classify);
        let generation_config = &self.context.config.generation;
        let classification = classify(
            &request,
            self.context.orchestrator.client().candidates(),
            generation_config.long_form_provider.as_deref(),
            generation_config.short_form_provider.as_deref(),
        );
        let strategy = select_strategy(&request, &classification);
        state.timing.end_phase(PipelineStage::Classify);
        self.emit(
            &mut state.trace,
            PipelineEvent::Classified {
                complexity: classification.complexity,
                strategy,
                estimated_tokens: classification.estimated_tokens,
            },
        );
        ensure_active(&cancel)?;

        let (routing, research) = self
            .research(&request, &classification, &mut state, &cancel)
            .await?;
        let brief = research.as_ref().and_then(research_brief);

        let adaptation_context = AdaptationContext::from_request(&request);
        let quality_context = QualityContext::from_request(&request);
        let scope = DraftScope {
            request: &request,
            adaptation: &adaptation_context,
            quality: &quality_context,
            cancel: &cancel,
        };

        let mut session = CostSession::new(self.context.cost_ledger.clone(), &request.caller_id);

        let prompt = build_prompt(&request, brief.as_deref(), &[]);
        let mut best = self.draft(&scope, &prompt, 0, &mut session, &mut state).await?;

        let quality_config = &self.context.config.quality;
        let max_iterations = quality_config
            .max_refinement_iterations
            .min(MAX_REFINEMENT_ITERATIONS);
        let max_items = quality_config
            .max_improvement_items
            .clamp(1, MAX_IMPROVEMENT_ITEMS);

        let mut iterations = 0;
        while best.quality.overall < threshold && iterations < max_iterations {
            iterations += 1;
            state.timing.start_phase(PipelineStage::Refine);

            let improvements = improvement_items(&best.quality, max_items);
            let prompt = build_prompt(&request, brief.as_deref(), &improvements);
            let candidate = match self
                .draft(&scope, &prompt, iterations, &mut session, &mut state)
                .await
            {
                Ok(candidate) => candidate,
                Err(PipelineError::AllProvidersFailed { attempts }) => {
                    // 已有可用草稿时改进失败不致命，保留最佳结果
                    state.attempts.extend(attempts);
                    state.timing.end_phase(PipelineStage::Refine);
                    self.emit(
                        &mut state.trace,
                        PipelineEvent::RefinementStopped {
                            iteration: iterations,
                            reason: "all providers failed during refinement".to_string(),
                        },
                    );
                    break;
                }
                Err(err) => return Err(err),
            };
            state.timing.end_phase(PipelineStage::Refine);

            if candidate.quality.overall <= best.quality.overall {
                self.emit(
                    &mut state.trace,
                    PipelineEvent::RefinementStopped {
                        iteration: iterations,
                        reason: format!(
                            "score did not improve ({:.1} <= {:.1})",
                            candidate.quality.overall, best.quality.overall
                        ),
                    },
                );
                break;
            }
            best = candidate;
        }

        let flagged = best.quality.overall < threshold;
        let usage = session.pending_usage();
        let total_cost = session.commit();
        self.emit(
            &mut state.trace,
            PipelineEvent::Completed {
                overall: best.quality.overall,
                flagged,
                total_cost,
            },
        );
        info!(
            caller_id = %request.caller_id,
            provider = %best.generation.provider,
            overall = best.quality.overall,
            iterations,
            flagged,
            total_cost,
            "Content generated"
        );

        let mut response = ContentResponse {
            content: best.adaptation.adapted_text.clone(),
            generation: best.generation,
            attempts: state.attempts,
            adaptation: best.adaptation,
            quality: best.quality,
            classification,
            strategy,
            routing,
            research,
            refinement_iterations: iterations,
            flagged,
            total_cost,
            trace: PipelineTrace::default(),
        };

        // 低于阈值的结果不缓存
        if !flagged {
            state.timing.start_phase(PipelineStage::Cache);
            self.context
                .cache_manager
                .set(&request, &response, usage, total_cost)
                .await;
            state.timing.end_phase(PipelineStage::Cache);
        }

        state.timing.finish(&mut state.trace);
        response.trace = state.trace;
        Ok(response)
    }

    /// 路由并收集研究资料，失败只会降低置信度
    async fn research(
        &self,
        request: &ContentRequest,
        classification: &RequestClassification,
        state: &mut RunState,
        cancel: &CancellationToken,
    ) -> Result<(Option<RoutingDecision>, Option<ResearchSynthesis>), PipelineError> {
        if !request.enable_research {
            self.emit(
                &mut state.trace,
                PipelineEvent::ResearchSkipped {
                    reason: "research disabled by request".to_string(),
                },
            );
            return Ok((None, None));
        }

        state.timing.start_phase(PipelineStage::Route);
        let router = SourceRouter::new(&self.context.registry, &self.context.config.routing);
        let decision = router.route(request, classification);
        let routing = router.optimize_for_cost(&decision);
        state.timing.end_phase(PipelineStage::Route);
        self.emit(
            &mut state.trace,
            PipelineEvent::Routed {
                selections: routing.total_selections(),
                estimated_cost: routing.estimated_cost,
                optimized: routing != decision,
            },
        );

        let Some(provider) = &self.context.research_provider else {
            self.emit(
                &mut state.trace,
                PipelineEvent::ResearchSkipped {
                    reason: "no research provider configured".to_string(),
                },
            );
            return Ok((Some(routing), None));
        };
        if routing.total_selections() == 0 {
            self.emit(
                &mut state.trace,
                PipelineEvent::ResearchSkipped {
                    reason: "no eligible sources".to_string(),
                },
            );
            return Ok((Some(routing), None));
        }

        state.timing.start_phase(PipelineStage::Research);
        let gatherer = ResearchGatherer::new(provider.clone(), &self.context.config.research);
        let selections = routing.all_selections();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            outcome = gatherer.gather(&selections) => outcome,
        };
        let synthesis = synthesize(
            outcome,
            &self.context.analyzer,
            &request.topic,
            request.output_language,
        );
        state.timing.end_phase(PipelineStage::Research);
        self.emit(
            &mut state.trace,
            PipelineEvent::ResearchGathered {
                items: synthesis.items.len(),
                failures: synthesis.failures.len(),
                confidence: synthesis.confidence,
            },
        );

        Ok((Some(routing), Some(synthesis)))
    }

    /// 生成一轮草稿并完成适配与评估
    async fn draft(
        &self,
        scope: &DraftScope<'_>,
        prompt: &GenerationPrompt,
        iteration: usize,
        session: &mut CostSession,
        state: &mut RunState,
    ) -> Result<Draft, PipelineError> {
        state.timing.start_phase(PipelineStage::Generate);
        let outcome = self
            .context
            .orchestrator
            .generate(scope.request, prompt, session, scope.cancel)
            .await;
        state.timing.end_phase(PipelineStage::Generate);
        let outcome = outcome?;

        self.emit(
            &mut state.trace,
            PipelineEvent::Generated {
                iteration,
                provider: outcome.result.provider.clone(),
                model: outcome.result.model.clone(),
                attempts: outcome.attempts.len(),
            },
        );
        state.attempts.extend(outcome.attempts);
        ensure_active(scope.cancel)?;

        state.timing.start_phase(PipelineStage::Adapt);
        let adaptation = self
            .context
            .adapter
            .adapt(&outcome.result.text, scope.adaptation);
        state.timing.end_phase(PipelineStage::Adapt);
        self.emit(
            &mut state.trace,
            PipelineEvent::Adapted {
                iteration,
                changes: adaptation.changes.len(),
                cultural_score: adaptation.cultural_score,
            },
        );

        state.timing.start_phase(PipelineStage::Assess);
        let quality = self
            .context
            .scorer
            .assess(&adaptation.adapted_text, scope.quality);
        state.timing.end_phase(PipelineStage::Assess);
        self.emit(
            &mut state.trace,
            PipelineEvent::Assessed {
                iteration,
                overall: quality.overall,
                readiness: quality.readiness,
            },
        );

        Ok(Draft {
            generation: outcome.result,
            adaptation,
            quality,
        })
    }

    fn emit(&self, trace: &mut PipelineTrace, event: PipelineEvent) {
        self.observer.on_event(&event);
        trace.events.push(event);
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}

/// 启动内容生成工作流
pub async fn launch(
    config: &Config,
    request: ContentRequest,
    cancel: CancellationToken,
) -> Result<ContentResponse, PipelineError> {
    let context = GeneratorContext::new(config.clone())?;
    ContentPipeline::new(context)
        .run_cancellable(request, cancel)
        .await
}
