//! 研究源路由：选择主要、补充与国际源，生成检索词并估算成本

use std::collections::HashSet;

use crate::config::RoutingConfig;
use crate::generator::classifier::select_strategy;
use crate::sources::{SourceRegistry, specialization_matches};
use crate::types::request::ContentRequest;
use crate::types::routing::{
    Complexity, RequestClassification, RoutingDecision, RoutingStrategy, SearchDepth,
    SearchFilters, SourceSelection,
};
use crate::types::source::{SourceCategory, SourceDescriptor};

/// 检索词上限
const MAX_QUERIES: usize = 3;

/// 成本优化后保留的数量
const OPTIMIZED_PRIMARY: usize = 2;
const OPTIMIZED_INTERNATIONAL: usize = 1;

/// 时效性内容只检索最近的天数
const TIME_SENSITIVE_MAX_AGE_DAYS: u32 = 30;

/// 各组的数量上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GroupBudget {
    primary: usize,
    secondary: usize,
    international: usize,
}

/// 研究源路由器
pub struct SourceRouter<'a> {
    registry: &'a SourceRegistry,
    config: &'a RoutingConfig,
}

impl<'a> SourceRouter<'a> {
    pub fn new(registry: &'a SourceRegistry, config: &'a RoutingConfig) -> Self {
        Self { registry, config }
    }

    /// 为请求生成路由决策
    pub fn route(
        &self,
        request: &ContentRequest,
        classification: &RequestClassification,
    ) -> RoutingDecision {
        let strategy = select_strategy(request, classification);
        let queries = build_queries(request);
        let topic_lower = request.topic.to_lowercase();
        let budget = self.group_budget(strategy);
        let mut reasoning = vec![format!(
            "strategy {} selected for {} content in {}",
            strategy, request.content_type, request.output_language
        )];

        let mut taken: HashSet<String> = HashSet::new();

        let primary_sources = self.select_primary(
            strategy,
            request,
            &topic_lower,
            budget.primary,
            &mut taken,
            &mut reasoning,
        );
        let secondary_sources = self.select_secondary(
            &primary_sources,
            budget.secondary,
            &topic_lower,
            &mut taken,
        );

        let international_sources = if strategy == RoutingStrategy::NorwegianFirst
            && request.output_language.is_local()
        {
            reasoning.push("international sources skipped for local-language content".to_string());
            Vec::new()
        } else {
            self.select_international(
                request,
                &topic_lower,
                budget.international,
                &mut taken,
                &mut reasoning,
            )
        };

        let depth = search_depth(strategy, classification.complexity);
        let primary_query = queries.first().cloned().unwrap_or_default();
        let secondary_query = queries.get(1).cloned().unwrap_or_else(|| primary_query.clone());
        let international_query = queries.last().cloned().unwrap_or_else(|| primary_query.clone());

        let primary = primary_sources
            .into_iter()
            .map(|source| {
                let reason = format!(
                    "primary: {} specialization matches, trust {:.1}",
                    specialization_matches(&source, &topic_lower),
                    source.trust_score
                );
                make_selection(source, 1, &primary_query, depth, 5, request, reason)
            })
            .collect::<Vec<_>>();
        let secondary = secondary_sources
            .into_iter()
            .map(|source| {
                let reason = format!("secondary: adds {:?} coverage", source.category);
                make_selection(source, 2, &secondary_query, SearchDepth::Basic, 3, request, reason)
            })
            .collect::<Vec<_>>();
        let international = international_sources
            .into_iter()
            .map(|source| {
                let reason = format!("international: trust {:.1}", source.trust_score);
                make_selection(source, 3, &international_query, SearchDepth::Basic, 3, request, reason)
            })
            .collect::<Vec<_>>();

        reasoning.push(format!(
            "{} primary, {} secondary, {} international sources",
            primary.len(),
            secondary.len(),
            international.len()
        ));

        let mut decision = RoutingDecision {
            strategy,
            queries,
            primary,
            secondary,
            international,
            estimated_cost: 0.0,
            estimated_time_ms: 0,
            cultural_relevance: 0.0,
            reasoning,
        };
        self.recompute_estimates(&mut decision);
        decision
    }

    /// 成本超出研究预算时截断选择，重复应用结果不变
    pub fn optimize_for_cost(&self, decision: &RoutingDecision) -> RoutingDecision {
        let mut optimized = decision.clone();
        if optimized.estimated_cost <= self.config.research_budget {
            return optimized;
        }

        let before = optimized.total_selections();
        optimized.primary.truncate(OPTIMIZED_PRIMARY);
        optimized.secondary.clear();
        optimized.international.truncate(OPTIMIZED_INTERNATIONAL);

        if optimized.total_selections() < before {
            let previous_cost = optimized.estimated_cost;
            self.recompute_estimates(&mut optimized);
            optimized.reasoning.push(format!(
                "cost optimized: estimated {:.4} exceeded budget {:.4}, reduced to {:.4}",
                previous_cost, self.config.research_budget, optimized.estimated_cost
            ));
        }
        optimized
    }

    fn group_budget(&self, strategy: RoutingStrategy) -> GroupBudget {
        let full = GroupBudget {
            primary: self.config.max_primary_sources,
            secondary: self.config.max_secondary_sources,
            international: self.config.max_international_sources,
        };
        match strategy {
            RoutingStrategy::CostOptimized => GroupBudget {
                primary: full.primary.min(2),
                secondary: full.secondary.min(1),
                international: full.international.min(1),
            },
            RoutingStrategy::SpeedOptimized => GroupBudget {
                primary: full.primary.min(2),
                secondary: 0,
                international: 0,
            },
            _ => full,
        }
    }

    fn is_eligible(&self, source: &SourceDescriptor) -> bool {
        !source.requires_auth
            || self
                .config
                .authenticated_domains
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&source.domain))
    }

    fn select_primary(
        &self,
        strategy: RoutingStrategy,
        request: &ContentRequest,
        topic_lower: &str,
        limit: usize,
        taken: &mut HashSet<String>,
        reasoning: &mut Vec<String>,
    ) -> Vec<SourceDescriptor> {
        let prefer_local = request.output_language.is_local() || request.market().is_local();
        match strategy {
            RoutingStrategy::InternationalFirst => self.select_international(
                request,
                topic_lower,
                limit,
                taken,
                reasoning,
            ),
            RoutingStrategy::Balanced => {
                let local_share = limit.div_ceil(2);
                let mut selected =
                    self.select_local(topic_lower, local_share, taken, reasoning);
                let international_share = limit - selected.len();
                selected.extend(self.select_international(
                    request,
                    topic_lower,
                    international_share,
                    taken,
                    reasoning,
                ));
                selected
            }
            RoutingStrategy::NorwegianFirst | RoutingStrategy::Specialized => {
                self.select_local(topic_lower, limit, taken, reasoning)
            }
            _ if prefer_local => self.select_local(topic_lower, limit, taken, reasoning),
            _ => self.select_international(
                request,
                topic_lower,
                limit,
                taken,
                reasoning,
            ),
        }
    }

    /// 按 Σ(专业匹配×3) + 可信度/2 + 商业相关度/3 选择本地源
    fn select_local(
        &self,
        topic_lower: &str,
        limit: usize,
        taken: &mut HashSet<String>,
        reasoning: &mut Vec<String>,
    ) -> Vec<SourceDescriptor> {
        let scorer = |source: &SourceDescriptor| {
            specialization_matches(source, topic_lower) as f64 * 3.0
                + source.trust_score / 2.0
                + source.business_relevance / 3.0
        };
        self.pick(
            self.registry.local(),
            topic_lower,
            self.config.min_trust_score,
            limit,
            scorer,
            taken,
            reasoning,
        )
    }

    /// 按 可信度 + 专业匹配 + 内容类型加分 选择国际源
    fn select_international(
        &self,
        request: &ContentRequest,
        topic_lower: &str,
        limit: usize,
        taken: &mut HashSet<String>,
        reasoning: &mut Vec<String>,
    ) -> Vec<SourceDescriptor> {
        let content_type = request.content_type;
        let scorer = |source: &SourceDescriptor| {
            let bonus = match source.category {
                SourceCategory::Consulting | SourceCategory::Academic
                    if content_type.is_long_form() =>
                {
                    1.0
                }
                SourceCategory::News if content_type.is_time_sensitive() => 1.0,
                _ => 0.0,
            };
            source.trust_score + specialization_matches(source, topic_lower) as f64 + bonus
        };
        self.pick(
            self.registry.international(),
            topic_lower,
            self.config.min_trust_score,
            limit,
            scorer,
            taken,
            reasoning,
        )
    }

    /// 过滤可信度与访问权限，优先专业匹配的源，不足时用通用源补齐
    #[allow(clippy::too_many_arguments)]
    fn pick<'s>(
        &self,
        pool: impl Iterator<Item = &'s SourceDescriptor>,
        topic_lower: &str,
        trust_floor: f64,
        limit: usize,
        scorer: impl Fn(&SourceDescriptor) -> f64,
        taken: &mut HashSet<String>,
        reasoning: &mut Vec<String>,
    ) -> Vec<SourceDescriptor> {
        if limit == 0 {
            return Vec::new();
        }

        let mut matched = Vec::new();
        let mut general = Vec::new();
        for source in pool {
            if taken.contains(&source.id) || source.trust_score < trust_floor {
                continue;
            }
            let matches = specialization_matches(source, topic_lower);
            let is_general = source.has_specialization("general");
            if matches == 0 && !is_general {
                continue;
            }
            if !self.is_eligible(source) {
                reasoning.push(format!("skipped {}: requires authentication", source.domain));
                continue;
            }
            let scored = (scorer(source), source);
            if matches > 0 {
                matched.push(scored);
            } else {
                general.push(scored);
            }
        }

        sort_scored(&mut matched);
        sort_scored(&mut general);

        let selected: Vec<SourceDescriptor> = matched
            .into_iter()
            .chain(general)
            .take(limit)
            .map(|(_, source)| source.clone())
            .collect();
        for source in &selected {
            taken.insert(source.id.clone());
        }
        selected
    }

    /// 补充源填补主要源未覆盖的类别，可信度门槛降低一分
    fn select_secondary(
        &self,
        primary: &[SourceDescriptor],
        limit: usize,
        topic_lower: &str,
        taken: &mut HashSet<String>,
    ) -> Vec<SourceDescriptor> {
        if limit == 0 {
            return Vec::new();
        }
        let mut covered: HashSet<SourceCategory> = primary.iter().map(|s| s.category).collect();
        let floor = self.config.min_trust_score - 1.0;

        let mut candidates: Vec<&SourceDescriptor> = self
            .registry
            .local()
            .filter(|s| !taken.contains(&s.id))
            .filter(|s| s.trust_score >= floor && self.is_eligible(s))
            .filter(|s| !covered.contains(&s.category))
            .collect();

        candidates.sort_by(|a, b| {
            b.category
                .is_preferred_secondary()
                .cmp(&a.category.is_preferred_secondary())
                .then_with(|| {
                    specialization_matches(b, topic_lower).cmp(&specialization_matches(a, topic_lower))
                })
                .then_with(|| b.trust_score.total_cmp(&a.trust_score))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut selected = Vec::new();
        for source in candidates {
            if selected.len() >= limit {
                break;
            }
            if covered.insert(source.category) {
                taken.insert(source.id.clone());
                selected.push(source.clone());
            }
        }
        selected
    }

    /// 重新计算成本、耗时与文化相关度
    fn recompute_estimates(&self, decision: &mut RoutingDecision) {
        decision.estimated_cost = self.estimate_cost(decision);
        decision.estimated_time_ms = self.estimate_time(decision);
        decision.cultural_relevance = cultural_relevance(decision);
    }

    fn estimate_cost(&self, decision: &RoutingDecision) -> f64 {
        decision
            .all_selections()
            .iter()
            .map(|selection| {
                let query_cost = match selection.search_depth {
                    SearchDepth::Basic => self.config.basic_query_cost,
                    SearchDepth::Advanced => self.config.advanced_query_cost,
                };
                let overhead = if selection.source.is_premium() {
                    self.config.premium_source_overhead
                } else {
                    0.0
                };
                query_cost + overhead
            })
            .sum()
    }

    fn estimate_time(&self, decision: &RoutingDecision) -> u64 {
        let group_time = |group: &[SourceSelection]| -> u64 {
            group
                .iter()
                .map(|s| match s.search_depth {
                    SearchDepth::Basic => self.config.basic_query_ms,
                    SearchDepth::Advanced => self.config.advanced_query_ms,
                })
                .sum()
        };
        let groups = [
            group_time(&decision.primary),
            group_time(&decision.secondary),
            group_time(&decision.international),
        ];
        let variable = if self.config.parallel_execution {
            groups.iter().copied().max().unwrap_or(0)
        } else {
            groups.iter().sum()
        };
        self.config.base_overhead_ms + variable
    }
}

fn sort_scored(scored: &mut [(f64, &SourceDescriptor)]) {
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
}

/// 主要源权重为2的文化真实度加权平均
fn cultural_relevance(decision: &RoutingDecision) -> f64 {
    let weighted = decision
        .primary
        .iter()
        .map(|s| (2.0, s.source.cultural_authenticity))
        .chain(
            decision
                .secondary
                .iter()
                .chain(decision.international.iter())
                .map(|s| (1.0, s.source.cultural_authenticity)),
        );

    let (total, weights) = weighted.fold((0.0, 0.0), |(total, weights), (w, v)| {
        (total + w * v, weights + w)
    });
    if weights > 0.0 {
        (total / weights).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn search_depth(strategy: RoutingStrategy, complexity: Complexity) -> SearchDepth {
    match strategy {
        RoutingStrategy::CostOptimized | RoutingStrategy::SpeedOptimized => SearchDepth::Basic,
        RoutingStrategy::Comprehensive | RoutingStrategy::Specialized => SearchDepth::Advanced,
        _ if complexity == Complexity::Simple => SearchDepth::Basic,
        _ => SearchDepth::Advanced,
    }
}

fn make_selection(
    source: SourceDescriptor,
    priority: u8,
    query: &str,
    depth: SearchDepth,
    max_results: usize,
    request: &ContentRequest,
    reason: String,
) -> SourceSelection {
    let filters = SearchFilters {
        include_domains: vec![source.domain.clone()],
        max_age_days: request
            .content_type
            .is_time_sensitive()
            .then_some(TIME_SENSITIVE_MAX_AGE_DAYS),
        language: Some(source.language.clone()),
    };
    SourceSelection {
        source,
        priority,
        query: query.to_string(),
        search_depth: depth,
        max_results,
        filters: Some(filters),
        reason,
    }
}

/// 构建1到3个检索词：主题、市场语境、关键词、SEO主关键词
pub fn build_queries(request: &ContentRequest) -> Vec<String> {
    let topic = request.topic.trim().to_string();
    let mut candidates = vec![topic.clone()];

    if request.market().is_local() {
        let mut parts = vec![topic.clone(), "Norge".to_string()];
        parts.extend(request.industry().map(|s| s.to_string()));
        parts.extend(request.business_type().map(|s| s.to_string()));
        candidates.push(parts.join(" "));
    }

    let keywords: Vec<&str> = request
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        candidates.push(keywords.join(" "));
    }

    if let Some(keyword) = request.seo_primary_keyword() {
        candidates.push(keyword.trim().to_string());
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|q| !q.is_empty() && seen.insert(q.to_lowercase()))
        .take(MAX_QUERIES)
        .collect()
}
