//! 研究收集：并发抓取所有选中的研究源，容忍部分失败

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ResearchConfig;
use crate::error::ResearchError;
use crate::research::{ResearchProvider, SearchHit};
use crate::types::research::{ItemMetadata, ResearchItem, ResearchOutcome, SourceFetchFailure};
use crate::types::routing::SourceSelection;
use crate::utils::text::{significant_words, truncate_chars, word_count};
use crate::utils::threads::gather_tolerant;

/// 置信度权重加成
const AUTHOR_BOOST: f64 = 0.2;
const DATE_BOOST: f64 = 0.2;
const ARTICLE_BOOST: f64 = 0.1;

pub struct ResearchGatherer {
    provider: Arc<dyn ResearchProvider>,
    timeout: Duration,
    max_items: usize,
    max_parallels: usize,
    scrape_below_chars: usize,
    snippet_max_chars: usize,
}

impl ResearchGatherer {
    pub fn new(provider: Arc<dyn ResearchProvider>, config: &ResearchConfig) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(config.timeout_seconds),
            max_items: config.max_items,
            max_parallels: config.max_parallels,
            scrape_below_chars: config.scrape_below_chars,
            snippet_max_chars: config.snippet_max_chars,
        }
    }

    /// 覆盖单次外部调用的超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 并发执行所有检索，等待全部结束后去重、排序并截断
    pub async fn gather(&self, selections: &[SourceSelection]) -> ResearchOutcome {
        if selections.is_empty() {
            return ResearchOutcome::default();
        }

        let futures: Vec<_> = selections
            .iter()
            .map(|selection| self.fetch_selection(selection))
            .collect();
        let (batches, failures) = gather_tolerant(futures, self.max_parallels).await;

        for failure in &failures {
            warn!(
                source = %failure.source_id,
                query = %failure.query,
                error = %failure.error,
                "research source failed"
            );
        }

        let items = rank_items(batches.into_iter().flatten().collect(), self.max_items);
        let confidence = research_confidence(&items);

        info!(
            sources = selections.len(),
            failed = failures.len(),
            items = items.len(),
            confidence,
            "research gathered"
        );

        ResearchOutcome {
            items,
            failures,
            confidence,
        }
    }

    async fn fetch_selection(
        &self,
        selection: &SourceSelection,
    ) -> Result<Vec<ResearchItem>, SourceFetchFailure> {
        let failure = |error: ResearchError| SourceFetchFailure {
            source_id: selection.source.id.clone(),
            query: selection.query.clone(),
            error: error.to_string(),
        };

        let search = self.provider.search(
            &selection.query,
            selection.max_results,
            selection.search_depth,
            selection.filters.as_ref(),
        );
        let hits = match tokio::time::timeout(self.timeout, search).await {
            Ok(result) => result.map_err(failure)?,
            Err(_) => {
                return Err(failure(ResearchError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }));
            }
        };

        let topic_words = significant_words(&selection.query);
        let mut items = Vec::with_capacity(hits.len());
        for hit in hits.into_iter().take(selection.max_results) {
            let hit = self.enrich(selection, hit).await;
            items.push(self.to_item(selection, hit, &topic_words));
        }
        Ok(items)
    }

    /// 摘要过短且源允许抓取时，尝试抓取全文
    async fn enrich(&self, selection: &SourceSelection, mut hit: SearchHit) -> SearchHit {
        if !selection.source.scraping_allowed || hit.content.chars().count() >= self.scrape_below_chars
        {
            return hit;
        }

        match tokio::time::timeout(self.timeout, self.provider.scrape(&hit.url)).await {
            Ok(Ok(page)) => {
                if page.content.chars().count() > hit.content.chars().count() {
                    hit.content = page.content;
                }
                if hit.title.is_empty() {
                    hit.title = page.title;
                }
                hit.author = hit.author.or(page.author);
                hit.published_date = hit.published_date.or(page.date);
            }
            Ok(Err(e)) => debug!(url = %hit.url, error = %e, "scrape failed, keeping snippet"),
            Err(_) => debug!(url = %hit.url, "scrape timed out, keeping snippet"),
        }
        hit
    }

    fn to_item(
        &self,
        selection: &SourceSelection,
        hit: SearchHit,
        topic_words: &[String],
    ) -> ResearchItem {
        let relevance = match hit.score {
            Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
            _ => lexical_relevance(&format!("{} {}", hit.title, hit.content), topic_words),
        };
        let metadata = ItemMetadata {
            author: hit.author,
            published_date: hit.published_date,
            classification: hit.classification,
            language: Some(selection.source.language.clone()),
            word_count: word_count(&hit.content),
        };
        ResearchItem {
            source_id: selection.source.id.clone(),
            url: hit.url,
            title: hit.title,
            snippet: truncate_chars(&hit.content, self.snippet_max_chars),
            relevance,
            credibility: (selection.source.trust_score / 10.0).clamp(0.0, 1.0),
            metadata,
        }
    }
}

/// 命中主题词的比例
fn lexical_relevance(text: &str, topic_words: &[String]) -> f64 {
    if topic_words.is_empty() {
        return 0.0;
    }
    let text = text.to_lowercase();
    let hits = topic_words.iter().filter(|w| text.contains(w.as_str())).count();
    hits as f64 / topic_words.len() as f64
}

/// 按url去重（保留首次出现）、按相关度降序排序并截断
pub fn rank_items(items: Vec<ResearchItem>, max_items: usize) -> Vec<ResearchItem> {
    let mut seen = HashSet::new();
    let mut unique: Vec<ResearchItem> = items
        .into_iter()
        .filter(|item| seen.insert(item.url.clone()))
        .collect();
    unique.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    unique.truncate(max_items);
    unique
}

/// 相关度的加权平均，带作者、日期或文章分类的条目权重更高
pub fn research_confidence(items: &[ResearchItem]) -> f64 {
    let (weighted, weights) = items.iter().fold((0.0, 0.0), |(weighted, weights), item| {
        let mut weight = 1.0;
        if item.metadata.author.is_some() {
            weight += AUTHOR_BOOST;
        }
        if item.metadata.published_date.is_some() {
            weight += DATE_BOOST;
        }
        if item.metadata.is_article() {
            weight += ARTICLE_BOOST;
        }
        (weighted + weight * item.relevance, weights + weight)
    });
    if weights > 0.0 {
        (weighted / weights).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::ScrapedPage;
    use crate::sources::SourceRegistry;
    use crate::types::routing::{SearchDepth, SearchFilters};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按域名返回固定结果的检索服务
    struct ScriptedProvider {
        failing: Vec<String>,
        slow: Vec<String>,
        scrapes: AtomicUsize,
    }

    #[async_trait]
    impl ResearchProvider for ScriptedProvider {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
            _depth: SearchDepth,
            filters: Option<&SearchFilters>,
        ) -> Result<Vec<SearchHit>, ResearchError> {
            let domain = filters
                .and_then(|f| f.include_domains.first().cloned())
                .unwrap_or_default();
            if self.failing.contains(&domain) {
                return Err(ResearchError::Http { status: 503 });
            }
            if self.slow.contains(&domain) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            let score = domain.len() as f64 / 20.0;
            Ok(vec![
                SearchHit {
                    url: format!("https://{}/rapport", domain),
                    title: format!("Rapport fra {}", domain),
                    content: "x".repeat(400),
                    score: Some(score),
                    author: Some("Kari Nordmann".to_string()),
                    published_date: None,
                    classification: Some("article".to_string()),
                },
                SearchHit {
                    url: "https://shared.example/samme".to_string(),
                    title: "Felles".to_string(),
                    content: "kort".to_string(),
                    score: Some(0.1),
                    author: None,
                    published_date: None,
                    classification: None,
                },
            ])
        }

        async fn scrape(&self, _url: &str) -> Result<ScrapedPage, ResearchError> {
            self.scrapes.fetch_add(1, Ordering::SeqCst);
            Ok(ScrapedPage {
                title: String::new(),
                content: "utvidet innhold ".repeat(40),
                author: None,
                date: Some("2025-01-01".to_string()),
            })
        }
    }

    fn selections(count: usize) -> Vec<SourceSelection> {
        SourceRegistry::builtin()
            .all()
            .iter()
            .filter(|s| !s.requires_auth)
            .take(count)
            .map(|source| SourceSelection {
                source: source.clone(),
                priority: 1,
                query: "grønn omstilling".to_string(),
                search_depth: SearchDepth::Basic,
                max_results: 5,
                filters: Some(SearchFilters {
                    include_domains: vec![source.domain.clone()],
                    ..SearchFilters::default()
                }),
                reason: "test".to_string(),
            })
            .collect()
    }

    fn gatherer(provider: ScriptedProvider, max_items: usize) -> ResearchGatherer {
        let config = ResearchConfig {
            max_items,
            ..ResearchConfig::default()
        };
        ResearchGatherer::new(Arc::new(provider), &config).with_timeout(Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_partial_failures_keep_successful_items() {
        let selections = selections(10);
        let failing = selections
            .iter()
            .take(6)
            .map(|s| s.source.domain.clone())
            .collect();
        let provider = ScriptedProvider {
            failing,
            slow: vec![],
            scrapes: AtomicUsize::new(0),
        };

        let outcome = gatherer(provider, 20).gather(&selections).await;
        assert_eq!(outcome.failures.len(), 6);
        // 4个成功源各一条，外加一条共享url
        assert_eq!(outcome.items.len(), 5);
        let urls: HashSet<_> = outcome.items.iter().map(|i| i.url.clone()).collect();
        assert_eq!(urls.len(), outcome.items.len());
        for selection in selections.iter().skip(6) {
            assert!(outcome.items.iter().any(|i| i.source_id == selection.source.id));
        }
    }

    #[tokio::test]
    async fn test_items_are_ranked_and_capped() {
        let provider = ScriptedProvider {
            failing: vec![],
            slow: vec![],
            scrapes: AtomicUsize::new(0),
        };
        let outcome = gatherer(provider, 8).gather(&selections(12)).await;
        assert_eq!(outcome.items.len(), 8);
        for pair in outcome.items.windows(2) {
            assert!(pair[0].relevance >= pair[1].relevance);
        }
        assert!(outcome.confidence > 0.0 && outcome.confidence <= 1.0);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let selections = selections(2);
        let provider = ScriptedProvider {
            failing: vec![],
            slow: vec![selections[0].source.domain.clone()],
            scrapes: AtomicUsize::new(0),
        };
        let outcome = gatherer(provider, 8).gather(&selections).await;
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].error.contains("timed out"));
        assert!(outcome.items.iter().all(|i| i.source_id == selections[1].source.id));
    }

    #[tokio::test]
    async fn test_short_snippets_are_scraped() {
        let provider = Arc::new(ScriptedProvider {
            failing: vec![],
            slow: vec![],
            scrapes: AtomicUsize::new(0),
        });
        let gatherer = ResearchGatherer::new(provider.clone(), &ResearchConfig::default());
        let outcome = gatherer.gather(&selections(1)).await;

        assert_eq!(provider.scrapes.load(Ordering::SeqCst), 1);
        let shared = outcome
            .items
            .iter()
            .find(|i| i.url == "https://shared.example/samme")
            .unwrap();
        assert!(shared.snippet.starts_with("utvidet innhold"));
        assert_eq!(shared.metadata.published_date.as_deref(), Some("2025-01-01"));
    }

    #[tokio::test]
    async fn test_empty_outcome_has_zero_confidence() {
        let provider = ScriptedProvider {
            failing: vec![],
            slow: vec![],
            scrapes: AtomicUsize::new(0),
        };
        let outcome = gatherer(provider, 8).gather(&[]).await;
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(research_confidence(&[]), 0.0);
    }

    /// 记录每次检索收到的深度
    #[derive(Default)]
    struct DepthRecorder {
        depths: std::sync::Mutex<Vec<SearchDepth>>,
    }

    #[async_trait]
    impl ResearchProvider for DepthRecorder {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
            depth: SearchDepth,
            _filters: Option<&SearchFilters>,
        ) -> Result<Vec<SearchHit>, ResearchError> {
            self.depths.lock().unwrap().push(depth);
            Ok(vec![])
        }

        async fn scrape(&self, url: &str) -> Result<ScrapedPage, ResearchError> {
            Err(ResearchError::Parse {
                message: format!("unexpected scrape of {}", url),
            })
        }
    }

    #[tokio::test]
    async fn test_selection_depth_reaches_provider() {
        let mut selections = selections(2);
        selections[0].search_depth = SearchDepth::Advanced;

        let recorder = Arc::new(DepthRecorder::default());
        let gatherer = ResearchGatherer::new(recorder.clone(), &ResearchConfig::default());
        let outcome = gatherer.gather(&selections).await;
        assert!(outcome.failures.is_empty());

        let mut depths = recorder.depths.lock().unwrap().clone();
        depths.sort_by_key(|d| *d == SearchDepth::Basic);
        assert_eq!(depths, vec![SearchDepth::Advanced, SearchDepth::Basic]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let item = |url: &str, source: &str, relevance: f64| ResearchItem {
            source_id: source.to_string(),
            url: url.to_string(),
            title: String::new(),
            snippet: String::new(),
            relevance,
            credibility: 0.5,
            metadata: ItemMetadata::default(),
        };
        let ranked = rank_items(
            vec![item("a", "first", 0.2), item("b", "x", 0.9), item("a", "second", 0.8)],
            8,
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].url, "b");
        assert_eq!(ranked[1].source_id, "first");
    }
}
