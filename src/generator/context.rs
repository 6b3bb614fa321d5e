use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::cache::{CacheManager, CacheStore};
use crate::config::Config;
use crate::cost::{CostLedger, InMemoryCostLedger};
use crate::generator::adaptation::CulturalAdapter;
use crate::generator::generation::GenerationOrchestrator;
use crate::generator::quality::QualityScorer;
use crate::generator::research::analyzer::ContentAnalyzer;
use crate::llm::client::LLMClient;
use crate::research::{ResearchProvider, TavilyResearchProvider};
use crate::sources::SourceRegistry;

/// 生成流水线的全部依赖，由调用方显式构造后注入
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    /// 研究源目录，进程内只读
    pub registry: Arc<SourceRegistry>,
    /// 研究检索服务，未配置时跳过研究收集
    pub research_provider: Option<Arc<dyn ResearchProvider>>,
    /// 生成编排器
    pub orchestrator: GenerationOrchestrator,
    /// 成本台账
    pub cost_ledger: Arc<dyn CostLedger>,
    /// 缓存管理器
    pub cache_manager: Arc<CacheManager>,
    pub analyzer: ContentAnalyzer,
    pub adapter: CulturalAdapter,
    pub scorer: QualityScorer,
}

impl GeneratorContext {
    /// 根据配置创建真实的服务商、检索客户端与文件缓存
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::from_config(&config.generation)?;

        let research_provider: Option<Arc<dyn ResearchProvider>> =
            if config.research.api_key.trim().is_empty() {
                warn!("No search API key configured, research gathering is disabled");
                None
            } else {
                Some(Arc::new(TavilyResearchProvider::new(&config.research)?))
            };

        let cost_ledger: Arc<dyn CostLedger> = Arc::new(InMemoryCostLedger::new(
            Some(config.budget.per_caller_limit).filter(|limit| *limit > 0.0),
        ));
        let cache_manager = Arc::new(CacheManager::from_config(config.cache.clone()));

        Ok(Self::with_dependencies(
            config,
            llm_client,
            research_provider,
            cost_ledger,
            cache_manager,
        ))
    }

    /// 使用外部提供的协作者创建，测试与嵌入场景使用
    pub fn with_dependencies(
        config: Config,
        llm_client: LLMClient,
        research_provider: Option<Arc<dyn ResearchProvider>>,
        cost_ledger: Arc<dyn CostLedger>,
        cache_manager: Arc<CacheManager>,
    ) -> Self {
        let registry = Arc::new(SourceRegistry::builtin().with_additional(&config.sources));
        let orchestrator = GenerationOrchestrator::new(llm_client, config.generation.clone());
        let analyzer = ContentAnalyzer::new(config.analysis.clone());

        Self {
            config,
            registry,
            research_provider,
            orchestrator,
            cost_ledger,
            cache_manager,
            analyzer,
            adapter: CulturalAdapter::default(),
            scorer: QualityScorer::default(),
        }
    }

    /// 替换缓存存储，保留缓存配置
    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_manager = Arc::new(CacheManager::new(self.config.cache.clone(), store));
        self
    }
}
