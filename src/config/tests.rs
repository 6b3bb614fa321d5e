#[cfg(test)]
mod tests {
    use crate::config::{CacheConfig, Config, GenerationConfig, LLMProvider, RoutingConfig};
    use crate::types::request::ContentType;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.routing.max_primary_sources, 3);
        assert_eq!(config.routing.max_secondary_sources, 2);
        assert_eq!(config.research.max_items, 8);
        assert_eq!(config.research.timeout_seconds, 30);
        assert_eq!(config.quality.max_refinement_iterations, 3);
        assert_eq!(config.analysis.min_insight_relevance, 0.2);
        assert!(config.sources.is_empty());
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!(
            "openai".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "Anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "mistral".parse::<LLMProvider>().unwrap(),
            LLMProvider::Mistral
        );
        assert_eq!(
            "ollama".parse::<LLMProvider>().unwrap(),
            LLMProvider::Ollama
        );

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::DeepSeek.to_string(), "deepseek");
        assert_eq!(LLMProvider::OpenRouter.to_string(), "openrouter");
        assert_eq!(LLMProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_routing_config_default() {
        let config = RoutingConfig::default();

        assert_eq!(config.min_trust_score, 7.0);
        assert!(config.parallel_execution);
        assert!(config.authenticated_domains.is_empty());
        assert!(config.advanced_query_cost > config.basic_query_cost);
    }

    #[test]
    fn test_generation_config_default_chain() {
        let config = GenerationConfig::default();

        let ids: Vec<_> = config.providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["openai", "anthropic", "mistral"]);
        assert!(config.providers.iter().all(|p| !p.models.is_empty()));
        assert_eq!(config.long_form_provider.as_deref(), Some("anthropic"));
        assert_eq!(config.short_form_provider.as_deref(), Some("openai"));
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_cache_ttl_by_content_type() {
        let config = CacheConfig::default();

        assert_eq!(config.ttl_seconds_for(ContentType::SocialPost), 6 * 3600);
        assert_eq!(config.ttl_seconds_for(ContentType::Email), 24 * 3600);
        assert_eq!(config.ttl_seconds_for(ContentType::Whitepaper), 7 * 24 * 3600);
        assert_eq!(config.cache_dir, PathBuf::from(".skrive/cache"));
    }

    #[test]
    fn test_config_from_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("skrive.toml");
        let content = r#"
verbose = true

[routing]
max_primary_sources = 2
research_budget = 0.02

[budget]
per_caller_limit = 5.0

[[generation.providers]]
id = "local"
provider = "ollama"

[[generation.providers.models]]
name = "llama3.1"
input_per_1k = 0.0
output_per_1k = 0.0
"#;
        std::fs::write(&config_path, content).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert!(config.verbose);
        assert_eq!(config.routing.max_primary_sources, 2);
        assert_eq!(config.routing.max_secondary_sources, 2);
        assert_eq!(config.routing.research_budget, 0.02);
        assert_eq!(config.budget.per_caller_limit, 5.0);
        assert_eq!(config.generation.providers.len(), 1);
        assert_eq!(config.generation.providers[0].provider, LLMProvider::Ollama);
        assert_eq!(config.generation.providers[0].models[0].name, "llama3.1");
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/skrive.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[routing\nmax_primary_sources = ").unwrap();

        assert!(Config::from_file(&config_path).is_err());
    }
}
