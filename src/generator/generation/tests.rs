#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use crate::config::GenerationConfig;
    use crate::cost::{CostLedger, CostSession, InMemoryCostLedger};
    use crate::error::{PipelineError, ProviderError, ProviderErrorKind};
    use crate::generator::generation::*;
    use crate::llm::client::types::{ModelPricing, ProviderCall, ProviderReply, TokenUsage};
    use crate::llm::client::{GenerationProvider, LLMClient, ModelCandidate};
    use crate::types::generation::AttemptStatus;
    use crate::types::request::{ContentRequest, ContentType, ProviderPreference};

    enum Script {
        Reply(&'static str),
        Fail(ProviderErrorKind),
        Hang,
    }

    struct ScriptedProvider {
        id: String,
        script: Script,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(id: &str, script: Script) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                script,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationProvider for ScriptedProvider {
        fn id(&self) -> &str {
            &self.id
        }

        async fn generate(&self, _call: &ProviderCall) -> Result<ProviderReply, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Reply(text) => Ok(ProviderReply {
                    text: text.to_string(),
                    usage: TokenUsage::new(200, 100),
                }),
                Script::Fail(ProviderErrorKind::RateLimited) => Err(ProviderError::RateLimited {
                    message: "429".to_string(),
                }),
                Script::Fail(_) => Err(ProviderError::Transport {
                    message: "connection reset".to_string(),
                }),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(ProviderReply {
                        text: "too late".to_string(),
                        usage: TokenUsage::new(1, 1),
                    })
                }
            }
        }
    }

    fn candidate(provider: &str, model: &str, price: f64) -> ModelCandidate {
        ModelCandidate {
            provider: provider.to_string(),
            model: model.to_string(),
            pricing: ModelPricing {
                input_per_1k: price,
                output_per_1k: price,
            },
        }
    }

    fn default_candidates() -> Vec<ModelCandidate> {
        vec![
            candidate("openai", "gpt-4o-mini", 0.001),
            candidate("anthropic", "claude-sonnet", 0.003),
            candidate("mistral", "mistral-large", 0.002),
        ]
    }

    fn config() -> GenerationConfig {
        GenerationConfig {
            long_form_provider: None,
            short_form_provider: None,
            ..GenerationConfig::default()
        }
    }

    fn session(limit: Option<f64>) -> (Arc<InMemoryCostLedger>, CostSession) {
        let ledger = Arc::new(InMemoryCostLedger::new(limit));
        let session = CostSession::new(ledger.clone(), "acme");
        (ledger, session)
    }

    fn prompt() -> GenerationPrompt {
        GenerationPrompt {
            system_prompt: "Du er en tekstforfatter.".to_string(),
            user_prompt: "Skriv om havvind.".to_string(),
        }
    }

    fn providers(candidates: &[ModelCandidate]) -> Vec<String> {
        candidates.iter().map(|c| c.provider.clone()).collect()
    }

    #[test]
    fn test_caller_preference_moves_to_front() {
        let mut request = ContentRequest::new("acme", "Havvind");
        request.preferred_provider = Some(ProviderPreference {
            provider: "mistral".to_string(),
            model: None,
        });
        let ordered = order_candidates(&request, &default_candidates(), Some("anthropic"), None);
        assert_eq!(providers(&ordered), vec!["mistral", "openai", "anthropic"]);
    }

    #[test]
    fn test_content_type_picks_provider_family() {
        let mut request = ContentRequest::new("acme", "Havvind");
        request.content_type = ContentType::Whitepaper;
        let ordered = order_candidates(
            &request,
            &default_candidates(),
            Some("anthropic"),
            Some("mistral"),
        );
        assert_eq!(providers(&ordered)[0], "anthropic");

        request.content_type = ContentType::SocialPost;
        let ordered = order_candidates(
            &request,
            &default_candidates(),
            Some("anthropic"),
            Some("mistral"),
        );
        assert_eq!(providers(&ordered)[0], "mistral");

        let ordered = order_candidates(&request, &default_candidates(), None, None);
        assert_eq!(ordered, default_candidates());
    }

    #[tokio::test]
    async fn test_all_failing_providers_are_each_tried_once() {
        let openai = ScriptedProvider::new("openai", Script::Fail(ProviderErrorKind::Transport));
        let anthropic =
            ScriptedProvider::new("anthropic", Script::Fail(ProviderErrorKind::RateLimited));
        let mistral = ScriptedProvider::new("mistral", Script::Fail(ProviderErrorKind::Transport));
        let client = LLMClient::with_candidates(default_candidates())
            .with_provider(openai.clone())
            .with_provider(anthropic.clone())
            .with_provider(mistral.clone());
        let orchestrator = GenerationOrchestrator::new(client, config());

        let (ledger, mut session) = session(None);
        let request = ContentRequest::new("acme", "Havvind");
        let err = orchestrator
            .generate(&request, &prompt(), &mut session, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            PipelineError::AllProvidersFailed { attempts } => {
                assert_eq!(attempts.len(), 3);
                assert!(matches!(
                    attempts[1].status,
                    AttemptStatus::Failed {
                        kind: ProviderErrorKind::RateLimited,
                        ..
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(openai.calls(), 1);
        assert_eq!(anthropic.calls(), 1);
        assert_eq!(mistral.calls(), 1);
        drop(session);
        assert_eq!(ledger.spent("acme"), 0.0);
    }

    #[tokio::test]
    async fn test_falls_back_to_next_candidate() {
        let openai = ScriptedProvider::new("openai", Script::Fail(ProviderErrorKind::Transport));
        let anthropic = ScriptedProvider::new("anthropic", Script::Reply("Havvind gir nye muligheter."));
        let client = LLMClient::with_candidates(default_candidates())
            .with_provider(openai.clone())
            .with_provider(anthropic.clone());
        let orchestrator = GenerationOrchestrator::new(client, config());

        let (ledger, mut session) = session(None);
        let request = ContentRequest::new("acme", "Havvind");
        let outcome = orchestrator
            .generate(&request, &prompt(), &mut session, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.result.provider, "anthropic");
        assert!(!outcome.result.cache_hit);
        assert!(outcome.result.cost >= 0.0);
        assert_eq!(
            outcome.result.usage.total_tokens,
            outcome.result.usage.prompt_tokens + outcome.result.usage.completion_tokens
        );
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.attempts[1].status, AttemptStatus::Succeeded);

        session.commit();
        assert!((ledger.spent("acme") - outcome.result.cost).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_unregistered_provider_is_skipped_as_unavailable() {
        let anthropic = ScriptedProvider::new("anthropic", Script::Reply("Tekst."));
        let client =
            LLMClient::with_candidates(default_candidates()).with_provider(anthropic.clone());
        let orchestrator = GenerationOrchestrator::new(client, config());

        let (_ledger, mut session) = session(None);
        let outcome = orchestrator
            .generate(
                &ContentRequest::new("acme", "Havvind"),
                &prompt(),
                &mut session,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(matches!(
            outcome.attempts[0].status,
            AttemptStatus::Failed {
                kind: ProviderErrorKind::Unavailable,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_over_budget_candidate_is_skipped() {
        let candidates = vec![
            candidate("anthropic", "claude-opus", 100.0),
            candidate("openai", "gpt-4o-mini", 0.0),
        ];
        let anthropic = ScriptedProvider::new("anthropic", Script::Reply("Dyr tekst."));
        let openai = ScriptedProvider::new("openai", Script::Reply("Billig tekst."));
        let client = LLMClient::with_candidates(candidates)
            .with_provider(anthropic.clone())
            .with_provider(openai.clone());
        let orchestrator = GenerationOrchestrator::new(client, config());

        let (_ledger, mut session) = session(Some(0.5));
        let outcome = orchestrator
            .generate(
                &ContentRequest::new("acme", "Havvind"),
                &prompt(),
                &mut session,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.result.provider, "openai");
        assert!(matches!(
            outcome.attempts[0].status,
            AttemptStatus::SkippedBudget { .. }
        ));
        assert_eq!(anthropic.calls(), 0);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let slow = ScriptedProvider::new("openai", Script::Hang);
        let fast = ScriptedProvider::new("anthropic", Script::Reply("Raskt svar."));
        let client = LLMClient::with_candidates(default_candidates())
            .with_provider(slow.clone())
            .with_provider(fast.clone());
        let config = GenerationConfig {
            timeout_seconds: 0,
            ..config()
        };
        let orchestrator = GenerationOrchestrator::new(client, config);

        let (_ledger, mut session) = session(None);
        let outcome = orchestrator
            .generate(
                &ContentRequest::new("acme", "Havvind"),
                &prompt(),
                &mut session,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(matches!(
            outcome.attempts[0].status,
            AttemptStatus::Failed {
                kind: ProviderErrorKind::Timeout,
                ..
            }
        ));
        assert_eq!(outcome.result.provider, "anthropic");
    }

    #[tokio::test]
    async fn test_cancelled_request_stops_the_chain() {
        let openai = ScriptedProvider::new("openai", Script::Reply("Tekst."));
        let client = LLMClient::with_candidates(default_candidates()).with_provider(openai.clone());
        let orchestrator = GenerationOrchestrator::new(client, config());

        let cancel = CancellationToken::new();
        cancel.cancel();
        let (_ledger, mut session) = session(None);
        let err = orchestrator
            .generate(&ContentRequest::new("acme", "Havvind"), &prompt(), &mut session, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
        assert_eq!(openai.calls(), 0);
    }
}
