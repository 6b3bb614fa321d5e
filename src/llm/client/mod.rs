//! LLM客户端 - 提供统一的文本生成服务接口

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::error::ProviderError;

mod providers;
pub mod types;
pub mod utils;

use providers::ProviderClient;
use types::{ModelPricing, ProviderCall, ProviderReply};
use utils::estimate_token_usage;

/// 文本生成服务接口
///
/// 错误需区分超时、限流、传输与参数错误，回退链依此决定后续动作。
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn generate(&self, call: &ProviderCall) -> Result<ProviderReply, ProviderError>;
}

/// 基于rig的模型服务实现
pub struct RigGenerationProvider {
    id: String,
    client: ProviderClient,
}

impl RigGenerationProvider {
    pub fn new(profile: &crate::config::ProviderProfile) -> Result<Self> {
        Ok(Self {
            id: profile.id.clone(),
            client: ProviderClient::new(profile)?,
        })
    }
}

#[async_trait]
impl GenerationProvider for RigGenerationProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, call: &ProviderCall) -> Result<ProviderReply, ProviderError> {
        let agent = self
            .client
            .create_agent(&call.model, &call.system_prompt, call.temperature, call.max_tokens)
            .map_err(|e| ProviderError::Validation {
                message: e.to_string(),
            })?;

        let text = agent
            .prompt(&call.user_prompt)
            .await
            .map_err(|e| ProviderError::classify(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ProviderError::Transport {
                message: "provider returned an empty completion".to_string(),
            });
        }

        // rig的prompt接口不返回用量，这里按文本估算
        let usage = estimate_token_usage(
            &format!("{}\n{}", call.system_prompt, call.user_prompt),
            &text,
        );
        Ok(ProviderReply { text, usage })
    }
}

/// 回退链中的一个候选（服务商 + 模型）
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCandidate {
    pub provider: String,
    pub model: String,
    pub pricing: ModelPricing,
}

/// LLM客户端 - 持有已注册的服务商与默认候选顺序
#[derive(Clone, Default)]
pub struct LLMClient {
    providers: HashMap<String, Arc<dyn GenerationProvider>>,
    candidates: Vec<ModelCandidate>,
}

impl LLMClient {
    /// 根据配置创建所有服务商客户端
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let mut client = Self::default();
        for profile in &config.providers {
            let provider = RigGenerationProvider::new(profile)?;
            client = client.with_provider(Arc::new(provider));
        }
        client.candidates = candidates_from_config(config);
        Ok(client)
    }

    /// 使用自定义服务商与候选列表创建，测试与嵌入场景使用
    pub fn with_candidates(candidates: Vec<ModelCandidate>) -> Self {
        Self {
            providers: HashMap::new(),
            candidates,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.providers.insert(provider.id().to_string(), provider);
        self
    }

    pub fn provider(&self, id: &str) -> Option<Arc<dyn GenerationProvider>> {
        self.providers.get(id).cloned()
    }

    /// 默认候选顺序
    pub fn candidates(&self) -> &[ModelCandidate] {
        &self.candidates
    }
}

/// 按配置顺序展开服务商与模型
pub fn candidates_from_config(config: &GenerationConfig) -> Vec<ModelCandidate> {
    config
        .providers
        .iter()
        .flat_map(|profile| {
            profile.models.iter().map(|model| ModelCandidate {
                provider: profile.id.clone(),
                model: model.name.clone(),
                pricing: model.pricing(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_follow_config_order() {
        let config = GenerationConfig::default();
        let candidates = candidates_from_config(&config);
        let pairs: Vec<_> = candidates
            .iter()
            .map(|c| (c.provider.as_str(), c.model.as_str()))
            .collect();
        assert_eq!(pairs[0], ("openai", "gpt-4o-mini"));
        assert_eq!(pairs[2].0, "anthropic");
        assert_eq!(pairs.last().unwrap().0, "mistral");
        assert_eq!(candidates.len(), 5);
    }
}
