use serde::{Deserialize, Serialize};

/// Token使用情况，total始终等于prompt + completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl TokenUsage {
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// 按模型价格表计算成本（美元）
    pub fn estimate_cost(&self, pricing: &ModelPricing) -> f64 {
        pricing.cost_for(self.prompt_tokens, self.completion_tokens)
    }
}

impl std::ops::Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage::new(
            self.prompt_tokens + rhs.prompt_tokens,
            self.completion_tokens + rhs.completion_tokens,
        )
    }
}

/// 模型价格（每1000 tokens，美元）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelPricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl ModelPricing {
    pub fn cost_for(&self, prompt_tokens: usize, completion_tokens: usize) -> f64 {
        let cost = prompt_tokens as f64 / 1000.0 * self.input_per_1k
            + completion_tokens as f64 / 1000.0 * self.output_per_1k;
        cost.max(0.0)
    }
}

/// 单次模型调用参数
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCall {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// 模型调用返回
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub text: String,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_parts() {
        let usage = TokenUsage::new(120, 380);
        assert_eq!(usage.total_tokens, 500);
        let combined = usage + TokenUsage::new(10, 20);
        assert_eq!(combined.total_tokens, combined.prompt_tokens + combined.completion_tokens);
        assert_eq!(combined.total_tokens, 530);
    }

    #[test]
    fn test_estimate_cost_from_pricing() {
        let pricing = ModelPricing {
            input_per_1k: 0.003,
            output_per_1k: 0.015,
        };
        let usage = TokenUsage::new(2000, 1000);
        assert!((usage.estimate_cost(&pricing) - 0.021).abs() < 1e-9);
    }
}
