use crate::{
    llm::client::types::{ModelPricing, ProviderCall, TokenUsage},
    utils::token_estimator::TokenEstimator,
};

use std::sync::LazyLock;

static TOKEN_ESTIMATOR: LazyLock<TokenEstimator> = LazyLock::new(TokenEstimator::new);

/// 估算token使用情况（基于文本长度）
pub fn estimate_token_usage(input_text: &str, output_text: &str) -> TokenUsage {
    let input_estimate = TOKEN_ESTIMATOR.estimate_tokens(input_text);
    let output_estimate = TOKEN_ESTIMATOR.estimate_tokens(output_text);
    TokenUsage::new(
        input_estimate.estimated_tokens,
        output_estimate.estimated_tokens,
    )
}

/// 调用前估算成本：输入按prompt估算，输出按目标字数估算并受max_tokens限制
pub fn estimate_call_cost(call: &ProviderCall, target_words: usize, pricing: &ModelPricing) -> f64 {
    let prompt_tokens = TOKEN_ESTIMATOR
        .estimate_tokens(&format!("{}\n{}", call.system_prompt, call.user_prompt))
        .estimated_tokens;
    let completion_tokens = TOKEN_ESTIMATOR
        .estimate_output_tokens(target_words)
        .min(call.max_tokens as usize);
    pricing.cost_for(prompt_tokens, completion_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(max_tokens: u32) -> ProviderCall {
        ProviderCall {
            system_prompt: "Du er en erfaren norsk tekstforfatter.".to_string(),
            user_prompt: "Skriv et innlegg om havvind.".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens,
        }
    }

    #[test]
    fn test_estimated_usage_total_matches_parts() {
        let usage = estimate_token_usage("hei på deg", "svar");
        assert_eq!(usage.total_tokens, usage.prompt_tokens + usage.completion_tokens);
    }

    #[test]
    fn test_call_cost_is_capped_by_max_tokens() {
        let pricing = ModelPricing {
            input_per_1k: 0.0,
            output_per_1k: 1.0,
        };
        let uncapped = estimate_call_cost(&call(100_000), 1000, &pricing);
        let capped = estimate_call_cost(&call(100), 1000, &pricing);
        assert!((uncapped - 1.6).abs() < 1e-9);
        assert!((capped - 0.1).abs() < 1e-9);
    }
}
