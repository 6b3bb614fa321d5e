//! 文化适配：按顺序执行适配步骤，再对结果评分

use tracing::debug;

use crate::i18n::OutputLanguage;
use crate::types::adaptation::CulturalAdaptationResult;
use crate::types::request::{Audience, ContentRequest, ContentType, Formality, Market};

pub mod passes;
pub mod scoring;
pub mod tables;

pub use passes::{AdaptationPass, PassOutput, default_passes};
pub use tables::AdaptationTables;

/// 适配所需的请求上下文
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptationContext {
    pub market: Market,
    pub industry: Option<String>,
    pub formality: Formality,
    pub audience: Audience,
    pub language: OutputLanguage,
    pub content_type: ContentType,
}

impl AdaptationContext {
    pub fn from_request(request: &ContentRequest) -> Self {
        Self {
            market: request.market(),
            industry: request.industry().map(str::to_string),
            formality: request.formality(),
            audience: request.audience,
            language: request.output_language,
            content_type: request.content_type,
        }
    }
}

/// 文化适配器
pub struct CulturalAdapter {
    passes: Vec<Box<dyn AdaptationPass>>,
    tables: AdaptationTables,
}

impl Default for CulturalAdapter {
    fn default() -> Self {
        Self::new(AdaptationTables::default())
    }
}

impl CulturalAdapter {
    pub fn new(tables: AdaptationTables) -> Self {
        Self {
            passes: default_passes(),
            tables,
        }
    }

    /// 使用自定义步骤序列
    pub fn with_passes(tables: AdaptationTables, passes: Vec<Box<dyn AdaptationPass>>) -> Self {
        Self { passes, tables }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn adapt(&self, text: &str, context: &AdaptationContext) -> CulturalAdaptationResult {
        let mut current = text.to_string();
        let mut changes = Vec::new();

        for pass in &self.passes {
            let output = pass.apply(&current, context, &self.tables);
            if !output.changes.is_empty() {
                debug!(
                    pass = pass.name(),
                    changes = output.changes.len(),
                    "Adaptation pass changed text"
                );
            }
            current = output.text;
            changes.extend(output.changes);
        }

        let compliance =
            scoring::compliance(&current, context.language, context.formality, &self.tables);
        let cultural_score = scoring::cultural_score(&compliance);
        let recommendations = scoring::recommendations(&compliance);

        CulturalAdaptationResult {
            adapted_text: current,
            changes,
            compliance,
            cultural_score,
            recommendations,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
