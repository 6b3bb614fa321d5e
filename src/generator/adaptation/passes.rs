//! 六个有序、可组合的适配步骤

use crate::types::adaptation::{AdaptationChange, ChangeType, Impact};
use crate::types::request::{Audience, Formality};
use crate::utils::text::{
    match_case, paragraphs, phrase_regex, split_sentences, tidy_whitespace, word_count,
};

use super::AdaptationContext;
use super::tables::{AdaptationTables, PhrasePairs};

/// 需要追加协作表述的最短字数
const COLLABORATIVE_MIN_WORDS: usize = 150;

/// 单段文本超过该字数时拆分为三段
const STRUCTURE_SPLIT_WORDS: usize = 120;

/// 首句少于该字数时补充语境句
const SHORT_OPENING_WORDS: usize = 5;

/// 单个步骤的输出
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutput {
    pub text: String,
    pub changes: Vec<AdaptationChange>,
}

impl PassOutput {
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changes: Vec::new(),
        }
    }

    /// 在本步骤结果上继续替换
    fn then_replace(
        mut self,
        pairs: PhrasePairs,
        change_type: ChangeType,
        reason: &str,
        impact: Impact,
    ) -> Self {
        let next = replace_phrases(&self.text, pairs, change_type, reason, impact);
        self.text = next.text;
        self.changes.extend(next.changes);
        self
    }
}

/// 文化适配步骤
pub trait AdaptationPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        text: &str,
        context: &AdaptationContext,
        tables: &AdaptationTables,
    ) -> PassOutput;
}

/// 按表替换短语（大小写不敏感、按词边界），每处替换记录一条变更
pub fn replace_phrases(
    text: &str,
    pairs: PhrasePairs,
    change_type: ChangeType,
    reason: &str,
    impact: Impact,
) -> PassOutput {
    let mut current = text.to_string();
    let mut changes = Vec::new();
    let mut removed_any = false;

    for (phrase, replacement) in pairs {
        let Some(pattern) = phrase_regex(phrase) else {
            continue;
        };
        if !pattern.is_match(&current) {
            continue;
        }
        current = pattern
            .replace_all(&current, |caps: &regex::Captures| {
                let original = &caps[0];
                let adapted = match_case(original, replacement);
                changes.push(AdaptationChange {
                    change_type,
                    original: original.to_string(),
                    adapted: adapted.clone(),
                    reason: reason.to_string(),
                    impact,
                });
                adapted
            })
            .into_owned();
        removed_any |= replacement.is_empty();
    }

    if removed_any {
        current = tidy_whitespace(&current)
            .replace(" ,", ",")
            .replace(" .", ".");
    }

    PassOutput {
        text: current,
        changes,
    }
}

/// 1. 谦逊化：替换自夸短语与绝对化的最高级
pub struct SelfPromotionPass;

impl AdaptationPass for SelfPromotionPass {
    fn name(&self) -> &'static str {
        "self-promotion"
    }

    fn apply(
        &self,
        text: &str,
        _context: &AdaptationContext,
        tables: &AdaptationTables,
    ) -> PassOutput {
        let reason = "Boastful claims read as self-promotion; measured wording builds trust";
        PassOutput::unchanged(text)
            .then_replace(
                tables.self_promotion.norwegian,
                ChangeType::SelfPromotion,
                reason,
                Impact::High,
            )
            .then_replace(
                tables.self_promotion.english,
                ChangeType::SelfPromotion,
                reason,
                Impact::High,
            )
    }
}

/// 2. 术语本地化：用本地商业术语替换英语外来词
pub struct TerminologyPass;

impl AdaptationPass for TerminologyPass {
    fn name(&self) -> &'static str {
        "terminology"
    }

    fn apply(
        &self,
        text: &str,
        context: &AdaptationContext,
        tables: &AdaptationTables,
    ) -> PassOutput {
        if !context.language.is_local() {
            return PassOutput::unchanged(text);
        }
        replace_phrases(
            text,
            tables.loanwords,
            ChangeType::Terminology,
            "Norwegian business term preferred over English loanword",
            Impact::Low,
        )
    }
}

/// 3. 语气调整：向要求的正式程度靠拢，并按受众覆盖
pub struct TonePass;

impl AdaptationPass for TonePass {
    fn name(&self) -> &'static str {
        "tone"
    }

    fn apply(
        &self,
        text: &str,
        context: &AdaptationContext,
        tables: &AdaptationTables,
    ) -> PassOutput {
        let language = context.language;
        let mut output = PassOutput::unchanged(text);

        if matches!(context.formality, Formality::Formal | Formality::Neutral) {
            output = output.then_replace(
                tables.casual_to_formal.for_language(language),
                ChangeType::Tone,
                "Casual wording adjusted toward the requested formality",
                Impact::Medium,
            );
        }
        if matches!(context.formality, Formality::Casual | Formality::Neutral) {
            output = output.then_replace(
                tables.formal_to_casual.for_language(language),
                ChangeType::Tone,
                "Stiff wording adjusted toward the requested formality",
                Impact::Medium,
            );
        }

        match context.audience {
            Audience::Executive => output.then_replace(
                tables.executive.for_language(language),
                ChangeType::Tone,
                "Executive audience: terse and strategic wording",
                Impact::Medium,
            ),
            Audience::Technical => output.then_replace(
                tables.technical.for_language(language),
                ChangeType::Tone,
                "Technical audience: more precise wording",
                Impact::Medium,
            ),
            _ => output,
        }
    }
}

/// 4. 共识表述：第一人称单数改为集体表述，长文缺少协作表述时补充
pub struct ConsensusPass;

impl AdaptationPass for ConsensusPass {
    fn name(&self) -> &'static str {
        "consensus"
    }

    fn apply(
        &self,
        text: &str,
        context: &AdaptationContext,
        tables: &AdaptationTables,
    ) -> PassOutput {
        let mut output = replace_phrases(
            text,
            tables.first_person.for_language(context.language),
            ChangeType::Consensus,
            "Collective framing fits consensus-oriented business culture",
            Impact::Medium,
        );

        let lower = output.text.to_lowercase();
        let has_collaborative = tables
            .collaborative_markers
            .iter()
            .any(|marker| lower.contains(marker));
        if !has_collaborative
            && word_count(&output.text) >= COLLABORATIVE_MIN_WORDS
            && let Some(sentence) = tables.collaborative_sentence.for_language(context.language)
        {
            output.text = format!("{} {}", output.text.trim_end(), sentence);
            output.changes.push(AdaptationChange {
                change_type: ChangeType::Consensus,
                original: String::new(),
                adapted: sentence.to_string(),
                reason: "Long text lacked collaborative language".to_string(),
                impact: Impact::Low,
            });
        }
        output
    }
}

/// 5. 行业适配：行业术语表，以及科技行业的可持续性补充
pub struct IndustryPass;

impl AdaptationPass for IndustryPass {
    fn name(&self) -> &'static str {
        "industry"
    }

    fn apply(
        &self,
        text: &str,
        context: &AdaptationContext,
        tables: &AdaptationTables,
    ) -> PassOutput {
        let Some(industry) = context.industry.as_deref().map(str::to_lowercase) else {
            return PassOutput::unchanged(text);
        };

        let mut output = PassOutput::unchanged(text);
        for entry in tables
            .industries
            .iter()
            .filter(|entry| entry.keys.iter().any(|key| industry.contains(key)))
        {
            output = output.then_replace(
                entry.terms.for_language(context.language),
                ChangeType::Industry,
                "Industry-appropriate terminology",
                Impact::Medium,
            );
        }

        let is_technology = tables.technology_keys.iter().any(|key| industry.contains(key));
        let lower = output.text.to_lowercase();
        let mentions_sustainability = tables
            .sustainability_markers
            .iter()
            .any(|marker| lower.contains(marker));
        if is_technology
            && !mentions_sustainability
            && let Some(sentence) = tables.sustainability_sentence.for_language(context.language)
        {
            output.text = format!("{} {}", output.text.trim_end(), sentence);
            output.changes.push(AdaptationChange {
                change_type: ChangeType::Industry,
                original: String::new(),
                adapted: sentence.to_string(),
                reason: "Technology content is expected to address sustainability".to_string(),
                impact: Impact::Medium,
            });
        }
        output
    }
}

/// 6. 结构优化：过长的单段拆为三段，首句过短时补充语境句
pub struct StructurePass;

impl AdaptationPass for StructurePass {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn apply(
        &self,
        text: &str,
        context: &AdaptationContext,
        tables: &AdaptationTables,
    ) -> PassOutput {
        let mut output = PassOutput::unchanged(text);

        let sentences = split_sentences(&output.text);
        if paragraphs(&output.text).len() == 1
            && word_count(&output.text) > STRUCTURE_SPLIT_WORDS
            && sentences.len() >= 3
        {
            let per_paragraph = sentences.len().div_ceil(3);
            let split = sentences
                .chunks(per_paragraph)
                .map(|chunk| chunk.join(" "))
                .collect::<Vec<_>>()
                .join("\n\n");
            output.changes.push(AdaptationChange {
                change_type: ChangeType::Structure,
                original: String::new(),
                adapted: format!("{} paragraphs", sentences.chunks(per_paragraph).count()),
                reason: "Long single paragraph split for readability".to_string(),
                impact: Impact::Low,
            });
            output.text = split;
        }

        let opening_short = split_sentences(&output.text)
            .first()
            .map(|first| word_count(first) < SHORT_OPENING_WORDS)
            .unwrap_or(false);
        if opening_short
            && let Some(sentence) = tables.context_sentence.for_language(context.language)
        {
            output.text = format!("{} {}", sentence, output.text.trim_start());
            output.changes.push(AdaptationChange {
                change_type: ChangeType::Structure,
                original: String::new(),
                adapted: sentence.to_string(),
                reason: "Very short opening sentence given context".to_string(),
                impact: Impact::Low,
            });
        }
        output
    }
}

/// 默认步骤顺序
pub fn default_passes() -> Vec<Box<dyn AdaptationPass>> {
    vec![
        Box::new(SelfPromotionPass),
        Box::new(TerminologyPass),
        Box::new(TonePass),
        Box::new(ConsensusPass),
        Box::new(IndustryPass),
        Box::new(StructurePass),
    ]
}
