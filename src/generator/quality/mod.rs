//! 质量评估：五个维度加权评分，并给出待改进项
//!
//! 评估是纯函数，迭代改进由工作流负责。

use crate::generator::adaptation::{AdaptationTables, scoring};
use crate::generator::research::analyzer::readability::readability_score;
use crate::i18n::OutputLanguage;
use crate::types::quality::{
    DimensionScores, Grade, Priority, QualityAssessment, QualityDimension, ReadinessLevel,
    Weakness,
};
use crate::types::request::{ContentRequest, ContentType, Formality};
use crate::utils::text::{paragraphs, split_sentences, word_count, words};

/// 评分使用的关键词表
#[derive(Debug, Clone, Copy)]
pub struct QualityTables {
    pub call_to_action: &'static [&'static str],
    pub direct_address: &'static [&'static str],
    /// 评估文化维度时复用适配表
    pub adaptation: AdaptationTables,
}

impl Default for QualityTables {
    fn default() -> Self {
        Self {
            call_to_action: CALL_TO_ACTION,
            direct_address: DIRECT_ADDRESS,
            adaptation: AdaptationTables::default(),
        }
    }
}

static CALL_TO_ACTION: &[&str] = &[
    "kontakt oss",
    "ta kontakt",
    "les mer",
    "meld deg på",
    "bestill",
    "prøv",
    "besøk",
    "contact us",
    "get in touch",
    "read more",
    "sign up",
    "book",
    "try",
    "visit",
    "learn more",
];

static DIRECT_ADDRESS: &[&str] = &["du", "deg", "din", "dere", "deres", "you", "your"];

/// 评估所需的请求上下文
#[derive(Debug, Clone, PartialEq)]
pub struct QualityContext {
    pub language: OutputLanguage,
    pub content_type: ContentType,
    pub formality: Formality,
    pub target_length: usize,
    pub keywords: Vec<String>,
    pub primary_keyword: Option<String>,
}

impl QualityContext {
    pub fn from_request(request: &ContentRequest) -> Self {
        Self {
            language: request.output_language,
            content_type: request.content_type,
            formality: request.formality(),
            target_length: request.effective_length(),
            keywords: request.keywords.clone(),
            primary_keyword: request.seo_primary_keyword().map(str::to_string),
        }
    }
}

/// 平均句长超过该值视为过长
const LONG_SENTENCE_AVERAGE: f64 = 25.0;

/// 单句超过该字数视为冗长
const RUN_ON_SENTENCE_WORDS: usize = 40;

/// 同一个词占比超过该值视为重复
const REPETITION_RATIO: f64 = 0.05;

/// 主关键词应出现在开头的字数范围内
const KEYWORD_OPENING_WORDS: usize = 100;

#[derive(Debug, Default)]
struct Findings {
    strengths: Vec<String>,
    weaknesses: Vec<Weakness>,
}

impl Findings {
    fn weakness(
        &mut self,
        dimension: QualityDimension,
        priority: Priority,
        description: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.weaknesses.push(Weakness {
            dimension,
            priority,
            description: description.into(),
            suggestion: suggestion.into(),
        });
    }
}

/// 质量评估器
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    tables: QualityTables,
}

impl QualityScorer {
    pub fn new(tables: QualityTables) -> Self {
        Self { tables }
    }

    pub fn assess(&self, text: &str, context: &QualityContext) -> QualityAssessment {
        let mut findings = Findings::default();

        let scores = DimensionScores {
            linguistic: linguistic(text, context, &mut findings),
            cultural: cultural(text, context, &self.tables, &mut findings),
            business: business(text, context, &self.tables, &mut findings),
            technical: technical(text, context, &mut findings),
            engagement: engagement(text, &self.tables, &mut findings),
        };
        let overall = scores.weighted_overall().clamp(0.0, 100.0);

        for dimension in [
            QualityDimension::Linguistic,
            QualityDimension::Cultural,
            QualityDimension::Business,
            QualityDimension::Technical,
            QualityDimension::Engagement,
        ] {
            if scores.get(dimension) >= 85.0 {
                findings
                    .strengths
                    .push(format!("Strong {} quality", dimension_name(dimension)));
            }
        }

        findings.weaknesses.sort_by_key(|w| w.priority);
        let mut recommendations: Vec<String> = Vec::new();
        for weakness in &findings.weaknesses {
            if !recommendations.contains(&weakness.suggestion) {
                recommendations.push(weakness.suggestion.clone());
            }
        }

        QualityAssessment {
            scores,
            overall,
            grade: Grade::from_score(overall),
            readiness: ReadinessLevel::from_score(overall),
            strengths: findings.strengths,
            weaknesses: findings.weaknesses,
            recommendations,
        }
    }
}

/// 改进提示：按优先级取前N个待改进项
pub fn improvement_items(assessment: &QualityAssessment, max_items: usize) -> Vec<String> {
    assessment
        .top_weaknesses(max_items)
        .into_iter()
        .map(|w| format!("{} ({})", w.suggestion, w.description))
        .collect()
}

fn dimension_name(dimension: QualityDimension) -> &'static str {
    match dimension {
        QualityDimension::Linguistic => "linguistic",
        QualityDimension::Cultural => "cultural",
        QualityDimension::Business => "business",
        QualityDimension::Technical => "technical",
        QualityDimension::Engagement => "engagement",
    }
}

fn contains_any(lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| lower.contains(marker))
}

/// 语言维度：可读性与句子结构各占一半
fn linguistic(text: &str, context: &QualityContext, findings: &mut Findings) -> f64 {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        findings.weakness(
            QualityDimension::Linguistic,
            Priority::Critical,
            "The text is empty",
            "Produce a complete text",
        );
        return 0.0;
    }

    let readability = readability_score(text, context.language);
    let mut mechanics: f64 = 100.0;

    let average = word_count(text) as f64 / sentences.len() as f64;
    if average > LONG_SENTENCE_AVERAGE {
        mechanics -= 20.0;
        findings.weakness(
            QualityDimension::Linguistic,
            Priority::High,
            format!("Average sentence length is {:.0} words", average),
            "Shorten sentences to improve readability",
        );
    }

    let run_ons = sentences
        .iter()
        .filter(|s| word_count(s) > RUN_ON_SENTENCE_WORDS)
        .count();
    if run_ons > 0 {
        mechanics -= (10.0 * run_ons as f64).min(30.0);
        findings.weakness(
            QualityDimension::Linguistic,
            Priority::Medium,
            format!("{} sentence(s) exceed {} words", run_ons, RUN_ON_SENTENCE_WORDS),
            "Split run-on sentences",
        );
    }

    let all_words: Vec<String> = words(text)
        .into_iter()
        .filter(|w| w.chars().count() > 3)
        .collect();
    if all_words.len() >= 40 {
        let mut counts = std::collections::HashMap::new();
        for word in &all_words {
            *counts.entry(word.as_str()).or_insert(0usize) += 1;
        }
        if let Some((word, count)) = counts.iter().max_by_key(|(_, count)| **count)
            && *count as f64 / all_words.len() as f64 > REPETITION_RATIO
        {
            mechanics -= 15.0;
            findings.weakness(
                QualityDimension::Linguistic,
                Priority::Medium,
                format!("The word \"{}\" is repeated {} times", word, count),
                "Vary the vocabulary",
            );
        }
    }

    if text.contains("!!") || text.contains("??") || text.contains("  ") {
        mechanics -= 10.0;
        findings.weakness(
            QualityDimension::Linguistic,
            Priority::Low,
            "Repeated punctuation or spacing",
            "Clean up punctuation and spacing",
        );
    }

    if readability < 40.0 {
        findings.weakness(
            QualityDimension::Linguistic,
            Priority::Medium,
            format!("Readability score is {:.0}", readability),
            "Use shorter words and simpler sentences",
        );
    }

    (0.5 * readability + 0.5 * mechanics.max(0.0)).clamp(0.0, 100.0)
}

/// 文化维度：复用适配阶段的合规评分
fn cultural(
    text: &str,
    context: &QualityContext,
    tables: &QualityTables,
    findings: &mut Findings,
) -> f64 {
    let compliance = scoring::compliance(
        text,
        context.language,
        context.formality,
        &tables.adaptation,
    );

    if !compliance.violations.is_empty() {
        findings.weakness(
            QualityDimension::Cultural,
            Priority::Critical,
            format!("Boastful claims remain: {}", compliance.violations.join(", ")),
            "Replace boastful claims with measured, evidence-based wording",
        );
    }
    if compliance.business_appropriateness < 80.0 {
        findings.weakness(
            QualityDimension::Cultural,
            Priority::Medium,
            "Tone or terminology does not fit the business context",
            "Adjust tone and prefer local business terminology",
        );
    }
    if compliance.inclusive_indicators.is_empty() {
        findings.weakness(
            QualityDimension::Cultural,
            Priority::Low,
            "No collaborative language",
            "Emphasise collaboration with customers and partners",
        );
    }

    scoring::cultural_score(&compliance)
}

/// 商业维度：篇幅、关键词覆盖与行动号召
fn business(
    text: &str,
    context: &QualityContext,
    tables: &QualityTables,
    findings: &mut Findings,
) -> f64 {
    let lower = text.to_lowercase();

    let words = word_count(text) as f64;
    let target = context.target_length.max(1) as f64;
    let ratio = words / target;
    let length_score = if (0.8..=1.2).contains(&ratio) {
        100.0
    } else if ratio < 0.8 {
        (ratio / 0.8 * 100.0).max(0.0)
    } else {
        (100.0 - (ratio - 1.2) * 100.0).max(0.0)
    };
    if !(0.5..=1.5).contains(&ratio) {
        findings.weakness(
            QualityDimension::Business,
            Priority::High,
            format!("Length is {:.0} words against a target of {:.0}", words, target),
            format!("Adjust the length to about {:.0} words", target),
        );
    } else if length_score < 100.0 {
        findings.weakness(
            QualityDimension::Business,
            Priority::Low,
            format!("Length is {:.0} words against a target of {:.0}", words, target),
            format!("Bring the length closer to {:.0} words", target),
        );
    }

    let keyword_score = if context.keywords.is_empty() {
        100.0
    } else {
        let missing: Vec<&str> = context
            .keywords
            .iter()
            .filter(|k| !lower.contains(&k.to_lowercase()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            findings.weakness(
                QualityDimension::Business,
                Priority::High,
                format!("Missing keywords: {}", missing.join(", ")),
                "Work the requested keywords naturally into the text",
            );
        }
        100.0 * (context.keywords.len() - missing.len()) as f64 / context.keywords.len() as f64
    };

    let cta_score = if !context.content_type.expects_call_to_action() {
        100.0
    } else if contains_any(&lower, tables.call_to_action) {
        100.0
    } else {
        findings.weakness(
            QualityDimension::Business,
            Priority::Medium,
            "No call to action",
            "End with a clear, modest call to action",
        );
        30.0
    };

    0.4 * length_score + 0.35 * keyword_score + 0.25 * cta_score
}

/// 技术维度：SEO主关键词、关键词密度与段落结构
fn technical(text: &str, context: &QualityContext, findings: &mut Findings) -> f64 {
    let mut score: f64 = 60.0;
    let lower = text.to_lowercase();
    let total_words = word_count(text).max(1);

    match context.primary_keyword.as_deref().map(str::to_lowercase) {
        None => score += 25.0,
        Some(keyword) => {
            let opening: String = text
                .split_whitespace()
                .take(KEYWORD_OPENING_WORDS)
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            if opening.contains(&keyword) {
                score += 15.0;
            } else {
                findings.weakness(
                    QualityDimension::Technical,
                    Priority::High,
                    format!("Primary keyword \"{}\" missing from the opening", keyword),
                    "Use the primary SEO keyword early in the text",
                );
            }

            let occurrences = lower.matches(keyword.as_str()).count();
            let density =
                occurrences as f64 * word_count(&keyword).max(1) as f64 / total_words as f64;
            if (0.005..=0.03).contains(&density) {
                score += 10.0;
            } else if density > 0.03 {
                findings.weakness(
                    QualityDimension::Technical,
                    Priority::Medium,
                    format!("Keyword density is {:.1}%", density * 100.0),
                    "Reduce keyword repetition",
                );
            }
        }
    }

    let paragraph_count = paragraphs(text).len();
    let expected = if context.content_type.is_long_form() {
        3
    } else {
        1
    };
    if paragraph_count >= expected {
        score += 15.0;
    } else {
        findings.weakness(
            QualityDimension::Technical,
            Priority::Medium,
            format!("Only {} paragraph(s)", paragraph_count),
            "Structure the text into clear paragraphs",
        );
    }

    score.clamp(0.0, 100.0)
}

/// 互动维度：直接称呼、问题、具体数字与句长变化
fn engagement(text: &str, tables: &QualityTables, findings: &mut Findings) -> f64 {
    let mut score: f64 = 40.0;
    let text_words = words(text);

    if text_words
        .iter()
        .any(|w| tables.direct_address.contains(&w.as_str()))
    {
        score += 20.0;
    } else {
        findings.weakness(
            QualityDimension::Engagement,
            Priority::Low,
            "The reader is never addressed directly",
            "Address the reader directly",
        );
    }

    if text.contains('?') {
        score += 10.0;
    }

    if text.chars().any(|c| c.is_ascii_digit()) {
        score += 15.0;
    } else {
        findings.weakness(
            QualityDimension::Engagement,
            Priority::Medium,
            "No concrete figures",
            "Add concrete figures or examples",
        );
    }

    let lengths: Vec<f64> = split_sentences(text)
        .iter()
        .map(|s| word_count(s) as f64)
        .collect();
    if lengths.len() >= 3 {
        let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
        let variance =
            lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
        if variance.sqrt() >= 4.0 {
            score += 15.0;
        }
    }

    score.clamp(0.0, 100.0)
}
