//! 适配后的合规评分，纯函数，表作为数据传入

use crate::i18n::OutputLanguage;
use crate::types::adaptation::{ComplianceScores, ToneAssessment};
use crate::types::request::Formality;
use crate::utils::text::phrase_regex;

use super::tables::{AdaptationTables, PhrasePairs};

/// 综合文化评分的基线部分
const BASELINE: f64 = 30.0;

/// 计算合规子评分
pub fn compliance(
    text: &str,
    language: OutputLanguage,
    formality: Formality,
    tables: &AdaptationTables,
) -> ComplianceScores {
    let lower = text.to_lowercase();

    let mut violations: Vec<String> = tables
        .self_promotion
        .all()
        .filter(|(phrase, _)| contains_phrase(text, phrase))
        .map(|(phrase, _)| phrase.to_string())
        .collect();
    violations.extend(
        tables
            .violation_markers
            .iter()
            .filter(|marker| lower.contains(*marker))
            .map(|marker| marker.to_string()),
    );

    let inclusive_indicators: Vec<String> = tables
        .inclusive_indicators
        .iter()
        .filter(|indicator| lower.contains(*indicator))
        .map(|indicator| indicator.to_string())
        .collect();

    let jante_compliance = (100.0 - 10.0 * violations.len() as f64
        + 5.0 * inclusive_indicators.len() as f64)
        .clamp(0.0, 100.0);

    let tone = classify_tone(text, language, formality, tables);

    let remaining_loanwords = if language.is_local() {
        count_phrases(text, tables.loanwords)
    } else {
        0
    };
    let mut business_appropriateness = 100.0 - 5.0 * remaining_loanwords as f64;
    if tone != ToneAssessment::Appropriate {
        business_appropriateness -= 15.0;
    }

    ComplianceScores {
        jante_compliance,
        business_appropriateness: business_appropriateness.clamp(0.0, 100.0),
        tone,
        violations,
        inclusive_indicators,
    }
}

/// 综合文化评分：0.4×合规 + 0.3×得体 + 0.3×100
pub fn cultural_score(scores: &ComplianceScores) -> f64 {
    (0.4 * scores.jante_compliance + 0.3 * scores.business_appropriateness + BASELINE)
        .clamp(0.0, 100.0)
}

/// 按口语/书面语标记数判断语气
pub fn classify_tone(
    text: &str,
    language: OutputLanguage,
    formality: Formality,
    tables: &AdaptationTables,
) -> ToneAssessment {
    let casual = count_phrases(text, tables.casual_to_formal.for_language(language));
    let formal = count_phrases(text, tables.formal_to_casual.for_language(language));

    match formality {
        Formality::Formal if casual > 0 => ToneAssessment::TooCasual,
        Formality::Casual if formal > 0 => ToneAssessment::TooFormal,
        Formality::Neutral if casual > formal + 1 => ToneAssessment::TooCasual,
        Formality::Neutral if formal > casual + 1 => ToneAssessment::TooFormal,
        _ => ToneAssessment::Appropriate,
    }
}

/// 根据评分生成改进建议
pub fn recommendations(scores: &ComplianceScores) -> Vec<String> {
    let mut recommendations = Vec::new();
    if !scores.violations.is_empty() {
        recommendations.push(format!(
            "Remove remaining boastful or absolute claims: {}",
            scores.violations.join(", ")
        ));
    }
    if scores.inclusive_indicators.is_empty() {
        recommendations
            .push("Add collaborative, inclusive language that emphasises partnership".to_string());
    }
    if scores.business_appropriateness < 80.0 {
        recommendations.push("Prefer local business terminology over English loanwords".to_string());
    }
    match scores.tone {
        ToneAssessment::TooCasual => {
            recommendations.push("Raise the formality: replace casual expressions".to_string())
        }
        ToneAssessment::TooFormal => {
            recommendations.push("Lower the formality: use plainer, more direct wording".to_string())
        }
        ToneAssessment::Appropriate => {}
    }
    recommendations
}

fn contains_phrase(text: &str, phrase: &str) -> bool {
    phrase_regex(phrase)
        .map(|pattern| pattern.is_match(text))
        .unwrap_or(false)
}

fn count_phrases(text: &str, pairs: PhrasePairs) -> usize {
    pairs
        .iter()
        .filter_map(|(phrase, _)| phrase_regex(phrase))
        .map(|pattern| pattern.find_iter(text).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violations_lower_compliance() {
        let tables = AdaptationTables::default();
        let clean = compliance(
            "Vi jobber sammen med kundene.",
            OutputLanguage::Bokmal,
            Formality::Neutral,
            &tables,
        );
        let boastful = compliance(
            "Vi er markedsledende og garantert best i klassen.",
            OutputLanguage::Bokmal,
            Formality::Neutral,
            &tables,
        );
        assert_eq!(clean.jante_compliance, 100.0);
        assert_eq!(boastful.violations.len(), 3);
        assert_eq!(boastful.jante_compliance, 70.0);
    }

    #[test]
    fn test_loanwords_only_penalised_for_local_language() {
        let tables = AdaptationTables::default();
        let text = "Vi tar en meeting om feedback.";
        let local = compliance(text, OutputLanguage::Bokmal, Formality::Neutral, &tables);
        let english = compliance(text, OutputLanguage::English, Formality::Neutral, &tables);
        assert_eq!(local.business_appropriateness, 90.0);
        assert_eq!(english.business_appropriateness, 100.0);
    }

    #[test]
    fn test_tone_classification() {
        let tables = AdaptationTables::default();
        assert_eq!(
            classify_tone("Sjekk ut det kule tilbudet, det funker!", OutputLanguage::Bokmal, Formality::Formal, &tables),
            ToneAssessment::TooCasual
        );
        assert_eq!(
            classify_tone("Vennligst merk at vi herved endrer vilkårene.", OutputLanguage::Bokmal, Formality::Casual, &tables),
            ToneAssessment::TooFormal
        );
        assert_eq!(
            classify_tone("Et nøytralt avsnitt.", OutputLanguage::Bokmal, Formality::Formal, &tables),
            ToneAssessment::Appropriate
        );
    }

    #[test]
    fn test_cultural_score_formula() {
        let scores = ComplianceScores {
            jante_compliance: 100.0,
            business_appropriateness: 100.0,
            tone: ToneAssessment::Appropriate,
            violations: vec![],
            inclusive_indicators: vec!["sammen".to_string()],
        };
        assert_eq!(cultural_score(&scores), 100.0);

        let low = ComplianceScores {
            jante_compliance: 0.0,
            business_appropriateness: 0.0,
            ..scores
        };
        assert_eq!(cultural_score(&low), 30.0);
    }

    #[test]
    fn test_recommendations_follow_scores() {
        let tables = AdaptationTables::default();
        let scores = compliance(
            "Vi er markedsledende.",
            OutputLanguage::Bokmal,
            Formality::Neutral,
            &tables,
        );
        let recommendations = recommendations(&scores);
        assert!(recommendations.iter().any(|r| r.contains("markedsledende")));
        assert!(recommendations.iter().any(|r| r.contains("collaborative")));
    }
}
