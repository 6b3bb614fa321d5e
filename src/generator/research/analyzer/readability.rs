//! 可读性评估：斯堪的纳维亚语言使用LIX，英语使用Flesch

use crate::i18n::OutputLanguage;
use crate::utils::text::{split_sentences, syllables, words};

/// LIX长词阈值（字符数大于该值）
const LIX_LONG_WORD: usize = 6;

/// LIX指数 = 平均句长 + 长词百分比
pub fn lix(text: &str) -> Option<f64> {
    let sentences = split_sentences(text).len();
    let words = words(text);
    if sentences == 0 || words.is_empty() {
        return None;
    }
    let long_words = words
        .iter()
        .filter(|w| w.chars().count() > LIX_LONG_WORD)
        .count();
    Some(words.len() as f64 / sentences as f64 + 100.0 * long_words as f64 / words.len() as f64)
}

/// Flesch reading ease
pub fn flesch(text: &str) -> Option<f64> {
    let sentences = split_sentences(text).len();
    let words = words(text);
    if sentences == 0 || words.is_empty() {
        return None;
    }
    let syllable_count: usize = words.iter().map(|w| syllables(w)).sum();
    Some(
        206.835
            - 1.015 * (words.len() as f64 / sentences as f64)
            - 84.6 * (syllable_count as f64 / words.len() as f64),
    )
}

/// 映射到0-100，越高越易读
pub fn readability_score(text: &str, language: OutputLanguage) -> f64 {
    if language.is_scandinavian() {
        // LIX 20 很容易，60以上很难
        lix(text)
            .map(|value| (100.0 - (value - 20.0) * 2.0).clamp(0.0, 100.0))
            .unwrap_or(0.0)
    } else {
        flesch(text)
            .map(|value| value.clamp(0.0, 100.0))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lix_of_simple_text() {
        // 6个词，1句，1个长词
        let value = lix("Vi har bygget en ny fabrikk.").unwrap();
        assert!((value - (6.0 + 100.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_simple_text_scores_higher_than_dense_text() {
        let simple = "Vi lager mat. Den er god. Folk liker den.";
        let dense = "Implementeringen av sirkulærøkonomiske forretningsmodeller \
                     forutsetter omfattende tverrsektorielle samarbeidsstrukturer.";
        assert!(
            readability_score(simple, OutputLanguage::Bokmal)
                > readability_score(dense, OutputLanguage::Bokmal)
        );
    }

    #[test]
    fn test_english_uses_flesch_and_empty_is_zero() {
        let score = readability_score("The cat sat on the mat.", OutputLanguage::English);
        assert!(score > 90.0);
        assert_eq!(readability_score("", OutputLanguage::English), 0.0);
    }
}
