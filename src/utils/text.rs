//! 文本处理的基础函数

use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+(\s+|$)").unwrap());

/// 按句末标点切分句子
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in SENTENCE_END.find_iter(text) {
        let sentence = text[last..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        last = m.end();
    }
    let rest = text[last..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

/// 小写化的词列表，保留字母数字与北欧字符
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|w| w.trim_matches('-').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 按空行切分段落
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect()
}

/// 主题中长度大于3的有效词
pub fn significant_words(topic: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for word in words(topic) {
        if word.chars().count() > 3 && !seen.contains(&word) {
            seen.push(word);
        }
    }
    seen
}

/// 统计子串出现次数（调用方负责大小写）
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// 去重用的归一化前缀键
pub fn normalized_key(text: &str, prefix_len: usize) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(prefix_len)
        .collect()
}

/// 按字符数截断，保留完整字符
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}

/// 估算音节数（元音组计数）
pub fn syllables(word: &str) -> usize {
    let mut count = 0;
    let mut previous_vowel = false;
    for c in word.chars() {
        let vowel = matches!(
            c.to_ascii_lowercase(),
            'a' | 'e' | 'i' | 'o' | 'u' | 'y'
        ) || matches!(c, 'æ' | 'ø' | 'å' | 'Æ' | 'Ø' | 'Å' | 'ä' | 'ö');
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }
    count.max(1)
}

/// 已编译的短语正则，每个短语只编译一次
static PHRASE_PATTERNS: LazyLock<Mutex<HashMap<String, Regex>>> = LazyLock::new(Default::default);

/// 构造大小写不敏感、按词边界匹配的正则
pub fn phrase_regex(phrase: &str) -> Option<Regex> {
    let key = phrase.trim();
    if let Ok(patterns) = PHRASE_PATTERNS.lock()
        && let Some(pattern) = patterns.get(key)
    {
        return Some(pattern.clone());
    }

    let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(key))).ok()?;
    if let Ok(mut patterns) = PHRASE_PATTERNS.lock() {
        patterns.insert(key.to_string(), pattern.clone());
    }
    Some(pattern)
}

/// 保持首字母大小写的替换
pub fn match_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
    if !starts_upper || replacement.is_empty() {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 折叠多余空白，保留段落分隔
pub fn tidy_whitespace(text: &str) -> String {
    paragraphs(text)
        .iter()
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("Første setning. Andre setning! Tredje uten punktum");
        assert_eq!(
            sentences,
            vec!["Første setning.", "Andre setning!", "Tredje uten punktum"]
        );
    }

    #[test]
    fn test_decimal_numbers_do_not_split() {
        let sentences = split_sentences("Veksten var 3.5 prosent i fjor. Det er bra.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_significant_words_skip_short_and_duplicates() {
        let words = significant_words("Grønn vekst og grønn energi i Norge");
        assert_eq!(words, vec!["grønn", "vekst", "energi", "norge"]);
    }

    #[test]
    fn test_normalized_key_ignores_case_and_punctuation() {
        assert_eq!(
            normalized_key("Salget økte med 12 %!", 20),
            normalized_key("salget ØKTE med 12%", 20)
        );
    }

    #[test]
    fn test_match_case_and_phrase_regex() {
        assert_eq!(match_case("Verdens", "blant de"), "Blant de");
        assert_eq!(match_case("verdens", "blant de"), "blant de");
        let re = phrase_regex("best i klassen").unwrap();
        assert!(re.is_match("Vi er Best i klassen på dette"));
        assert!(!re.is_match("bestemt"));
    }

    #[test]
    fn test_phrase_regex_is_compiled_once() {
        let first = phrase_regex("  grønt skifte ").unwrap();
        let second = phrase_regex("grønt skifte").unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert!(PHRASE_PATTERNS.lock().unwrap().contains_key("grønt skifte"));
        assert!(second.is_match("Det Grønne skiftet og grønt skifte"));
    }

    #[test]
    fn test_syllables_count_vowel_groups() {
        assert_eq!(syllables("bærekraft"), 3);
        assert_eq!(syllables("strategy"), 3);
        assert_eq!(syllables("x"), 1);
    }

    #[test]
    fn test_tidy_whitespace_keeps_paragraphs() {
        assert_eq!(tidy_whitespace("a   b\n\n\n c  d "), "a b\n\nc d");
    }
}
