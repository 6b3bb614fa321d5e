//! 内容分析器 - 对研究文本评分并抽取洞察、事实、引用与指标
//!
//! 所有评分都是 `(文本, 上下文) -> 分数` 的确定性函数，词表通过 [`AnalyzerTables`] 传入。

use chrono::Datelike;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::AnalysisConfig;
use crate::i18n::OutputLanguage;
use crate::types::analysis::{
    AnalysisWarning, ContentAnalysis, Fact, FactKind, Insight, InsightCategory, Metric,
    MetricKind, Quote, Severity, WarningKind,
};
use crate::utils::text::{
    count_occurrences, normalized_key, paragraphs, significant_words, split_sentences, word_count,
};

pub mod readability;
pub mod tables;

pub use tables::AnalyzerTables;

/// 去重键的前缀长度
const DEDUP_PREFIX_LEN: usize = 50;

static STATISTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:[.,]\d+)?\s?(?:%|prosent\b|percent\b)").unwrap()
});
static MONETARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\d[\d\s.,]*\s?(?:kr\b|kroner\b|nok\b|usd\b|eur\b|millioner kroner|milliarder kroner|mrd\b|mill\b))|(?:(?:nok|usd|eur|\$|€)\s?\d[\d.,]*)",
    )
    .unwrap()
});
static COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-ZÆØÅ][\wÆØÅæøå&-]*(?:\s[A-ZÆØÅ][\wÆØÅæøå&-]*)*\s(?:AS|ASA|SA|AB|Ltd|Inc|GmbH)\b")
        .unwrap()
});
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,2}\.\s?(?:januar|februar|mars|april|mai|juni|juli|august|september|oktober|november|desember)\b|\b\d{4}-\d{2}-\d{2}\b|\b(?:i|in|fra|from|since|siden)\s(?:19|20)\d{2}\b",
    )
    .unwrap()
});
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["«“]([^"»”]{10,300})["»”]"#).unwrap());
static ATTRIBUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:sier|sa|uttaler|says|said|according to|ifølge)\s+([A-ZÆØÅ][\wæøå]+(?:\s[A-ZÆØÅ][\wæøå]+)?)")
        .unwrap()
});
static GROWTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:vekst|økning|økte|steg|growth|increased?|grew)[^.]{0,40}?(\d+(?:[.,]\d+)?\s?(?:%|prosent|percent))")
        .unwrap()
});
static MARKET_SHARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:markedsandel|market share)[^.]{0,40}?(\d+(?:[.,]\d+)?\s?(?:%|prosent|percent))")
        .unwrap()
});
static REVENUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:omsetning|inntekter|revenue|turnover)[^.]{0,40}?(\d[\d.,]*\s?(?:milliarder|millioner|mrd|mill|billion|million|kr|nok|usd|eur)\b)")
        .unwrap()
});
static LOCAL_COMPANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-ZÆØÅ][\wÆØÅæøå-]*\s(?:AS|ASA)\b").unwrap());
static LOCAL_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:kr|kroner|nok)\b").unwrap());

/// 内容分析器
#[derive(Debug, Clone)]
pub struct ContentAnalyzer {
    config: AnalysisConfig,
    tables: AnalyzerTables,
}

impl ContentAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_tables(config, AnalyzerTables::default())
    }

    pub fn with_tables(config: AnalysisConfig, tables: AnalyzerTables) -> Self {
        Self { config, tables }
    }

    /// 分析单段文本
    pub fn analyze(
        &self,
        text: &str,
        source_trust: f64,
        topic: &str,
        language: OutputLanguage,
    ) -> ContentAnalysis {
        let topic_words = significant_words(topic);
        let sentences = split_sentences(text);

        let relevance_score = relevance(text, topic, &topic_words, &self.tables);
        let quality_score = quality(text, source_trust);
        let cultural_score = if language.is_local() {
            cultural_fit(text, &self.tables)
        } else {
            0.5
        };

        let all_facts = extract_facts(&sentences);
        let factual_density = if sentences.is_empty() {
            0.0
        } else {
            all_facts.len() as f64 / sentences.len() as f64
        };

        let mut facts = dedup_by_key(all_facts, |f| f.text.as_str());
        facts.truncate(self.config.max_facts);

        let mut analysis = ContentAnalysis {
            relevance_score,
            quality_score,
            cultural_score,
            factual_density,
            sentiment: sentiment(text, &self.tables),
            readability: readability::readability_score(text, language),
            insights: self.extract_insights(&sentences, &topic_words, source_trust),
            facts,
            quotes: extract_quotes(text, self.config.max_quotes),
            metrics: extract_metrics(&sentences, self.config.max_metrics),
            warnings: Vec::new(),
        };
        analysis.warnings = self.warnings(text, &analysis);
        analysis
    }

    /// 合并多个分析结果：评分按权重平均，列表按归一化前缀去重
    pub fn merge(&self, analyses: &[(ContentAnalysis, f64)]) -> ContentAnalysis {
        if analyses.is_empty() {
            return ContentAnalysis::default();
        }

        let total_weight: f64 = analyses.iter().map(|(_, w)| w.max(0.0)).sum();
        let weighted = |field: fn(&ContentAnalysis) -> f64| -> f64 {
            if total_weight > 0.0 {
                analyses
                    .iter()
                    .map(|(a, w)| field(a) * w.max(0.0))
                    .sum::<f64>()
                    / total_weight
            } else {
                simple_average(analyses, field)
            }
        };

        let mut insights: Vec<Insight> = analyses
            .iter()
            .flat_map(|(a, _)| a.insights.iter().cloned())
            .collect();
        insights.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));
        let mut insights = dedup_by_key(insights, |i| i.text.as_str());
        insights.truncate(self.config.max_insights);

        let mut facts = dedup_by_key(
            analyses.iter().flat_map(|(a, _)| a.facts.iter().cloned()).collect(),
            |f| f.text.as_str(),
        );
        facts.truncate(self.config.max_facts);

        let mut quotes = dedup_by_key(
            analyses.iter().flat_map(|(a, _)| a.quotes.iter().cloned()).collect(),
            |q| q.text.as_str(),
        );
        quotes.truncate(self.config.max_quotes);

        let mut metrics = dedup_by_key(
            analyses.iter().flat_map(|(a, _)| a.metrics.iter().cloned()).collect(),
            |m| m.context.as_str(),
        );
        metrics.truncate(self.config.max_metrics);

        let warnings = dedup_by_key(
            analyses.iter().flat_map(|(a, _)| a.warnings.iter().cloned()).collect(),
            |w| w.message.as_str(),
        );

        ContentAnalysis {
            relevance_score: weighted(|a| a.relevance_score),
            quality_score: weighted(|a| a.quality_score),
            cultural_score: weighted(|a| a.cultural_score),
            factual_density: simple_average(analyses, |a| a.factual_density),
            sentiment: simple_average(analyses, |a| a.sentiment),
            readability: simple_average(analyses, |a| a.readability),
            insights,
            facts,
            quotes,
            metrics,
            warnings,
        }
    }

    /// 含洞察标志的句子，按标志 + 主题词重合度评分
    fn extract_insights(
        &self,
        sentences: &[String],
        topic_words: &[String],
        source_trust: f64,
    ) -> Vec<Insight> {
        let mut insights: Vec<Insight> = sentences
            .iter()
            .filter_map(|sentence| {
                let lower = sentence.to_lowercase();
                if !self
                    .tables
                    .insight_indicators
                    .iter()
                    .any(|indicator| lower.contains(indicator))
                {
                    return None;
                }

                let overlap = if topic_words.is_empty() {
                    0.0
                } else {
                    topic_words
                        .iter()
                        .filter(|w| lower.contains(w.as_str()))
                        .count() as f64
                        / topic_words.len() as f64
                };
                let relevance = (0.15 + 0.85 * overlap).clamp(0.0, 1.0);
                if relevance < self.config.min_insight_relevance {
                    return None;
                }

                let has_number = sentence.chars().any(|c| c.is_ascii_digit());
                let confidence = (0.4
                    + if has_number { 0.2 } else { 0.0 }
                    + 0.4 * (source_trust / 10.0).clamp(0.0, 1.0))
                .clamp(0.0, 1.0);

                Some(Insight {
                    text: sentence.clone(),
                    category: categorize(&lower, &self.tables),
                    confidence,
                    relevance,
                })
            })
            .collect();

        insights.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));
        let mut insights = dedup_by_key(insights, |i| i.text.as_str());
        insights.truncate(self.config.max_insights);
        insights
    }

    fn warnings(&self, text: &str, analysis: &ContentAnalysis) -> Vec<AnalysisWarning> {
        let mut warnings = Vec::new();
        let lower = text.to_lowercase();

        if analysis.relevance_score < 0.3 {
            warnings.push(AnalysisWarning {
                kind: WarningKind::LowRelevance,
                severity: if analysis.relevance_score < 0.15 {
                    Severity::High
                } else {
                    Severity::Medium
                },
                message: format!(
                    "Low topic relevance ({:.0}%)",
                    analysis.relevance_score * 100.0
                ),
            });
        }

        if analysis.quality_score < 0.5 {
            warnings.push(AnalysisWarning {
                kind: WarningKind::LowQuality,
                severity: Severity::Medium,
                message: format!("Low source quality ({:.0}%)", analysis.quality_score * 100.0),
            });
        }

        let reference_year = self
            .config
            .reference_year
            .unwrap_or_else(|| chrono::Utc::now().year());
        let latest_year = YEAR
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<i32>().ok())
            .filter(|year| *year <= reference_year)
            .max();
        if let Some(year) = latest_year
            && reference_year - year > 2
        {
            warnings.push(AnalysisWarning {
                kind: WarningKind::OutdatedContent,
                severity: Severity::Low,
                message: format!("Most recent year referenced is {}", year),
            });
        }

        let too_short = word_count(text) < 50;
        let marker = self
            .tables
            .paywall_markers
            .iter()
            .find(|m| lower.contains(*m));
        if too_short || marker.is_some() {
            warnings.push(AnalysisWarning {
                kind: WarningKind::Paywall,
                severity: Severity::Medium,
                message: match marker {
                    Some(m) => format!("Content looks paywalled (\"{}\")", m),
                    None => "Content is very short and may be truncated".to_string(),
                },
            });
        }

        if let Some(m) = self
            .tables
            .machine_translation_markers
            .iter()
            .find(|m| lower.contains(*m))
        {
            warnings.push(AnalysisWarning {
                kind: WarningKind::MachineTranslation,
                severity: Severity::Medium,
                message: format!("Machine translation marker found (\"{}\")", m),
            });
        }

        warnings
    }
}

fn simple_average(
    analyses: &[(ContentAnalysis, f64)],
    field: fn(&ContentAnalysis) -> f64,
) -> f64 {
    if analyses.is_empty() {
        return 0.0;
    }
    analyses.iter().map(|(a, _)| field(a)).sum::<f64>() / analyses.len() as f64
}

fn dedup_by_key<T>(items: Vec<T>, text: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(normalized_key(text(item), DEDUP_PREFIX_LEN)))
        .collect()
}

/// 主题词出现次数加权（词越长权重越高），再加相关词命中的固定加分
pub fn relevance(text: &str, topic: &str, topic_words: &[String], tables: &AnalyzerTables) -> f64 {
    if topic_words.is_empty() {
        return 0.0;
    }
    let lower = text.to_lowercase();

    let (score, total_weight) = topic_words.iter().fold((0.0, 0.0), |(score, total), word| {
        let weight = word.chars().count() as f64;
        let occurrences = count_occurrences(&lower, word) as f64;
        (score + weight * (occurrences * 0.25).min(1.0), total + weight)
    });
    let base = if total_weight > 0.0 {
        score / total_weight
    } else {
        0.0
    };

    let topic_lower = topic.to_lowercase();
    let related_hits = tables
        .related_terms
        .iter()
        .filter(|(key, _)| topic_lower.contains(key))
        .flat_map(|(_, related)| related.iter())
        .filter(|term| lower.contains(*term))
        .count();

    (base + 0.05 * related_hits as f64).clamp(0.0, 1.0)
}

/// 从来源可信度出发，按长度、段落、数字、引用与日期加分
pub fn quality(text: &str, source_trust: f64) -> f64 {
    let mut score = (source_trust / 10.0).clamp(0.0, 1.0);
    let words = word_count(text);
    if words >= 300 {
        score += 0.05;
    }
    if words >= 500 {
        score += 0.05;
    }
    if paragraphs(text).len() >= 3 {
        score += 0.05;
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        score += 0.05;
    }
    if QUOTED.is_match(text) {
        score += 0.05;
    }
    if DATE.is_match(text) {
        score += 0.05;
    }
    score.clamp(0.0, 1.0)
}

/// 本地市场文化契合度：公司名、商业术语、地名与本币
pub fn cultural_fit(text: &str, tables: &AnalyzerTables) -> f64 {
    let lower = text.to_lowercase();

    let companies = LOCAL_COMPANY.find_iter(text).count() as f64;
    let terms = tables
        .local_business_terms
        .iter()
        .filter(|term| lower.contains(*term))
        .count() as f64;
    let places = tables
        .local_places
        .iter()
        .filter(|place| text.contains(*place))
        .count() as f64;
    let currency = if LOCAL_CURRENCY.is_match(text) { 0.1 } else { 0.0 };

    ((companies * 0.1).min(0.3) + (terms * 0.05).min(0.3) + (places * 0.1).min(0.3) + currency)
        .clamp(0.0, 1.0)
}

/// 正负面词数量差的比值（-1..1）
pub fn sentiment(text: &str, tables: &AnalyzerTables) -> f64 {
    let lower = text.to_lowercase();
    let positive: usize = tables
        .positive_words
        .iter()
        .map(|w| count_occurrences(&lower, w))
        .sum();
    let negative: usize = tables
        .negative_words
        .iter()
        .map(|w| count_occurrences(&lower, w))
        .sum();
    let total = positive + negative;
    if total == 0 {
        return 0.0;
    }
    ((positive as f64 - negative as f64) / total as f64).clamp(-1.0, 1.0)
}

fn categorize(sentence_lower: &str, tables: &AnalyzerTables) -> InsightCategory {
    tables
        .category_keywords
        .iter()
        .map(|(category, keywords)| {
            let hits = keywords
                .iter()
                .filter(|k| sentence_lower.contains(*k))
                .count();
            (*category, hits)
        })
        .filter(|(_, hits)| *hits > 0)
        // 同分时取表中靠前的类别
        .fold(None, |best: Option<(InsightCategory, usize)>, current| match best {
            Some(b) if b.1 >= current.1 => Some(b),
            _ => Some(current),
        })
        .map(|(category, _)| category)
        .unwrap_or(InsightCategory::Market)
}

/// 每个句子至多记一条事实，金额优先于统计、公司与日期
pub fn extract_facts(sentences: &[String]) -> Vec<Fact> {
    sentences
        .iter()
        .filter_map(|sentence| {
            let (kind, confidence) = if MONETARY.is_match(sentence) {
                (FactKind::Monetary, 0.8)
            } else if STATISTIC.is_match(sentence) {
                (FactKind::Statistic, 0.8)
            } else if COMPANY.is_match(sentence) {
                (FactKind::Company, 0.7)
            } else if DATE.is_match(sentence) {
                (FactKind::Date, 0.6)
            } else {
                return None;
            };
            Some(Fact {
                text: sentence.clone(),
                kind,
                confidence,
            })
        })
        .collect()
}

/// 引号内的片段，并在其后查找说话人
pub fn extract_quotes(text: &str, max: usize) -> Vec<Quote> {
    let quotes: Vec<Quote> = QUOTED
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let quoted = caps.get(1)?.as_str().trim().to_string();
            let tail: String = text[whole.end()..].chars().take(80).collect();
            let speaker = ATTRIBUTION
                .captures(&tail)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());
            Some(Quote {
                text: quoted,
                speaker,
            })
        })
        .collect();
    let mut quotes = dedup_by_key(quotes, |q| q.text.as_str());
    quotes.truncate(max);
    quotes
}

/// 增长、市场份额与营收类指标
pub fn extract_metrics(sentences: &[String], max: usize) -> Vec<Metric> {
    let patterns: [(&LazyLock<Regex>, MetricKind); 3] = [
        (&MARKET_SHARE, MetricKind::MarketShare),
        (&GROWTH, MetricKind::Growth),
        (&REVENUE, MetricKind::Revenue),
    ];

    let mut metrics = Vec::new();
    for sentence in sentences {
        if metrics.len() >= max {
            break;
        }
        for (pattern, kind) in &patterns {
            if let Some(value) = pattern.captures(sentence).and_then(|c| c.get(1)) {
                metrics.push(Metric {
                    kind: *kind,
                    value: value.as_str().trim().to_string(),
                    context: sentence.clone(),
                });
                break;
            }
        }
    }
    metrics
}

// Include tests
#[cfg(test)]
mod tests;
