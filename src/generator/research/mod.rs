//! 研究阶段：路由 → 并发收集 → 分析 → 综合
//!
//! 研究失败只会降低置信度与洞察数量，从不阻塞生成。

use crate::i18n::OutputLanguage;
use crate::types::research::{ResearchOutcome, ResearchSynthesis};

pub mod analyzer;
pub mod gatherer;
pub mod router;

use analyzer::ContentAnalyzer;

/// 逐条分析研究结果，并按条目可信度加权合并
pub fn synthesize(
    outcome: ResearchOutcome,
    analyzer: &ContentAnalyzer,
    topic: &str,
    language: OutputLanguage,
) -> ResearchSynthesis {
    if outcome.items.is_empty() {
        return ResearchSynthesis {
            items: Vec::new(),
            failures: outcome.failures,
            confidence: 0.0,
            analysis: None,
        };
    }

    let analyses: Vec<_> = outcome
        .items
        .iter()
        .map(|item| {
            let text = format!("{}. {}", item.title, item.snippet);
            let analysis = analyzer.analyze(&text, item.credibility * 10.0, topic, language);
            (analysis, item.credibility)
        })
        .collect();

    ResearchSynthesis {
        analysis: Some(analyzer.merge(&analyses)),
        items: outcome.items,
        failures: outcome.failures,
        confidence: outcome.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::types::research::{ItemMetadata, ResearchItem};

    #[test]
    fn test_empty_outcome_has_no_analysis() {
        let analyzer = ContentAnalyzer::new(AnalysisConfig::default());
        let synthesis = synthesize(
            ResearchOutcome::default(),
            &analyzer,
            "havvind",
            OutputLanguage::Bokmal,
        );
        assert!(synthesis.is_empty());
        assert!(synthesis.analysis.is_none());
        assert_eq!(synthesis.confidence, 0.0);
    }

    #[test]
    fn test_items_are_analyzed_and_merged() {
        let analyzer = ContentAnalyzer::new(AnalysisConfig::default());
        let item = ResearchItem {
            source_id: "ssb".to_string(),
            url: "https://ssb.no/havvind".to_string(),
            title: "Havvind i vekst".to_string(),
            snippet: "Ifølge SSB viser tallene at havvind vokser med 15 prosent i året.".to_string(),
            relevance: 0.9,
            credibility: 0.98,
            metadata: ItemMetadata::default(),
        };
        let outcome = ResearchOutcome {
            items: vec![item],
            failures: vec![],
            confidence: 0.9,
        };

        let synthesis = synthesize(outcome, &analyzer, "havvind", OutputLanguage::Bokmal);
        let analysis = synthesis.analysis.unwrap();
        assert!(analysis.relevance_score > 0.0);
        assert!(!analysis.insights.is_empty());
        assert_eq!(synthesis.confidence, 0.9);
    }
}
