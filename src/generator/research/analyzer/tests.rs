#[cfg(test)]
mod tests {
    use crate::config::AnalysisConfig;
    use crate::generator::research::analyzer::*;
    use crate::i18n::OutputLanguage;
    use crate::types::analysis::{FactKind, InsightCategory, MetricKind, WarningKind};

    const ARTICLE: &str = "Ifølge en ny rapport fra SSB økte omsetningen i norsk sjømatnæring med 12 prosent i 2024. \
        Eksporten av laks til Asia viser at etterspørselen fortsatt er sterk.\n\n\
        Mowi ASA melder om en markedsandel på 20 prosent i Europa. \
        «Vi ser en tydelig vekst i markedet for bærekraftig laks», sier Ola Hansen, daglig leder i Sjømat Norge.\n\n\
        Omsetning på 4,2 milliarder kroner ble rapportert i mars. \
        Næringen i Bergen og Ålesund forventer videre vekst i eksporten.";

    fn analyzer() -> ContentAnalyzer {
        ContentAnalyzer::new(AnalysisConfig {
            reference_year: Some(2025),
            ..AnalysisConfig::default()
        })
    }

    #[test]
    fn test_scores_are_bounded() {
        let analysis = analyzer().analyze(ARTICLE, 9.5, "Eksport av laks og sjømat", OutputLanguage::Bokmal);
        for score in [
            analysis.relevance_score,
            analysis.quality_score,
            analysis.cultural_score,
        ] {
            assert!((0.0..=1.0).contains(&score), "{}", score);
        }
        assert!((-1.0..=1.0).contains(&analysis.sentiment));
        assert!((0.0..=100.0).contains(&analysis.readability));
        assert!(analysis.sentiment > 0.0);
    }

    #[test]
    fn test_relevance_rewards_topic_words_and_related_terms() {
        let tables = AnalyzerTables::default();
        let topic = "sjømat eksport";
        let words = crate::utils::text::significant_words(topic);
        let on_topic = relevance("Sjømat og eksport av laks. Sjømat er viktig for eksport.", topic, &words, &tables);
        let off_topic = relevance("Fotball er gøy på søndager.", topic, &words, &tables);
        assert!(on_topic > off_topic);
        assert_eq!(off_topic, 0.0);
    }

    #[test]
    fn test_quality_starts_from_trust_and_caps_at_one() {
        assert!((quality("kort tekst", 6.0) - 0.6).abs() < 1e-9);
        assert!(quality(ARTICLE, 10.0) <= 1.0);
        assert!(quality(ARTICLE, 5.0) > 0.5);
    }

    #[test]
    fn test_cultural_score_only_for_local_language() {
        let analyzer = analyzer();
        let local = analyzer.analyze(ARTICLE, 9.0, "sjømat", OutputLanguage::Bokmal);
        let english = analyzer.analyze(ARTICLE, 9.0, "sjømat", OutputLanguage::English);
        assert!(local.cultural_score > 0.3);
        assert_eq!(english.cultural_score, 0.5);
    }

    #[test]
    fn test_insights_need_indicator_and_are_categorized() {
        let analysis = analyzer().analyze(ARTICLE, 9.0, "Eksport av laks", OutputLanguage::Bokmal);
        assert!(!analysis.insights.is_empty());
        assert!(analysis.insights.len() <= AnalysisConfig::default().max_insights);
        for insight in &analysis.insights {
            assert!(insight.relevance >= 0.2);
        }
        let laks = analysis
            .insights
            .iter()
            .find(|i| i.text.contains("etterspørselen"))
            .unwrap();
        assert_eq!(laks.category, InsightCategory::Market);
        for pair in analysis.insights.windows(2) {
            assert!(pair[0].rank_score() >= pair[1].rank_score());
        }
    }

    #[test]
    fn test_fact_quote_and_metric_extraction() {
        let analysis = analyzer().analyze(ARTICLE, 9.0, "sjømat", OutputLanguage::Bokmal);

        assert!(analysis.facts.iter().any(|f| f.kind == FactKind::Monetary));
        assert!(analysis.facts.iter().any(|f| f.kind == FactKind::Statistic));
        assert!(analysis.factual_density > 0.0);

        assert_eq!(analysis.quotes.len(), 1);
        assert_eq!(analysis.quotes[0].speaker.as_deref(), Some("Ola Hansen"));

        assert!(analysis
            .metrics
            .iter()
            .any(|m| m.kind == MetricKind::MarketShare && m.value == "20 prosent"));
        assert!(analysis
            .metrics
            .iter()
            .any(|m| m.kind == MetricKind::Growth && m.value == "12 prosent"));
    }

    #[test]
    fn test_warnings_for_short_stale_and_translated_text() {
        let text = "Automatisk oversatt: Markedet vokste i 2019. Les hele saken.";
        let analysis = analyzer().analyze(text, 3.0, "kunstig intelligens", OutputLanguage::Bokmal);
        let kinds: Vec<_> = analysis.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&WarningKind::LowRelevance));
        assert!(kinds.contains(&WarningKind::LowQuality));
        assert!(kinds.contains(&WarningKind::OutdatedContent));
        assert!(kinds.contains(&WarningKind::Paywall));
        assert!(kinds.contains(&WarningKind::MachineTranslation));
    }

    #[test]
    fn test_recent_years_are_not_outdated() {
        let text = "Markedet vokste kraftig i 2024 og ventes å vokse i 2025.";
        let analysis = analyzer().analyze(text, 9.0, "markedet", OutputLanguage::Bokmal);
        assert!(analysis
            .warnings
            .iter()
            .all(|w| w.kind != WarningKind::OutdatedContent));
    }

    #[test]
    fn test_merge_averages_and_deduplicates() {
        let analyzer = analyzer();
        let a = analyzer.analyze(ARTICLE, 9.0, "sjømat", OutputLanguage::Bokmal);
        let mut b = a.clone();
        b.relevance_score = 0.0;
        b.sentiment = -1.0;

        let merged = analyzer.merge(&[(a.clone(), 3.0), (b, 1.0)]);
        assert!((merged.relevance_score - a.relevance_score * 0.75).abs() < 1e-9);
        assert!((merged.sentiment - (a.sentiment - 1.0) / 2.0).abs() < 1e-9);
        assert_eq!(merged.facts.len(), a.facts.len());
        assert_eq!(merged.quotes.len(), a.quotes.len());
        assert_eq!(merged.insights.len(), a.insights.len());
    }

    #[test]
    fn test_merge_of_nothing_is_default() {
        let merged = analyzer().merge(&[]);
        assert_eq!(merged.relevance_score, 0.0);
        assert!(merged.insights.is_empty());
    }

    #[test]
    fn test_custom_tables_change_scoring() {
        static POSITIVE: &[&str] = &["fotball"];
        let tables = AnalyzerTables {
            positive_words: POSITIVE,
            negative_words: &[],
            ..AnalyzerTables::default()
        };
        assert_eq!(sentiment("Fotball på tv", &tables), 1.0);
        assert_eq!(sentiment("Fotball på tv", &AnalyzerTables::default()), 0.0);
    }

    #[test]
    fn test_extract_metrics_honours_limit() {
        let sentences = vec![
            "Omsetningen økte med 12 prosent i fjor.".to_string(),
            "Eksporten steg 8 % i første kvartal.".to_string(),
        ];
        assert!(extract_metrics(&sentences, 0).is_empty());
        assert_eq!(extract_metrics(&sentences, 1).len(), 1);
        assert_eq!(extract_metrics(&sentences, 5).len(), 2);
        assert_eq!(extract_metrics(&sentences, 1)[0].kind, MetricKind::Growth);
    }
}
