#[cfg(test)]
mod tests {
    use crate::generator::adaptation::*;
    use crate::i18n::OutputLanguage;
    use crate::types::adaptation::{ChangeType, Impact, ToneAssessment};
    use crate::types::request::{Audience, ContentType, Formality, Market};

    fn context(language: OutputLanguage) -> AdaptationContext {
        AdaptationContext {
            market: Market::Norway,
            industry: None,
            formality: Formality::Neutral,
            audience: Audience::General,
            language,
            content_type: ContentType::Article,
        }
    }

    fn long_paragraph() -> String {
        "Markedet for fornybar energi vokser raskt i Norge i år. ".repeat(16)
    }

    #[test]
    fn test_boastful_phrase_is_removed_and_recorded() {
        let adapter = CulturalAdapter::default();
        let result = adapter.adapt(
            "We are the best at cloud migration for Norwegian companies.",
            &context(OutputLanguage::English),
        );

        assert!(!result.adapted_text.to_lowercase().contains("we are the best at"));
        assert!(result.adapted_text.starts_with("We have solid experience in"));
        let change = result
            .changes
            .iter()
            .find(|c| c.change_type == ChangeType::SelfPromotion)
            .unwrap();
        assert_eq!(change.change_type.as_str(), "self-promotion");
        assert_eq!(change.impact, Impact::High);
        assert!(result.compliance.violations.is_empty());
    }

    #[test]
    fn test_norwegian_superlatives_are_moderated() {
        let adapter = CulturalAdapter::default();
        let result = adapter.adapt(
            "Vi er markedsledende på revolusjonerende løsninger for norske bedrifter.",
            &context(OutputLanguage::Bokmal),
        );
        assert!(result.adapted_text.contains("veletablert"));
        assert!(result.adapted_text.contains("nyskapende"));
        assert!(!result.adapted_text.contains("markedsledende"));
    }

    #[test]
    fn test_loanwords_replaced_for_local_language_only() {
        let adapter = CulturalAdapter::default();
        let text = "Etter hvert meeting samler vi feedback fra alle kunder i prosjektet.";

        let local = adapter.adapt(text, &context(OutputLanguage::Bokmal));
        assert!(local.adapted_text.contains("møte"));
        assert!(local.adapted_text.contains("tilbakemelding"));
        assert_eq!(
            local
                .changes
                .iter()
                .filter(|c| c.change_type == ChangeType::Terminology)
                .count(),
            2
        );

        let english = adapter.adapt(text, &context(OutputLanguage::English));
        assert!(english.adapted_text.contains("meeting"));
    }

    #[test]
    fn test_tone_moves_toward_requested_formality() {
        let adapter = CulturalAdapter::default();
        let mut ctx = context(OutputLanguage::Bokmal);
        ctx.formality = Formality::Formal;

        let result = adapter.adapt(
            "Sjekk ut tilbudet vårt i dag, det funker godt for alle kunder.",
            &ctx,
        );
        assert!(result.adapted_text.starts_with("Se nærmere på"));
        assert!(result.adapted_text.contains("fungerer"));
        assert!(result.changes.iter().any(|c| c.change_type == ChangeType::Tone));
        assert_eq!(result.compliance.tone, ToneAssessment::Appropriate);
    }

    #[test]
    fn test_executive_audience_drops_filler() {
        let adapter = CulturalAdapter::default();
        let mut ctx = context(OutputLanguage::English);
        ctx.audience = Audience::Executive;

        let result = adapter.adapt(
            "This investment is basically a strategic choice for the board.",
            &ctx,
        );
        assert_eq!(
            result.adapted_text,
            "This investment is a strategic choice for the board."
        );
    }

    #[test]
    fn test_first_person_becomes_collective() {
        let adapter = CulturalAdapter::default();
        let result = adapter.adapt(
            "Jeg mener at norske bedrifter bør investere mer i opplæring.",
            &context(OutputLanguage::Bokmal),
        );
        assert!(result.adapted_text.starts_with("Vi mener"));
        assert!(result
            .changes
            .iter()
            .any(|c| c.change_type == ChangeType::Consensus));
    }

    #[test]
    fn test_long_text_gets_collaborative_phrase_and_paragraphs() {
        let adapter = CulturalAdapter::default();
        let result = adapter.adapt(&long_paragraph(), &context(OutputLanguage::Bokmal));

        assert!(result.adapted_text.contains("jobber sammen"));
        assert_eq!(crate::utils::text::paragraphs(&result.adapted_text).len(), 3);
        assert!(result
            .changes
            .iter()
            .any(|c| c.change_type == ChangeType::Structure));
        assert!(!result.compliance.inclusive_indicators.is_empty());
    }

    #[test]
    fn test_technology_content_gets_sustainability_clause() {
        let adapter = CulturalAdapter::default();
        let mut ctx = context(OutputLanguage::Bokmal);
        ctx.industry = Some("Teknologi".to_string());

        let result = adapter.adapt(
            "Vår nye AI-plattform hjelper norske bedrifter med å automatisere rapportering.",
            &ctx,
        );
        assert!(result.adapted_text.contains("KI-plattform"));
        assert!(result.adapted_text.contains("bærekraft"));

        let again = adapter.adapt(&result.adapted_text, &ctx);
        assert_eq!(
            again.adapted_text.matches("bærekraft").count(),
            result.adapted_text.matches("bærekraft").count()
        );
    }

    #[test]
    fn test_short_opening_gets_context() {
        let adapter = CulturalAdapter::default();
        let result = adapter.adapt(
            "Endelig. Nå lanserer vi en ny tjeneste for små og mellomstore bedrifter.",
            &context(OutputLanguage::Bokmal),
        );
        assert!(result
            .adapted_text
            .starts_with("Dette er aktuelt for mange norske virksomheter."));
    }

    #[test]
    fn test_swedish_only_moderates_self_promotion() {
        let adapter = CulturalAdapter::default();
        let text = "Vi har ett möte om feedback. Det är world-class arbete för alla kunder.";
        let result = adapter.adapt(text, &context(OutputLanguage::Swedish));
        assert!(result.adapted_text.contains("feedback"));
        assert!(result.adapted_text.contains("well-regarded"));
        assert!(result
            .changes
            .iter()
            .all(|c| c.change_type == ChangeType::SelfPromotion));
    }

    #[test]
    fn test_scores_are_bounded_and_passes_ordered() {
        let adapter = CulturalAdapter::default();
        assert_eq!(
            adapter.pass_names(),
            vec![
                "self-promotion",
                "terminology",
                "tone",
                "consensus",
                "industry",
                "structure"
            ]
        );
        let result = adapter.adapt(
            "Garantert!! Ingen andre leverer som oss, aldri før har noen sett maken.",
            &context(OutputLanguage::Bokmal),
        );
        assert!((0.0..=100.0).contains(&result.cultural_score));
        assert!((0.0..=100.0).contains(&result.compliance.jante_compliance));
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn test_custom_pass_sequence() {
        let adapter = CulturalAdapter::with_passes(
            AdaptationTables::default(),
            vec![Box::new(passes::TerminologyPass)],
        );
        let result = adapter.adapt(
            "Vi er markedsledende på feedback og oppfølging av kunder.",
            &context(OutputLanguage::Bokmal),
        );
        assert!(result.adapted_text.contains("markedsledende"));
        assert!(result.adapted_text.contains("tilbakemelding"));
        assert!(!result.compliance.violations.is_empty());
    }
}
