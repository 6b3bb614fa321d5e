//! 内置研究源目录

use crate::types::source::{
    SourceCategory, SourceDescriptor, SourceScope, SourceTier, UpdateFrequency,
};

#[allow(clippy::too_many_arguments)]
fn source(
    id: &str,
    domain: &str,
    name: &str,
    category: SourceCategory,
    tier: SourceTier,
    scope: SourceScope,
    trust_score: f64,
    business_relevance: f64,
    cultural_authenticity: f64,
    specializations: &[&str],
    requires_auth: bool,
    update_frequency: UpdateFrequency,
) -> SourceDescriptor {
    SourceDescriptor {
        id: id.to_string(),
        domain: domain.to_string(),
        name: name.to_string(),
        category,
        tier,
        scope,
        trust_score,
        business_relevance,
        cultural_authenticity,
        specializations: specializations.iter().map(|s| s.to_string()).collect(),
        language: match scope {
            SourceScope::Local => "no".to_string(),
            SourceScope::International => "en".to_string(),
        },
        requires_auth,
        scraping_allowed: !requires_auth,
        update_frequency,
    }
}

/// 挪威本地源
pub fn norwegian_sources() -> Vec<SourceDescriptor> {
    use SourceCategory::*;
    use SourceScope::Local;
    use SourceTier::*;
    use UpdateFrequency::*;

    vec![
        source("ssb", "ssb.no", "Statistisk sentralbyrå", Statistics, Free, Local, 9.8, 8.0, 0.95,
            &["statistics", "economy", "demographics", "labour", "general"], false, Daily),
        source("regjeringen", "regjeringen.no", "Regjeringen", Government, Free, Local, 9.5, 7.0, 0.95,
            &["policy", "regulation", "economy", "energy", "sustainability"], false, Daily),
        source("brreg", "brreg.no", "Brønnøysundregistrene", Government, Free, Local, 9.3, 7.5, 0.9,
            &["business", "startup", "regulation"], false, Daily),
        source("innovasjonnorge", "innovasjonnorge.no", "Innovasjon Norge", Government, Free, Local, 8.8, 8.5, 0.9,
            &["innovation", "startup", "export", "tourism", "sustainability"], false, Weekly),
        source("nho", "nho.no", "Næringslivets Hovedorganisasjon", Professional, Free, Local, 8.5, 9.0, 0.92,
            &["business", "labour", "industry", "economy", "general"], false, Weekly),
        source("virke", "virke.no", "Virke", Professional, Free, Local, 8.2, 8.5, 0.9,
            &["retail", "trade", "business"], false, Weekly),
        source("abelia", "abelia.no", "Abelia", Industry, Free, Local, 8.0, 8.5, 0.88,
            &["technology", "innovation", "digitalization"], false, Weekly),
        source("dn", "dn.no", "Dagens Næringsliv", News, Premium, Local, 8.7, 9.5, 0.93,
            &["business", "finance", "economy", "general"], true, Realtime),
        source("e24", "e24.no", "E24", News, Standard, Local, 8.3, 9.0, 0.9,
            &["finance", "economy", "energy", "business"], false, Realtime),
        source("finansavisen", "finansavisen.no", "Finansavisen", News, Premium, Local, 8.2, 9.0, 0.88,
            &["finance", "investment", "shipping"], true, Realtime),
        source("tu", "tu.no", "Teknisk Ukeblad", Industry, Standard, Local, 8.4, 8.0, 0.9,
            &["technology", "engineering", "energy", "digitalization"], false, Daily),
        source("digi", "digi.no", "Digi.no", News, Standard, Local, 7.8, 7.5, 0.87,
            &["technology", "digitalization", "cybersecurity"], false, Daily),
        source("forskningsradet", "forskningsradet.no", "Forskningsrådet", Academic, Free, Local, 9.0, 6.5, 0.9,
            &["research", "innovation", "technology", "sustainability"], false, Weekly),
        source("sjomat", "sjomatnorge.no", "Sjømat Norge", Industry, Free, Local, 8.0, 8.0, 0.92,
            &["seafood", "aquaculture", "export"], false, Weekly),
        source("norskindustri", "norskindustri.no", "Norsk Industri", Industry, Free, Local, 8.1, 8.5, 0.9,
            &["industry", "manufacturing", "energy", "maritime"], false, Weekly),
        source("finans-norge", "finansnorge.no", "Finans Norge", Professional, Free, Local, 8.3, 8.5, 0.9,
            &["finance", "banking", "insurance", "regulation"], false, Weekly),
    ]
}

/// 国际源
pub fn international_sources() -> Vec<SourceDescriptor> {
    use SourceCategory::*;
    use SourceScope::International;
    use SourceTier::*;
    use UpdateFrequency::*;

    vec![
        source("oecd", "oecd.org", "OECD", Government, Free, International, 9.4, 7.5, 0.4,
            &["economy", "policy", "statistics", "general"], false, Monthly),
        source("eurostat", "ec.europa.eu", "Eurostat", Statistics, Free, International, 9.3, 7.0, 0.45,
            &["statistics", "economy", "regulation"], false, Monthly),
        source("mckinsey", "mckinsey.com", "McKinsey & Company", Consulting, Standard, International, 8.6, 9.0, 0.25,
            &["strategy", "technology", "business", "digitalization", "general"], false, Weekly),
        source("hbr", "hbr.org", "Harvard Business Review", Academic, Premium, International, 8.8, 9.0, 0.2,
            &["leadership", "strategy", "marketing", "business"], true, Weekly),
        source("reuters", "reuters.com", "Reuters", News, Standard, International, 8.9, 8.5, 0.3,
            &["finance", "energy", "economy", "general"], false, Realtime),
        source("gartner", "gartner.com", "Gartner", Consulting, Premium, International, 8.5, 8.5, 0.2,
            &["technology", "digitalization", "cybersecurity"], true, Weekly),
        source("statista", "statista.com", "Statista", Statistics, Premium, International, 8.0, 8.0, 0.3,
            &["statistics", "marketing", "retail", "consumer"], true, Daily),
        source("iea", "iea.org", "International Energy Agency", Government, Free, International, 9.1, 7.5, 0.35,
            &["energy", "sustainability", "climate"], false, Monthly),
        source("techcrunch", "techcrunch.com", "TechCrunch", News, Free, International, 7.5, 7.5, 0.15,
            &["technology", "startup", "investment"], false, Realtime),
        source("wef", "weforum.org", "World Economic Forum", Professional, Free, International, 8.2, 8.0, 0.3,
            &["sustainability", "economy", "leadership", "general"], false, Weekly),
    ]
}
