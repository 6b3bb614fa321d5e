//! 分析器使用的关键词表
//!
//! 评分函数只依赖传入的表，便于单独测试评分逻辑。

use crate::types::analysis::InsightCategory;

/// 分析器的词表集合
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerTables {
    /// 主题词 → 相关词
    pub related_terms: &'static [(&'static str, &'static [&'static str])],
    /// 洞察标志短语
    pub insight_indicators: &'static [&'static str],
    /// 洞察类别关键词
    pub category_keywords: &'static [(InsightCategory, &'static [&'static str])],
    /// 本地商业术语
    pub local_business_terms: &'static [&'static str],
    /// 本地地名
    pub local_places: &'static [&'static str],
    /// 付费墙与截断标志
    pub paywall_markers: &'static [&'static str],
    /// 机器翻译标志
    pub machine_translation_markers: &'static [&'static str],
    pub positive_words: &'static [&'static str],
    pub negative_words: &'static [&'static str],
}

impl Default for AnalyzerTables {
    fn default() -> Self {
        Self::norwegian()
    }
}

impl AnalyzerTables {
    /// 挪威语与英语混合的内置词表
    pub fn norwegian() -> Self {
        Self {
            related_terms: RELATED_TERMS,
            insight_indicators: INSIGHT_INDICATORS,
            category_keywords: CATEGORY_KEYWORDS,
            local_business_terms: LOCAL_BUSINESS_TERMS,
            local_places: LOCAL_PLACES,
            paywall_markers: PAYWALL_MARKERS,
            machine_translation_markers: MACHINE_TRANSLATION_MARKERS,
            positive_words: POSITIVE_WORDS,
            negative_words: NEGATIVE_WORDS,
        }
    }
}

static RELATED_TERMS: &[(&str, &[&str])] = &[
    ("bærekraft", &["klima", "utslipp", "grønn", "sirkulær", "esg", "miljø"]),
    ("sustainability", &["climate", "emission", "green", "circular", "esg"]),
    ("digitalisering", &["automatisering", "skytjenester", "kunstig intelligens", "data"]),
    ("digital", &["automation", "cloud", "software", "data"]),
    ("energi", &["kraft", "strøm", "havvind", "hydrogen", "fornybar"]),
    ("energy", &["power", "renewable", "wind", "hydrogen", "grid"]),
    ("markedsføring", &["merkevare", "kampanje", "kunde", "sosiale medier"]),
    ("marketing", &["brand", "campaign", "customer", "social media"]),
    ("sjømat", &["laks", "oppdrett", "eksport", "fiskeri"]),
    ("eksport", &["handel", "marked", "toll", "valuta"]),
    ("rekruttering", &["kompetanse", "ansatte", "arbeidsmarked", "talent"]),
    ("finans", &["bank", "rente", "kapital", "investering"]),
    ("handel", &["butikk", "netthandel", "forbruker", "omsetning"]),
    ("innovasjon", &["gründer", "forskning", "teknologi", "oppstart"]),
    ("turisme", &["reiseliv", "overnatting", "besøkende", "destinasjon"]),
];

static INSIGHT_INDICATORS: &[&str] = &[
    "viser at",
    "ifølge",
    "undersøkelse",
    "rapport",
    "analyse",
    "forventer",
    "trend",
    "økende",
    "tyder på",
    "konkluderer",
    "research shows",
    "study",
    "survey",
    "according to",
    "report",
    "expected to",
    "indicates",
    "found that",
];

static CATEGORY_KEYWORDS: &[(InsightCategory, &[&str])] = &[
    (InsightCategory::Market, &["marked", "market", "etterspørsel", "demand", "segment"]),
    (InsightCategory::Trend, &["trend", "økende", "utvikling", "growing", "rising", "fremover"]),
    (InsightCategory::Consumer, &["forbruker", "kunde", "consumer", "customer", "brukere"]),
    (InsightCategory::Technology, &["teknologi", "technology", "digital", "kunstig intelligens", "ai", "automatisering"]),
    (InsightCategory::Financial, &["omsetning", "inntekt", "revenue", "profit", "kroner", "investering", "kostnad"]),
    (InsightCategory::Regulatory, &["regulering", "lov", "forskrift", "regulation", "compliance", "krav"]),
    (InsightCategory::Competition, &["konkurranse", "konkurrent", "competition", "competitor", "markedsandel"]),
    (InsightCategory::Sustainability, &["bærekraft", "klima", "utslipp", "sustainab", "climate", "miljø"]),
];

static LOCAL_BUSINESS_TERMS: &[&str] = &[
    "næringsliv",
    "bedrift",
    "virksomhet",
    "arbeidsgiver",
    "aksjeselskap",
    "styret",
    "daglig leder",
    "omsetning",
    "årsresultat",
    "kommune",
    "fylke",
    "partssamarbeid",
    "trepartssamarbeid",
    "fagforening",
    "tariff",
    "mva",
];

static LOCAL_PLACES: &[&str] = &[
    "Norge",
    "Oslo",
    "Bergen",
    "Trondheim",
    "Stavanger",
    "Tromsø",
    "Kristiansand",
    "Drammen",
    "Bodø",
    "Ålesund",
    "Vestland",
    "Viken",
    "Nordland",
    "Rogaland",
    "Innlandet",
];

static PAYWALL_MARKERS: &[&str] = &[
    "kun for abonnenter",
    "bli abonnent",
    "logg inn for å lese",
    "les hele saken",
    "pluss-artikkel",
    "subscribe to read",
    "subscribers only",
    "sign in to continue",
    "paywall",
];

static MACHINE_TRANSLATION_MARKERS: &[&str] = &[
    "automatisk oversatt",
    "maskinoversatt",
    "machine translated",
    "google translate",
    "translated automatically",
];

static POSITIVE_WORDS: &[&str] = &[
    "vekst",
    "økning",
    "suksess",
    "gode",
    "sterk",
    "forbedring",
    "muligheter",
    "positiv",
    "growth",
    "success",
    "strong",
    "improvement",
    "opportunity",
    "positive",
];

static NEGATIVE_WORDS: &[&str] = &[
    "nedgang",
    "tap",
    "krise",
    "svak",
    "risiko",
    "problem",
    "usikkerhet",
    "negativ",
    "decline",
    "loss",
    "crisis",
    "weak",
    "risk",
    "negative",
];
