//! 研究源注册表 - 进程级只读目录

use std::collections::HashMap;

use crate::types::source::{SourceDescriptor, SourceScope};

pub mod catalog;

/// 专业领域 → 主题关键词（挪威语与英语）
static SPECIALIZATION_KEYWORDS: &[(&str, &[&str])] = &[
    ("statistics", &["statistikk", "statistics", "tall", "data", "andel"]),
    ("economy", &["økonomi", "economy", "economic", "inflasjon", "inflation", "rente", "vekst"]),
    ("demographics", &["befolkning", "demograf", "population", "innbygger"]),
    ("labour", &["arbeidsmarked", "arbeidsliv", "labour", "labor", "ansatte", "rekruttering", "employment"]),
    ("policy", &["politikk", "policy", "stortinget", "regjering", "offentlig"]),
    ("regulation", &["regulering", "regulation", "lov", "forskrift", "compliance", "gdpr"]),
    ("energy", &["energi", "energy", "kraft", "strøm", "olje", "gass", "oil", "hydrogen", "havvind"]),
    ("sustainability", &["bærekraft", "sustainab", "klima", "climate", "miljø", "grønn", "esg", "sirkulær"]),
    ("business", &["bedrift", "business", "næringsliv", "selskap", "virksomhet", "company"]),
    ("startup", &["startup", "gründer", "oppstart", "entrepreneur", "vekstselskap"]),
    ("innovation", &["innovasjon", "innovation", "nyskaping"]),
    ("export", &["eksport", "export", "internasjonal"]),
    ("tourism", &["turisme", "reiseliv", "tourism", "travel"]),
    ("industry", &["industri", "industry", "produksjon"]),
    ("manufacturing", &["produksjon", "manufacturing", "fabrikk"]),
    ("retail", &["handel", "retail", "butikk", "netthandel", "e-handel", "ecommerce", "varehandel"]),
    ("trade", &["handel", "trade", "grossist"]),
    ("technology", &["teknologi", "technology", "tech", "programvare", "software", "kunstig intelligens", "ki ", " ai", "sky", "cloud"]),
    ("digitalization", &["digitalisering", "digital", "automatisering", "automation"]),
    ("cybersecurity", &["cybersikkerhet", "sikkerhet", "security", "cyber"]),
    ("engineering", &["ingeniør", "engineering", "bygg", "anlegg"]),
    ("finance", &["finans", "finance", "bank", "kapital", "investering", "børs", "aksje"]),
    ("investment", &["investering", "investment", "investor", "kapital", "fond"]),
    ("banking", &["bank", "banking", "lån"]),
    ("insurance", &["forsikring", "insurance"]),
    ("shipping", &["shipping", "rederi", "skipsfart"]),
    ("maritime", &["maritim", "maritime", "havn", "skip", "offshore"]),
    ("research", &["forskning", "research", "studie", "study"]),
    ("seafood", &["sjømat", "seafood", "laks", "salmon", "fisk", "fiskeri"]),
    ("aquaculture", &["havbruk", "oppdrett", "aquaculture", "laks"]),
    ("strategy", &["strategi", "strategy", "ledelse"]),
    ("leadership", &["ledelse", "leadership", "leder", "management"]),
    ("marketing", &["markedsføring", "marketing", "merkevare", "brand", "kampanje", "sosiale medier", "social media"]),
    ("consumer", &["forbruker", "consumer", "kunde", "customer"]),
    ("climate", &["klima", "climate", "utslipp", "emission"]),
];

/// 主题命中的专业领域数量
pub fn specialization_matches(source: &SourceDescriptor, topic_lower: &str) -> usize {
    source
        .specializations
        .iter()
        .filter(|spec| specialization_hits(spec, topic_lower))
        .count()
}

fn specialization_hits(specialization: &str, topic_lower: &str) -> bool {
    let spec = specialization.to_lowercase();
    if topic_lower.contains(&spec) {
        return true;
    }
    SPECIALIZATION_KEYWORDS
        .iter()
        .find(|(name, _)| *name == spec)
        .map(|(_, keywords)| keywords.iter().any(|k| topic_lower.contains(k)))
        .unwrap_or(false)
}

/// 研究源注册表
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
    index: HashMap<String, usize>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SourceRegistry {
    /// 使用内置目录创建注册表
    pub fn builtin() -> Self {
        let mut sources = catalog::norwegian_sources();
        sources.extend(catalog::international_sources());
        Self::from_descriptors(sources)
    }

    /// 从描述列表创建，id重复时后者覆盖前者
    pub fn from_descriptors(descriptors: Vec<SourceDescriptor>) -> Self {
        let mut registry = Self {
            sources: Vec::with_capacity(descriptors.len()),
            index: HashMap::new(),
        };
        for descriptor in descriptors {
            registry.insert(descriptor);
        }
        registry
    }

    /// 在内置目录基础上追加配置中的源
    pub fn with_additional(mut self, extra: &[SourceDescriptor]) -> Self {
        for descriptor in extra {
            self.insert(descriptor.clone());
        }
        self
    }

    fn insert(&mut self, descriptor: SourceDescriptor) {
        let descriptor = SourceDescriptor {
            trust_score: descriptor.trust_score.clamp(0.0, 10.0),
            business_relevance: descriptor.business_relevance.clamp(0.0, 10.0),
            cultural_authenticity: descriptor.cultural_authenticity.clamp(0.0, 1.0),
            ..descriptor
        };
        match self.index.get(&descriptor.id) {
            Some(&pos) => self.sources[pos] = descriptor,
            None => {
                self.index.insert(descriptor.id.clone(), self.sources.len());
                self.sources.push(descriptor);
            }
        }
    }

    pub fn all(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SourceDescriptor> {
        self.index.get(id).map(|&pos| &self.sources[pos])
    }

    pub fn find_by_domain(&self, domain: &str) -> Option<&SourceDescriptor> {
        let domain = domain.trim_start_matches("www.");
        self.sources
            .iter()
            .find(|s| s.domain.eq_ignore_ascii_case(domain))
    }

    pub fn local(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter().filter(|s| s.scope == SourceScope::Local)
    }

    pub fn international(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources
            .iter()
            .filter(|s| s.scope == SourceScope::International)
    }
}
