//! 文化适配使用的替换表
//!
//! 同一表内较长的短语必须排在较短短语之前。

use crate::i18n::OutputLanguage;

/// 短语替换对（原文, 替换）
pub type PhrasePairs = &'static [(&'static str, &'static str)];

/// 按语言区分的替换表，瑞典语与丹麦语不做语言相关替换
#[derive(Debug, Clone, Copy)]
pub struct LanguagePairs {
    pub norwegian: PhrasePairs,
    pub english: PhrasePairs,
}

impl LanguagePairs {
    pub fn for_language(&self, language: OutputLanguage) -> PhrasePairs {
        match language {
            OutputLanguage::Bokmal | OutputLanguage::Nynorsk => self.norwegian,
            OutputLanguage::English => self.english,
            OutputLanguage::Swedish | OutputLanguage::Danish => &[],
        }
    }

    /// 两种语言的全部条目
    pub fn all(&self) -> impl Iterator<Item = &'static (&'static str, &'static str)> {
        self.norwegian.iter().chain(self.english.iter())
    }
}

/// 行业术语表
#[derive(Debug, Clone, Copy)]
pub struct IndustryTerms {
    /// 行业名包含任一关键词即生效
    pub keys: &'static [&'static str],
    pub terms: LanguagePairs,
}

/// 按语言区分的单句
#[derive(Debug, Clone, Copy)]
pub struct LocalizedSentence {
    pub norwegian: &'static str,
    pub english: &'static str,
}

impl LocalizedSentence {
    pub fn for_language(&self, language: OutputLanguage) -> Option<&'static str> {
        match language {
            OutputLanguage::Bokmal | OutputLanguage::Nynorsk => Some(self.norwegian),
            OutputLanguage::English => Some(self.english),
            OutputLanguage::Swedish | OutputLanguage::Danish => None,
        }
    }
}

/// 文化适配的全部数据
#[derive(Debug, Clone, Copy)]
pub struct AdaptationTables {
    pub self_promotion: LanguagePairs,
    pub loanwords: PhrasePairs,
    pub casual_to_formal: LanguagePairs,
    pub formal_to_casual: LanguagePairs,
    pub executive: LanguagePairs,
    pub technical: LanguagePairs,
    pub first_person: LanguagePairs,
    pub collaborative_markers: &'static [&'static str],
    pub collaborative_sentence: LocalizedSentence,
    pub industries: &'static [IndustryTerms],
    pub technology_keys: &'static [&'static str],
    pub sustainability_markers: &'static [&'static str],
    pub sustainability_sentence: LocalizedSentence,
    pub context_sentence: LocalizedSentence,
    pub violation_markers: &'static [&'static str],
    pub inclusive_indicators: &'static [&'static str],
}

impl Default for AdaptationTables {
    fn default() -> Self {
        Self::norwegian()
    }
}

impl AdaptationTables {
    pub fn norwegian() -> Self {
        Self {
            self_promotion: LanguagePairs {
                norwegian: SELF_PROMOTION_NO,
                english: SELF_PROMOTION_EN,
            },
            loanwords: LOANWORDS,
            casual_to_formal: LanguagePairs {
                norwegian: CASUAL_TO_FORMAL_NO,
                english: CASUAL_TO_FORMAL_EN,
            },
            formal_to_casual: LanguagePairs {
                norwegian: FORMAL_TO_CASUAL_NO,
                english: FORMAL_TO_CASUAL_EN,
            },
            executive: LanguagePairs {
                norwegian: EXECUTIVE_NO,
                english: EXECUTIVE_EN,
            },
            technical: LanguagePairs {
                norwegian: TECHNICAL_NO,
                english: TECHNICAL_EN,
            },
            first_person: LanguagePairs {
                norwegian: FIRST_PERSON_NO,
                english: FIRST_PERSON_EN,
            },
            collaborative_markers: COLLABORATIVE_MARKERS,
            collaborative_sentence: LocalizedSentence {
                norwegian: "Vi oppnår mest når vi jobber sammen med kunder og samarbeidspartnere.",
                english: "We achieve the most when we work together with customers and partners.",
            },
            industries: INDUSTRIES,
            technology_keys: &["teknologi", "technology", "tech", "programvare", "software"],
            sustainability_markers: &[
                "bærekraft", "klima", "miljø", "utslipp", "sustainab", "climate", "environment",
            ],
            sustainability_sentence: LocalizedSentence {
                norwegian: "Løsningene utvikles med vekt på bærekraft og ansvarlig ressursbruk.",
                english: "The solutions are developed with an emphasis on sustainability and responsible use of resources.",
            },
            context_sentence: LocalizedSentence {
                norwegian: "Dette er aktuelt for mange norske virksomheter.",
                english: "This is relevant for many businesses today.",
            },
            violation_markers: VIOLATION_MARKERS,
            inclusive_indicators: INCLUSIVE_INDICATORS,
        }
    }
}

static SELF_PROMOTION_NO: PhrasePairs = &[
    ("vi er best på", "vi har solid erfaring med"),
    ("vi er best", "vi jobber hardt for å levere gode resultater"),
    ("vi er ledende på", "vi har lang erfaring med"),
    ("vi er ledende", "vi er en erfaren aktør"),
    ("verdens beste", "blant de beste"),
    ("best i klassen", "blant de fremste"),
    ("markedsledende", "veletablert"),
    ("bransjeledende", "veletablert"),
    ("uslåelig", "konkurransedyktig"),
    ("revolusjonerende", "nyskapende"),
    ("enestående", "solid"),
    ("helt unik", "særegen"),
    ("fantastisk", "god"),
];

static SELF_PROMOTION_EN: PhrasePairs = &[
    ("we are the best at", "we have solid experience in"),
    ("we are the best", "we work hard to deliver good results"),
    ("the best in the industry", "among the experienced players in the industry"),
    ("world-class", "well-regarded"),
    ("world class", "well-regarded"),
    ("industry-leading", "well-established"),
    ("market-leading", "well-established"),
    ("number one", "a recognised player"),
    ("unbeatable", "competitive"),
    ("unmatched", "solid"),
    ("revolutionary", "innovative"),
];

static LOANWORDS: PhrasePairs = &[
    ("brand awareness", "merkevarekjennskap"),
    ("customer journey", "kundereise"),
    ("business case", "forretningsgrunnlag"),
    ("growth hacking", "vekststrategi"),
    ("stakeholders", "interessenter"),
    ("deadline", "frist"),
    ("meeting", "møte"),
    ("feedback", "tilbakemelding"),
    ("performance", "ytelse"),
    ("workshop", "arbeidsmøte"),
    ("insights", "innsikt"),
    ("skills", "ferdigheter"),
    ("onboarding", "opplæring"),
    ("leads", "potensielle kunder"),
];

static CASUAL_TO_FORMAL_NO: PhrasePairs = &[
    ("sjekk ut", "se nærmere på"),
    ("superbra", "svært bra"),
    ("kjempebra", "svært bra"),
    ("digg", "god"),
    ("kult", "spennende"),
    ("fett", "bra"),
    ("funker", "fungerer"),
];

static CASUAL_TO_FORMAL_EN: PhrasePairs = &[
    ("check out", "take a look at"),
    ("awesome", "excellent"),
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("stuff", "material"),
    ("guys", "everyone"),
    ("cool", "interesting"),
];

static FORMAL_TO_CASUAL_NO: PhrasePairs = &[
    ("i henhold til", "i tråd med"),
    ("vennligst", "gjerne"),
    ("herved", "nå"),
    ("således", "dermed"),
    ("hvorvidt", "om"),
];

static FORMAL_TO_CASUAL_EN: PhrasePairs = &[
    ("pursuant to", "under"),
    ("henceforth", "from now on"),
    ("hereby", "now"),
    ("kindly", "please"),
    ("whereas", "while"),
];

static EXECUTIVE_NO: PhrasePairs = &[
    ("vi tror at", "vi vurderer at"),
    ("i bunn og grunn", ""),
    ("egentlig", ""),
    ("på en måte", ""),
];

static EXECUTIVE_EN: PhrasePairs = &[
    ("we think that", "we assess that"),
    ("at the end of the day", ""),
    ("basically", ""),
    ("kind of", ""),
];

static TECHNICAL_NO: PhrasePairs = &[
    ("ganske", "relativt"),
    ("litt", "noe"),
    ("masse", "en betydelig mengde"),
];

static TECHNICAL_EN: PhrasePairs = &[
    ("pretty much", "largely"),
    ("a bit", "somewhat"),
    ("a lot of", "many"),
];

static FIRST_PERSON_NO: PhrasePairs = &[
    ("jeg mener", "vi mener"),
    ("jeg tror", "vi tror"),
    ("jeg har", "vi har"),
    ("jeg vil", "vi vil"),
    ("min bedrift", "vår bedrift"),
    ("mitt team", "vårt team"),
];

static FIRST_PERSON_EN: PhrasePairs = &[
    ("i believe", "we believe"),
    ("i think", "we think"),
    ("i have", "we have"),
    ("my company", "our company"),
    ("my team", "our team"),
];

static COLLABORATIVE_MARKERS: &[&str] = &[
    "sammen",
    "samarbeid",
    "fellesskap",
    "together",
    "collaborat",
    "partnership",
];

static INDUSTRIES: &[IndustryTerms] = &[
    IndustryTerms {
        keys: &["finans", "finance", "bank", "forsikring", "insurance"],
        terms: LanguagePairs {
            norwegian: &[("risikofri", "med lav risiko"), ("billig", "kostnadseffektiv")],
            english: &[("risk-free", "low-risk"), ("cheap", "cost-effective")],
        },
    },
    IndustryTerms {
        keys: &["helse", "health", "medisin", "medical"],
        terms: LanguagePairs {
            norwegian: &[("garantert effekt", "dokumentert effekt"), ("kurerer", "kan bidra til å behandle")],
            english: &[("guaranteed results", "documented results"), ("cures", "may help treat")],
        },
    },
    IndustryTerms {
        keys: &["energi", "energy", "kraft", "power"],
        terms: LanguagePairs {
            norwegian: &[("grønn energi", "fornybar energi"), ("ren energi", "fornybar energi")],
            english: &[("clean energy", "renewable energy"), ("green energy", "renewable energy")],
        },
    },
    IndustryTerms {
        keys: &["sjømat", "seafood", "havbruk", "aquaculture", "fiske"],
        terms: LanguagePairs {
            norwegian: &[("fiskeoppdrett", "havbruk")],
            english: &[("fish farming", "aquaculture")],
        },
    },
    IndustryTerms {
        keys: &["teknologi", "technology", "tech", "programvare", "software"],
        terms: LanguagePairs {
            norwegian: &[("AI", "KI"), ("cloud", "sky")],
            english: &[],
        },
    },
];

static VIOLATION_MARKERS: &[&str] = &[
    "garantert",
    "guaranteed",
    "ingen andre",
    "no one else",
    "aldri før",
    "never before",
    "!!",
];

static INCLUSIVE_INDICATORS: &[&str] = &[
    "sammen",
    "samarbeid",
    "fellesskap",
    "inkluderende",
    "together",
    "collaborat",
    "partnership",
    "inclusive",
];
