use serde::{Deserialize, Serialize};

/// 输出语言类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputLanguage {
    #[serde(rename = "nb")]
    #[default]
    Bokmal,
    #[serde(rename = "nn")]
    Nynorsk,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "sv")]
    Swedish,
    #[serde(rename = "da")]
    Danish,
}

impl std::fmt::Display for OutputLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputLanguage::Bokmal => write!(f, "nb"),
            OutputLanguage::Nynorsk => write!(f, "nn"),
            OutputLanguage::English => write!(f, "en"),
            OutputLanguage::Swedish => write!(f, "sv"),
            OutputLanguage::Danish => write!(f, "da"),
        }
    }
}

impl std::str::FromStr for OutputLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nb" | "no" | "bokmål" | "bokmal" | "norwegian" | "norsk" => Ok(OutputLanguage::Bokmal),
            "nn" | "nynorsk" => Ok(OutputLanguage::Nynorsk),
            "en" | "english" | "engelsk" => Ok(OutputLanguage::English),
            "sv" | "swedish" | "svenska" | "svensk" => Ok(OutputLanguage::Swedish),
            "da" | "danish" | "dansk" => Ok(OutputLanguage::Danish),
            _ => Err(format!("Unknown output language: {}", s)),
        }
    }
}

impl OutputLanguage {
    /// 是否为本地市场语言（挪威语）
    pub fn is_local(&self) -> bool {
        matches!(self, OutputLanguage::Bokmal | OutputLanguage::Nynorsk)
    }

    /// 是否为斯堪的纳维亚语言，可读性评估使用LIX
    pub fn is_scandinavian(&self) -> bool {
        !matches!(self, OutputLanguage::English)
    }

    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputLanguage::Bokmal => "Norsk bokmål",
            OutputLanguage::Nynorsk => "Norsk nynorsk",
            OutputLanguage::English => "English",
            OutputLanguage::Swedish => "Svenska",
            OutputLanguage::Danish => "Dansk",
        }
    }

    /// 研究源的语言代码
    pub fn source_language_code(&self) -> &'static str {
        match self {
            OutputLanguage::Bokmal | OutputLanguage::Nynorsk => "no",
            OutputLanguage::English => "en",
            OutputLanguage::Swedish => "sv",
            OutputLanguage::Danish => "da",
        }
    }

    /// 获取语言的提示词指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            OutputLanguage::Bokmal => {
                "Skriv teksten på norsk bokmål. Bruk et klart, saklig og profesjonelt språk som passer for norsk næringsliv."
            }
            OutputLanguage::Nynorsk => {
                "Skriv teksten på nynorsk. Bruk eit klart, sakleg og profesjonelt språk som passar for norsk næringsliv."
            }
            OutputLanguage::English => {
                "Write the text in English, using clear, factual and professional language suited to a Norwegian business audience."
            }
            OutputLanguage::Swedish => {
                "Skriv texten på svenska med ett tydligt, sakligt och professionellt språk."
            }
            OutputLanguage::Danish => {
                "Skriv teksten på dansk med et klart, sagligt og professionelt sprog."
            }
        }
    }
}
