use serde::{Deserialize, Serialize};

/// 适配变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    SelfPromotion,
    Terminology,
    Tone,
    Consensus,
    Industry,
    Structure,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::SelfPromotion => "self-promotion",
            ChangeType::Terminology => "terminology",
            ChangeType::Tone => "tone",
            ChangeType::Consensus => "consensus",
            ChangeType::Industry => "industry",
            ChangeType::Structure => "structure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// 单条适配变更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationChange {
    pub change_type: ChangeType,
    pub original: String,
    pub adapted: String,
    pub reason: String,
    pub impact: Impact,
}

/// 语气评估
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneAssessment {
    Appropriate,
    TooFormal,
    TooCasual,
}

/// 合规子评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScores {
    /// 谦逊文化合规度（0-100）
    pub jante_compliance: f64,
    /// 商务得体度（0-100）
    pub business_appropriateness: f64,
    pub tone: ToneAssessment,
    /// 仍未解决的违规
    pub violations: Vec<String>,
    /// 命中的包容性表达
    pub inclusive_indicators: Vec<String>,
}

/// 文化适配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalAdaptationResult {
    pub adapted_text: String,
    pub changes: Vec<AdaptationChange>,
    pub compliance: ComplianceScores,
    /// 综合文化评分（0-100）
    pub cultural_score: f64,
    pub recommendations: Vec<String>,
}
