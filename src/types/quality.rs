use serde::{Deserialize, Serialize};

/// 评分维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Linguistic,
    Cultural,
    Business,
    Technical,
    Engagement,
}

impl QualityDimension {
    pub fn weight(&self) -> f64 {
        match self {
            QualityDimension::Linguistic => 0.25,
            QualityDimension::Cultural => 0.25,
            QualityDimension::Business => 0.20,
            QualityDimension::Technical => 0.15,
            QualityDimension::Engagement => 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

/// 发布就绪程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    Ready,
    NeedsReview,
    NeedsRevision,
    Rejected,
}

impl ReadinessLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            ReadinessLevel::Ready
        } else if score >= 70.0 {
            ReadinessLevel::NeedsReview
        } else if score >= 50.0 {
            ReadinessLevel::NeedsRevision
        } else {
            ReadinessLevel::Rejected
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// 待改进项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub dimension: QualityDimension,
    pub priority: Priority,
    pub description: String,
    pub suggestion: String,
}

/// 五个维度的评分（0-100）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub linguistic: f64,
    pub cultural: f64,
    pub business: f64,
    pub technical: f64,
    pub engagement: f64,
}

impl DimensionScores {
    pub fn get(&self, dimension: QualityDimension) -> f64 {
        match dimension {
            QualityDimension::Linguistic => self.linguistic,
            QualityDimension::Cultural => self.cultural,
            QualityDimension::Business => self.business,
            QualityDimension::Technical => self.technical,
            QualityDimension::Engagement => self.engagement,
        }
    }

    /// 加权总分
    pub fn weighted_overall(&self) -> f64 {
        [
            QualityDimension::Linguistic,
            QualityDimension::Cultural,
            QualityDimension::Business,
            QualityDimension::Technical,
            QualityDimension::Engagement,
        ]
        .iter()
        .map(|d| self.get(*d) * d.weight())
        .sum()
    }
}

/// 质量评估，每轮改进都会重新计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub scores: DimensionScores,
    pub overall: f64,
    pub grade: Grade,
    pub readiness: ReadinessLevel,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<Weakness>,
    pub recommendations: Vec<String>,
}

impl QualityAssessment {
    /// 按优先级排序后取前N个待改进项
    pub fn top_weaknesses(&self, limit: usize) -> Vec<&Weakness> {
        let mut sorted: Vec<&Weakness> = self.weaknesses.iter().collect();
        sorted.sort_by_key(|w| w.priority);
        sorted.into_iter().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.9), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.9), Grade::F);
    }

    #[test]
    fn test_readiness_boundaries() {
        assert_eq!(ReadinessLevel::from_score(85.0), ReadinessLevel::Ready);
        assert_eq!(ReadinessLevel::from_score(84.9), ReadinessLevel::NeedsReview);
        assert_eq!(ReadinessLevel::from_score(50.0), ReadinessLevel::NeedsRevision);
        assert_eq!(ReadinessLevel::from_score(49.9), ReadinessLevel::Rejected);
    }

    #[test]
    fn test_weighted_overall_uses_fixed_weights() {
        let scores = DimensionScores {
            linguistic: 100.0,
            cultural: 80.0,
            business: 60.0,
            technical: 40.0,
            engagement: 20.0,
        };
        let expected = 25.0 + 20.0 + 12.0 + 6.0 + 3.0;
        assert!((scores.weighted_overall() - expected).abs() < 1e-9);
    }
}
