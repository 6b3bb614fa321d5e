use serde::{Deserialize, Serialize};

/// 研究源类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    Government,
    Statistics,
    Professional,
    Industry,
    News,
    Business,
    Academic,
    Consulting,
}

impl SourceCategory {
    /// 补充源优先填补的类别
    pub fn is_preferred_secondary(&self) -> bool {
        matches!(
            self,
            SourceCategory::Government | SourceCategory::Professional | SourceCategory::Industry
        )
    }
}

/// 研究源等级，premium源会产生额外成本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    Premium,
    Standard,
    Free,
}

/// 研究源覆盖范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceScope {
    Local,
    International,
}

/// 更新频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateFrequency {
    Realtime,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

/// 研究源描述，启动时加载，运行期只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: String,
    pub domain: String,
    pub name: String,
    pub category: SourceCategory,
    pub tier: SourceTier,
    pub scope: SourceScope,
    /// 可信度（0-10）
    pub trust_score: f64,
    /// 商业相关度（0-10）
    pub business_relevance: f64,
    /// 文化真实度（0-1）
    pub cultural_authenticity: f64,
    pub specializations: Vec<String>,
    /// 语言代码，例如 "no"、"en"
    pub language: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default = "default_true")]
    pub scraping_allowed: bool,
    pub update_frequency: UpdateFrequency,
}

fn default_true() -> bool {
    true
}

impl SourceDescriptor {
    pub fn is_premium(&self) -> bool {
        self.tier == SourceTier::Premium
    }

    pub fn is_local(&self) -> bool {
        self.scope == SourceScope::Local
    }

    pub fn has_specialization(&self, specialization: &str) -> bool {
        self.specializations
            .iter()
            .any(|s| s.eq_ignore_ascii_case(specialization))
    }
}
