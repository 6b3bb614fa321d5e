use serde::{Deserialize, Serialize};

use crate::error::{FieldIssue, ValidationError};
use crate::i18n::OutputLanguage;

/// 目标市场
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    /// 挪威本地市场
    #[default]
    Norway,
    /// 北欧区域市场
    Nordic,
    International,
}

impl Market {
    pub fn is_local(&self) -> bool {
        matches!(self, Market::Norway)
    }

    pub fn is_regional(&self) -> bool {
        matches!(self, Market::Nordic)
    }
}

/// 语气正式程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Formal,
    #[default]
    Neutral,
    Casual,
}

/// 受众类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    General,
    Executive,
    Technical,
    Consumer,
    Professional,
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Audience::General => "general",
            Audience::Executive => "executive",
            Audience::Technical => "technical",
            Audience::Consumer => "consumer",
            Audience::Professional => "professional",
        };
        write!(f, "{}", name)
    }
}

/// 内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    SocialPost,
    Ad,
    Email,
    Newsletter,
    PressRelease,
    ProductDescription,
    #[default]
    Article,
    BlogPost,
    CaseStudy,
    Whitepaper,
}

impl ContentType {
    /// 长文本类型
    pub fn is_long_form(&self) -> bool {
        matches!(
            self,
            ContentType::Article
                | ContentType::BlogPost
                | ContentType::CaseStudy
                | ContentType::Whitepaper
        )
    }

    /// 短文本或时效性强的类型
    pub fn is_short_form(&self) -> bool {
        matches!(self, ContentType::SocialPost | ContentType::Ad)
    }

    /// 时效性内容，缓存时间较短
    pub fn is_time_sensitive(&self) -> bool {
        matches!(
            self,
            ContentType::SocialPost | ContentType::Ad | ContentType::PressRelease
        )
    }

    /// 需要行动号召的类型
    pub fn expects_call_to_action(&self) -> bool {
        matches!(
            self,
            ContentType::SocialPost
                | ContentType::Ad
                | ContentType::Email
                | ContentType::Newsletter
                | ContentType::ProductDescription
        )
    }

    /// 未指定长度时的默认目标字数
    pub fn default_length(&self) -> usize {
        match self {
            ContentType::SocialPost => 80,
            ContentType::Ad => 60,
            ContentType::Email => 200,
            ContentType::Newsletter => 400,
            ContentType::PressRelease => 400,
            ContentType::ProductDescription => 150,
            ContentType::Article => 800,
            ContentType::BlogPost => 700,
            ContentType::CaseStudy => 1200,
            ContentType::Whitepaper => 2500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::SocialPost => "social_post",
            ContentType::Ad => "ad",
            ContentType::Email => "email",
            ContentType::Newsletter => "newsletter",
            ContentType::PressRelease => "press_release",
            ContentType::ProductDescription => "product_description",
            ContentType::Article => "article",
            ContentType::BlogPost => "blog_post",
            ContentType::CaseStudy => "case_study",
            ContentType::Whitepaper => "whitepaper",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 文化上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CulturalContext {
    #[serde(default)]
    pub market: Market,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub formality: Formality,
}

/// SEO提示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SeoHints {
    pub primary_keyword: Option<String>,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
}

/// 质量要求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRequirements {
    /// 最低总分（0-100）
    pub min_overall_score: f64,
    /// 是否严格模式，严格模式会进入缓存键
    #[serde(default)]
    pub strict: bool,
}

impl Default for QualityRequirements {
    fn default() -> Self {
        Self {
            min_overall_score: 80.0,
            strict: false,
        }
    }
}

/// 调用方指定的模型偏好
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPreference {
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// 内容生成请求，提交后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    /// 调用方标识，用于成本台账
    pub caller_id: String,
    pub topic: String,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub output_language: OutputLanguage,
    #[serde(default)]
    pub cultural_context: Option<CulturalContext>,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub seo: Option<SeoHints>,
    /// 目标字数
    #[serde(default)]
    pub target_length: Option<usize>,
    /// 输出格式说明，例如 "markdown"
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub quality: QualityRequirements,
    #[serde(default = "default_true")]
    pub enable_research: bool,
    #[serde(default)]
    pub preferred_provider: Option<ProviderPreference>,
}

fn default_true() -> bool {
    true
}

impl ContentRequest {
    /// 以默认值创建请求
    pub fn new(caller_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            topic: topic.into(),
            audience: Audience::default(),
            output_language: OutputLanguage::default(),
            cultural_context: None,
            content_type: ContentType::default(),
            keywords: Vec::new(),
            seo: None,
            target_length: None,
            format: None,
            quality: QualityRequirements::default(),
            enable_research: true,
            preferred_provider: None,
        }
    }

    pub fn market(&self) -> Market {
        self.cultural_context
            .as_ref()
            .map(|c| c.market)
            .unwrap_or_default()
    }

    pub fn formality(&self) -> Formality {
        self.cultural_context
            .as_ref()
            .map(|c| c.formality)
            .unwrap_or_default()
    }

    pub fn industry(&self) -> Option<&str> {
        self.cultural_context
            .as_ref()
            .and_then(|c| c.industry.as_deref())
    }

    pub fn business_type(&self) -> Option<&str> {
        self.cultural_context
            .as_ref()
            .and_then(|c| c.business_type.as_deref())
    }

    pub fn effective_length(&self) -> usize {
        self.target_length
            .unwrap_or_else(|| self.content_type.default_length())
    }

    pub fn seo_primary_keyword(&self) -> Option<&str> {
        self.seo
            .as_ref()
            .and_then(|s| s.primary_keyword.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    /// 校验请求，收集所有字段问题
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        let topic_len = self.topic.trim().chars().count();
        if topic_len == 0 {
            issues.push(FieldIssue::new("topic", "must not be empty"));
        } else if topic_len < 3 {
            issues.push(FieldIssue::new("topic", "must be at least 3 characters"));
        } else if topic_len > 500 {
            issues.push(FieldIssue::new("topic", "must be at most 500 characters"));
        }

        if self.caller_id.trim().is_empty() {
            issues.push(FieldIssue::new("caller_id", "must not be empty"));
        }

        if let Some(length) = self.target_length
            && !(50..=10_000).contains(&length)
        {
            issues.push(FieldIssue::new(
                "target_length",
                "must be between 50 and 10000 words",
            ));
        }

        let threshold = self.quality.min_overall_score;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            issues.push(FieldIssue::new(
                "quality.min_overall_score",
                "must be between 0 and 100",
            ));
        }

        if self.keywords.len() > 20 {
            issues.push(FieldIssue::new("keywords", "at most 20 keywords are allowed"));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            issues.push(FieldIssue::new("keywords", "keywords must not be blank"));
        }

        if let Some(pref) = &self.preferred_provider
            && pref.provider.trim().is_empty()
        {
            issues.push(FieldIssue::new(
                "preferred_provider.provider",
                "must not be empty",
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_valid() {
        let request = ContentRequest::new("acme", "Bærekraft i norsk havbruk");
        assert!(request.validate().is_ok());
        assert_eq!(request.market(), Market::Norway);
        assert_eq!(request.effective_length(), 800);
    }

    #[test]
    fn test_validation_collects_all_issues() {
        let mut request = ContentRequest::new("", "");
        request.target_length = Some(20);
        request.quality.min_overall_score = 140.0;

        let err = request.validate().unwrap_err();
        let fields: Vec<_> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"topic"));
        assert!(fields.contains(&"caller_id"));
        assert!(fields.contains(&"target_length"));
        assert!(fields.contains(&"quality.min_overall_score"));
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let json = r#"{"caller_id": "acme", "topic": "Digitalisering i offentlig sektor"}"#;
        let request: ContentRequest = serde_json::from_str(json).unwrap();
        assert!(request.enable_research);
        assert_eq!(request.output_language, OutputLanguage::Bokmal);
        assert_eq!(request.content_type, ContentType::Article);
        assert_eq!(request.quality.min_overall_score, 80.0);
    }

    #[test]
    fn test_content_type_families() {
        assert!(ContentType::Whitepaper.is_long_form());
        assert!(ContentType::SocialPost.is_short_form());
        assert!(ContentType::PressRelease.is_time_sensitive());
        assert!(!ContentType::Article.is_time_sensitive());
    }
}
