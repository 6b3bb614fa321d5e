//! 生成提示词构建

use crate::types::request::{Audience, ContentRequest, Formality};
use crate::types::research::ResearchSynthesis;
use crate::utils::text::truncate_chars;

/// 研究简报中最多列出的条目
const BRIEF_ITEM_LIMIT: usize = 5;

/// 研究简报中最多列出的洞察
const BRIEF_INSIGHT_LIMIT: usize = 5;

/// 每个条目摘要的最大字符数
const BRIEF_SNIPPET_CHARS: usize = 280;

/// 一次生成使用的系统提示词与用户提示词
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// 构建系统提示词：语言指令 + 文化准则 + 受众与正式程度
pub fn build_system_prompt(request: &ContentRequest) -> String {
    let mut prompt = String::from(
        "You are an experienced copywriter for Nordic businesses. You write accurate, \
         well-structured marketing and business texts.\n\n",
    );
    prompt.push_str(request.output_language.prompt_instruction());
    prompt.push_str("\n\n## Cultural guidelines\n");
    prompt.push_str(
        "- Avoid boastful claims and absolute superlatives; let facts and results speak.\n\
         - Prefer collective framing (\"we\") and emphasise collaboration with customers and partners.\n\
         - Keep the tone trustworthy, direct and free of exaggeration.\n",
    );
    if request.output_language.is_local() || request.market().is_local() {
        prompt.push_str(
            "- Use Norwegian business terminology instead of English loanwords where a good term exists.\n",
        );
    }
    if let Some(industry) = request.industry() {
        prompt.push_str(&format!(
            "- Use terminology appropriate for the {} industry.\n",
            industry
        ));
    }

    prompt.push_str(&format!("\n## Audience\n{}\n", audience_guidance(request.audience)));
    prompt.push_str(&format!(
        "\n## Formality\n{}\n",
        formality_guidance(request.formality())
    ));
    prompt
}

fn audience_guidance(audience: Audience) -> &'static str {
    match audience {
        Audience::General => "A broad audience: explain concepts plainly.",
        Audience::Executive => "Executives: be concise and strategic, lead with business impact.",
        Audience::Technical => "Technical readers: be precise and concrete, avoid vague wording.",
        Audience::Consumer => "Consumers: be friendly and clear, focus on everyday benefits.",
        Audience::Professional => "Professionals: be informed and practical.",
    }
}

fn formality_guidance(formality: Formality) -> &'static str {
    match formality {
        Formality::Formal => "Formal register, no slang or casual expressions.",
        Formality::Neutral => "Neutral, professional register.",
        Formality::Casual => "Relaxed and conversational, but still professional.",
    }
}

/// 将研究综合结果整理为提示词中的简报，无结果时返回None
pub fn research_brief(synthesis: &ResearchSynthesis) -> Option<String> {
    if synthesis.is_empty() {
        return None;
    }

    let mut brief = format!(
        "### Research brief (confidence {:.2})\n",
        synthesis.confidence
    );
    for (i, item) in synthesis.items.iter().take(BRIEF_ITEM_LIMIT).enumerate() {
        brief.push_str(&format!(
            "{}. {} ({})\n   {}\n",
            i + 1,
            item.title,
            item.url,
            truncate_chars(&item.snippet, BRIEF_SNIPPET_CHARS)
        ));
    }

    if let Some(analysis) = &synthesis.analysis {
        if !analysis.insights.is_empty() {
            brief.push_str("\nKey insights:\n");
            for insight in analysis.insights.iter().take(BRIEF_INSIGHT_LIMIT) {
                brief.push_str(&format!("- {}\n", insight.text));
            }
        }
        if !analysis.metrics.is_empty() {
            brief.push_str("\nFigures:\n");
            for metric in &analysis.metrics {
                brief.push_str(&format!("- {} ({})\n", metric.value, metric.context));
            }
        }
    }
    Some(brief)
}

/// 构建用户提示词，改进轮次会附带待改进项
pub fn build_user_prompt(
    request: &ContentRequest,
    brief: Option<&str>,
    improvements: &[String],
) -> String {
    let mut prompt = format!(
        "Write a {} about: {}\n\nTarget length: about {} words.\n",
        request.content_type.as_str().replace('_', " "),
        request.topic,
        request.effective_length()
    );

    if let Some(format) = request.format.as_deref() {
        prompt.push_str(&format!("Format: {}\n", format));
    }
    if !request.keywords.is_empty() {
        prompt.push_str(&format!("Keywords to include: {}\n", request.keywords.join(", ")));
    }
    if let Some(seo) = &request.seo
        && let Some(primary) = request.seo_primary_keyword()
    {
        prompt.push_str(&format!("Primary SEO keyword: {}\n", primary));
        if !seo.secondary_keywords.is_empty() {
            prompt.push_str(&format!(
                "Secondary SEO keywords: {}\n",
                seo.secondary_keywords.join(", ")
            ));
        }
    }
    if request.content_type.expects_call_to_action() {
        prompt.push_str("End with a clear, modest call to action.\n");
    }

    if let Some(brief) = brief {
        prompt.push('\n');
        prompt.push_str(brief);
        prompt.push_str("Use only facts supported by the research brief.\n");
    }

    if !improvements.is_empty() {
        prompt.push_str("\n### Improve the previous draft\n");
        for (i, item) in improvements.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, item));
        }
    }

    prompt.push_str("\nReturn only the finished text, without headings about the task.");
    prompt
}

pub fn build_prompt(
    request: &ContentRequest,
    brief: Option<&str>,
    improvements: &[String],
) -> GenerationPrompt {
    GenerationPrompt {
        system_prompt: build_system_prompt(request),
        user_prompt: build_user_prompt(request, brief, improvements),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::OutputLanguage;
    use crate::types::request::{CulturalContext, Market, SeoHints};
    use crate::types::research::{ItemMetadata, ResearchItem};

    #[test]
    fn test_system_prompt_carries_language_and_culture() {
        let mut request = ContentRequest::new("acme", "Havvind i Nordsjøen");
        request.output_language = OutputLanguage::Bokmal;
        request.cultural_context = Some(CulturalContext {
            market: Market::Norway,
            industry: Some("energi".to_string()),
            formality: Formality::Formal,
            ..CulturalContext::default()
        });

        let prompt = build_system_prompt(&request);
        assert!(prompt.contains("norsk bokmål"));
        assert!(prompt.contains("loanwords"));
        assert!(prompt.contains("energi industry"));
        assert!(prompt.contains("Formal register"));
    }

    #[test]
    fn test_user_prompt_includes_seo_brief_and_improvements() {
        let mut request = ContentRequest::new("acme", "Havvind i Nordsjøen");
        request.keywords = vec!["havvind".to_string(), "eksport".to_string()];
        request.seo = Some(SeoHints {
            primary_keyword: Some("havvind norge".to_string()),
            secondary_keywords: vec!["fornybar".to_string()],
        });

        let prompt = build_user_prompt(
            &request,
            Some("### Research brief\n1. Kilde\n"),
            &["Add concrete figures".to_string()],
        );
        assert!(prompt.contains("Havvind i Nordsjøen"));
        assert!(prompt.contains("havvind, eksport"));
        assert!(prompt.contains("Primary SEO keyword: havvind norge"));
        assert!(prompt.contains("Secondary SEO keywords: fornybar"));
        assert!(prompt.contains("### Research brief"));
        assert!(prompt.contains("1. Add concrete figures"));
    }

    #[test]
    fn test_empty_research_has_no_brief() {
        assert!(research_brief(&ResearchSynthesis::default()).is_none());

        let synthesis = ResearchSynthesis {
            items: vec![ResearchItem {
                source_id: "ssb".to_string(),
                url: "https://ssb.no/energi".to_string(),
                title: "Energibalansen".to_string(),
                snippet: "Produksjonen av vindkraft økte i fjor.".to_string(),
                relevance: 0.8,
                credibility: 0.95,
                metadata: ItemMetadata::default(),
            }],
            confidence: 0.8,
            ..ResearchSynthesis::default()
        };
        let brief = research_brief(&synthesis).unwrap();
        assert!(brief.contains("Energibalansen"));
        assert!(brief.contains("https://ssb.no/energi"));
    }
}
