//! Tavily兼容的检索与抓取客户端

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ResearchProvider, ScrapedPage, SearchHit};
use crate::config::ResearchConfig;
use crate::error::ResearchError;
use crate::types::routing::{SearchDepth, SearchFilters};

pub struct TavilyResearchProvider {
    api_base_url: String,
    api_key: String,
    timeout_seconds: u64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: SearchDepth,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExtractBody<'a> {
    api_key: &'a str,
    urls: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    results: Vec<ExtractResult>,
}

#[derive(Debug, Deserialize)]
struct ExtractResult {
    #[serde(default)]
    raw_content: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

impl TavilyResearchProvider {
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create research HTTP client")?;

        Ok(Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout_seconds: config.timeout_seconds,
            client,
        })
    }

    fn search_body<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
        depth: SearchDepth,
        filters: Option<&SearchFilters>,
    ) -> SearchBody<'a> {
        SearchBody {
            api_key: &self.api_key,
            query,
            max_results: limit,
            search_depth: depth,
            include_domains: filters.map(|f| f.include_domains.clone()).unwrap_or_default(),
            days: filters.and_then(|f| f.max_age_days),
        }
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ResearchError> {
        let url = format!("{}/{}", self.api_base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Http {
                status: status.as_u16(),
            });
        }

        response.json::<R>().await.map_err(|e| ResearchError::Parse {
            message: e.to_string(),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ResearchError {
        if err.is_timeout() {
            ResearchError::Timeout {
                timeout_secs: self.timeout_seconds,
            }
        } else {
            ResearchError::Transport {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl ResearchProvider for TavilyResearchProvider {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        depth: SearchDepth,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<SearchHit>, ResearchError> {
        let body = self.search_body(query, limit, depth, filters);

        let response: SearchResponse = self.post("search", &body).await?;
        Ok(response
            .results
            .into_iter()
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                content: r.content,
                score: r.score,
                author: r.author,
                published_date: r.published_date,
                classification: Some(String::from("article")),
            })
            .collect())
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ResearchError> {
        let body = ExtractBody {
            api_key: &self.api_key,
            urls: vec![url],
        };

        let response: ExtractResponse = self.post("extract", &body).await?;
        let page = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ResearchError::Parse {
                message: format!("no extract result for {}", url),
            })?;

        Ok(ScrapedPage {
            title: page.title.unwrap_or_default(),
            content: page.raw_content,
            author: page.author,
            date: page.published_date,
        })
    }
}
