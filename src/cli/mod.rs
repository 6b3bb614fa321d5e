use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::types::request::ContentRequest;

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "skrive.toml";

/// Skrive - 面向挪威市场的AI营销内容生成引擎
#[derive(Parser, Debug)]
#[command(name = "skrive")]
#[command(
    about = "Norwegian-first marketing content generation: research routing, multi-provider generation with fallback, cultural adaptation and quality-driven refinement."
)]
#[command(version)]
pub struct Args {
    /// 内容请求（JSON文件）
    #[arg(short, long, required_unless_present = "list_sources")]
    pub request: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 响应输出路径，未指定时输出到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 是否禁用缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 跳过研究收集
    #[arg(long)]
    pub no_research: bool,

    /// 最多重新生成的次数
    #[arg(long)]
    pub max_refinements: Option<usize>,

    /// 缓存目录
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// 检索服务 API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 列出研究源目录后退出
    #[arg(long)]
    pub list_sources: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 加载配置文件并应用命令行覆盖
    pub fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(path) => Config::from_file(path)?,
            None => {
                let default_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Config::from_file(&default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if self.no_cache {
            config.cache.enabled = false;
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache.cache_dir = cache_dir.clone();
        }
        if let Some(max_refinements) = self.max_refinements {
            config.quality.max_refinement_iterations = max_refinements;
        }
        if let Some(key) = &self.search_api_key {
            config.research.api_key = key.clone();
        }
        config.verbose = self.verbose;

        Ok(config)
    }

    /// 读取请求文件并应用命令行覆盖
    pub fn load_request(&self) -> Result<ContentRequest> {
        let path = self
            .request
            .as_ref()
            .context("A request file is required (--request)")?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {:?}", path))?;
        let mut request: ContentRequest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse request file: {:?}", path))?;

        if self.no_research {
            request.enable_research = false;
        }
        Ok(request)
    }
}

// Include tests
#[cfg(test)]
mod tests;
