use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use skrive_rs::cli::Args;
use skrive_rs::launch;
use skrive_rs::sources::SourceRegistry;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "skrive_rs=debug,info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = args.build_config()?;

    if args.list_sources {
        let registry = SourceRegistry::builtin().with_additional(&config.sources);
        println!("📚 {} research sources", registry.len());
        for source in registry.all() {
            println!(
                "  - {:<24} {:<28} trust {:>4.1}  {}",
                source.id,
                source.domain,
                source.trust_score,
                if source.is_local() { "local" } else { "international" }
            );
        }
        return Ok(());
    }

    let request = args.load_request()?;

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling generation");
            ctrl_c_token.cancel();
        }
    });

    let response = match launch(&config, request, cancel).await {
        Ok(response) => response,
        Err(err) => {
            eprintln!("❌ 生成失败 [{}]: {}", err.code(), err);
            return Err(err.into());
        }
    };

    let json = serde_json::to_string_pretty(&response).context("Failed to serialize response")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write response to {:?}", path))?;
            println!("💾 响应已写入 {:?}", path);
        }
        None => println!("{}", json),
    }

    let status = if response.flagged { "⚠️" } else { "✅" };
    eprintln!(
        "{} {} / {} | 总分 {:.1} ({:?}) | 改进 {} 轮 | 成本 ${:.4}{}",
        status,
        response.generation.provider,
        response.generation.model,
        response.quality.overall,
        response.quality.grade,
        response.refinement_iterations,
        response.total_cost,
        if response.generation.cache_hit { " | 缓存命中" } else { "" }
    );

    Ok(())
}
