use crate::cli::{Commands, OutputFormat};
use crate::config::ScoringConfig;
use crate::fleet::{generate_fleet, FleetSpec};
use crate::metrics::ScoringMetrics;
use crate::scoring::{ClampPolicy, PodScorer};
use crate::ScoredPod;
use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

pub async fn handle_command(command: Commands, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Rank {
            input,
            format,
            clamp,
            decode_path,
            metrics,
        } => {
            let config = load_config(config_path.as_deref())?;
            handle_rank(config, input, format, clamp, decode_path, metrics).await
        }
        Commands::Generate {
            pods,
            adapters,
            max_queue,
        } => handle_generate(pods, adapters, max_queue),
    }
}

/// Config file (or defaults), then `PODSCORE_*` environment overrides
pub fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    let mut config = match path {
        Some(p) => ScoringConfig::from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display()))?,
        None => ScoringConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;
    config.validate()?;
    debug!("Scoring config: {:?}", config);
    Ok(config)
}

async fn handle_rank(
    config: ScoringConfig,
    input: Option<PathBuf>,
    format: OutputFormat,
    clamp: Option<ClampPolicy>,
    decode_path: bool,
    emit_metrics: bool,
) -> Result<()> {
    let config = with_clamp_override(config, clamp, decode_path);

    let raw = read_input(input.as_deref()).await?;
    info!("Read {} bytes of pod metrics", raw.len());

    let metrics = Arc::new(ScoringMetrics::new()?);
    let start = Instant::now();
    let result = rank_payload(config, &raw, decode_path, metrics.clone());

    // Failed runs still report their error counters
    if emit_metrics {
        eprint!("{}", metrics.encode()?);
    }

    let ranked = result?;
    info!("Ranked {} pods in {:?}", ranked.len(), start.elapsed());

    match format {
        OutputFormat::Table => print_table(&ranked),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
    }

    Ok(())
}

/// `--clamp` targets the policy of whichever path the run goes through
fn with_clamp_override(
    mut config: ScoringConfig,
    clamp: Option<ClampPolicy>,
    decode_path: bool,
) -> ScoringConfig {
    if let Some(policy) = clamp {
        if decode_path {
            config.decode_clamp = policy;
        } else {
            config.clamp = policy;
        }
    }
    config
}

fn rank_payload(
    config: ScoringConfig,
    raw: &[u8],
    decode_path: bool,
    metrics: Arc<ScoringMetrics>,
) -> crate::Result<Vec<ScoredPod>> {
    let scorer = PodScorer::with_config(config)?.with_metrics(metrics);
    if decode_path {
        scorer.decode_and_select_pod(raw)
    } else {
        scorer.select_pod_from_json(raw)
    }
}

fn handle_generate(pods: usize, adapters: usize, max_queue: u64) -> Result<()> {
    info!("Generating {} pods with {} adapters each", pods, adapters);
    println!("{}", fleet_json(pods, adapters, max_queue)?);
    Ok(())
}

fn fleet_json(pods: usize, adapters: usize, max_queue: u64) -> Result<String> {
    let fleet = generate_fleet(&FleetSpec {
        pods,
        adapters_per_pod: adapters,
        max_queue,
    });
    Ok(serde_json::to_string_pretty(&fleet)?)
}

async fn read_input(input: Option<&Path>) -> Result<Bytes> {
    match input {
        Some(path) if path != Path::new("-") => tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("Failed to read stdin")?;
            Ok(Bytes::from(buf))
        }
    }
}

fn print_table(ranked: &[ScoredPod]) {
    println!("{:>5} {:<32} {:>12}", "RANK", "POD", "SCORE");
    println!("{}", "-".repeat(51));
    for (rank, pod) in ranked.iter().enumerate() {
        println!(
            "{:>5} {:<32} {:>12}",
            rank + 1,
            truncate(&pod.pod_name, 32),
            pod.score
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
