//! Headless level runner: generates a level, reports its crossings, runs the
//! auto-resolve and prints a JSON summary.
//!
//! ```text
//! cargo run --bin untangle -- --nodes 8 --seed 3
//! RUST_LOG=untangle=debug cargo run --bin untangle -- --config level.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use untangle::config::LevelConfig;
use untangle::level::{Level, LevelEvent};
use untangle::math::Point2;
use untangle::operations::query::ScanResult;

#[derive(Parser)]
#[command(name = "untangle")]
#[command(about = "Generate a rope puzzle level and try to auto-resolve it")]
struct Cmd {
    /// JSON level config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of nodes in the cycle
    #[arg(long)]
    nodes: Option<usize>,

    /// Seed for node placement
    #[arg(long)]
    seed: Option<u64>,

    /// Auto-resolve iteration budget
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Keep auto-resolved nodes inside the movement bounds
    #[arg(long)]
    clamp: bool,
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for untangle.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("untangle=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cmd = Cmd::parse();
    let config = load_config(&cmd)?;

    let (mut level, initial) = Level::generate(&config).context("level setup failed")?;
    tracing::info!(
        nodes = level.topology().node_count(),
        crossing_pairs = initial.crossing_pairs,
        "initial scan"
    );
    let initial_positions = level.topology().positions();

    let resolved = if initial.has_crossings {
        Some(level.request_auto_resolve()?)
    } else {
        None
    };

    let mut events = Vec::new();
    while let Some(LevelEvent::Completed(completion)) = level.poll_event() {
        events.push(serde_json::json!({
            "completion": format!("{completion:?}"),
            "score": completion.score_award(),
        }));
    }

    let summary = serde_json::json!({
        "config": config,
        "initial": scan_json(&initial, &initial_positions),
        "resolved": resolved
            .as_ref()
            .map(|r| scan_json(r, &level.topology().positions())),
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_config(cmd: &Cmd) -> Result<LevelConfig> {
    let mut config = match &cmd.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            LevelConfig::from_json_str(&text)?
        }
        None => LevelConfig::default(),
    };
    if let Some(nodes) = cmd.nodes {
        config.node_count = nodes;
    }
    if cmd.seed.is_some() {
        config.seed = cmd.seed;
    }
    if let Some(max_iterations) = cmd.max_iterations {
        config.layout.max_iterations = max_iterations;
    }
    config.layout.clamp_to_bounds |= cmd.clamp;
    Ok(config)
}

fn scan_json(result: &ScanResult, positions: &[Point2]) -> serde_json::Value {
    serde_json::json!({
        "has_crossings": result.has_crossings,
        "crossing_pairs": result.crossing_pairs,
        "outcome": format!("{:?}", result.outcome),
        "positions": positions.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
    })
}
