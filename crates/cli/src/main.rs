use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use receipt_core::config::Settings;
use receipt_core::domain::receipt::Receipt;
use receipt_core::scoring::{points_for, score_receipt, ScoringPolicy};

#[derive(Debug, Parser)]
#[command(name = "receipt_cli", about = "Score a receipt JSON document offline")]
struct Args {
    /// Receipt JSON file. Reads stdin when omitted or `-`.
    path: Option<PathBuf>,

    /// How unparseable amounts, dates and times are treated. Defaults to SCORING_POLICY.
    #[arg(long)]
    policy: Option<ScoringPolicy>,

    /// Print each rule's sub-score alongside the points.
    #[arg(long)]
    breakdown: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = settings.init_sentry(sentry::release_name!());

    // stdout carries the result, so logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let policy = args.policy.unwrap_or(settings.scoring_policy);

    let result = run(&args, policy).await;
    match result {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "scoring failed");
            Err(err)
        }
    }
}

async fn run(args: &Args, policy: ScoringPolicy) -> anyhow::Result<serde_json::Value> {
    let text = read_input(args.path.as_ref()).await?;
    let receipt =
        serde_json::from_str::<Receipt>(&text).context("input is not a valid receipt")?;
    tracing::debug!(
        retailer = %receipt.retailer,
        items = receipt.items.len(),
        %policy,
        "scoring receipt"
    );
    render(&receipt, policy, args.breakdown)
}

async fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn render(
    receipt: &Receipt,
    policy: ScoringPolicy,
    breakdown: bool,
) -> anyhow::Result<serde_json::Value> {
    if !breakdown {
        let points = points_for(receipt, policy)?;
        return Ok(serde_json::json!({ "points": points }));
    }

    let scored = score_receipt(receipt, policy)?;
    Ok(serde_json::json!({
        "points": scored.points(),
        "breakdown": scored,
    }))
}
