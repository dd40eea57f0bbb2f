//! Edgelab CLI — sweep, walkforward, and profile commands.
//!
//! Commands:
//! - `sweep` — expanding-window cross-validation over a candidate grid,
//!   printing a ranked leaderboard and portfolio weights
//! - `walkforward` — single train/test split selection with overfit
//!   diagnostics
//! - `profile` — market regime descriptors and bucket label
//!
//! Input is a `timestamp,price` CSV (`--bars`) or a seeded synthetic
//! series (`--synthetic N`).

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use edgelab_core::domain::PriceBar;
use edgelab_core::regime::{compute_market_profile, profile_bucket};
use edgelab_runner::{
    build_expanding_folds, build_grid, build_portfolio, evaluate_candidates, load_bars_csv,
    random_walk_bars, run_walk_forward, score_candidate_set, CandidateEvaluation,
    EvaluationRequest, PortfolioEntry, PortfolioWeight, SweepConfig, WalkForwardReport,
    WalkForwardRequest,
};

#[derive(Parser)]
#[command(
    name = "edgelab",
    about = "Edgelab CLI — strategy backtesting and selection over market price histories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Path to a timestamp,price CSV (unix-second timestamps, ascending).
    #[arg(long)]
    bars: Option<PathBuf>,

    /// Generate a synthetic series with this many bars instead.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for the synthetic series.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Token identifier carried through reports.
    #[arg(long, default_value = "synthetic-token")]
    token_id: String,

    /// Market question carried through reports.
    #[arg(long, default_value = "Synthetic market")]
    question: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-validate a candidate grid and print the ranked leaderboard.
    Sweep {
        #[command(flatten)]
        input: InputArgs,

        /// Path to a TOML sweep config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Portfolio size; overrides the config's top_k.
        #[arg(long)]
        top_k: Option<usize>,

        /// Write evaluations and portfolio weights as JSON.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Select the best candidate on a single train/test split.
    Walkforward {
        #[command(flatten)]
        input: InputArgs,

        /// Path to a TOML sweep config (risk/costs/grid sections apply).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Train fraction of the series.
        #[arg(long, default_value_t = 0.7)]
        split: f64,

        /// Write the walk-forward report as JSON.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the market regime profile and bucket label.
    Profile {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Sweep {
            input,
            config,
            top_k,
            output,
        } => run_sweep(input, config, top_k, output),
        Commands::Walkforward {
            input,
            config,
            split,
            output,
        } => run_walkforward_cmd(input, config, split, output),
        Commands::Profile { input } => run_profile(input),
    }
}

fn load_series(input: &InputArgs) -> Result<Vec<PriceBar>> {
    match (&input.bars, input.synthetic) {
        (Some(path), None) => load_bars_csv(path)
            .with_context(|| format!("loading bars from {}", path.display())),
        (None, Some(n)) => Ok(random_walk_bars(n, 0.5, 0.0002, 0.02, input.seed)),
        (Some(_), Some(_)) => bail!("--bars and --synthetic are mutually exclusive"),
        (None, None) => bail!("provide --bars <path> or --synthetic <n>"),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SweepConfig> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SweepConfig::from_toml_str(&source)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(SweepConfig::default()),
    }
}

fn run_sweep(
    input: InputArgs,
    config: Option<PathBuf>,
    top_k: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let top_k = top_k.unwrap_or(config.top_k);
    let bars = load_series(&input)?;

    let folds = build_expanding_folds(&bars, &config.folds);
    if folds.is_empty() {
        bail!(
            "{} bars is not enough for any fold (min_train_bars = {}, test_bars = {})",
            bars.len(),
            config.folds.min_train_bars,
            config.folds.test_bars
        );
    }
    let candidates = build_grid(&config.candidates);

    let request = EvaluationRequest {
        token_id: &input.token_id,
        market_question: &input.question,
        bars: &bars,
        risk: config.risk.as_ref(),
        costs: config.costs.as_ref(),
        candidates: &candidates,
        folds: &folds,
    };
    let ranked = score_candidate_set(evaluate_candidates(&request), None);

    println!(
        "{} bars, {} folds, {} candidates\n",
        bars.len(),
        folds.len(),
        candidates.len()
    );
    print_leaderboard(&ranked);

    let entries: Vec<PortfolioEntry> = ranked
        .iter()
        .map(|e| PortfolioEntry {
            token_id: input.token_id.clone(),
            candidate_id: e.candidate.id.clone(),
            score: e.score,
            max_drawdown: e.metrics.avg_drawdown,
        })
        .collect();
    let weights = build_portfolio(&entries, top_k);
    print_weights(&weights);

    if let Some(path) = output {
        let artifact = serde_json::json!({
            "evaluations": ranked,
            "portfolio": weights,
        });
        write_json(&path, &artifact)?;
        println!("\nwrote {}", path.display());
    }
    Ok(())
}

fn run_walkforward_cmd(
    input: InputArgs,
    config: Option<PathBuf>,
    split: f64,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let bars = load_series(&input)?;
    let candidates = build_grid(&config.candidates);

    let request = WalkForwardRequest {
        token_id: &input.token_id,
        market_question: &input.question,
        bars: &bars,
        split_ratio: split,
        candidates: &candidates,
        risk: config.risk.as_ref(),
        costs: config.costs.as_ref(),
    };
    let report = run_walk_forward(&request)?;
    print_walk_forward(&report);

    if let Some(path) = output {
        write_json(&path, &report)?;
        println!("\nwrote {}", path.display());
    }
    Ok(())
}

fn run_profile(input: InputArgs) -> Result<()> {
    let bars = load_series(&input)?;
    let profile = compute_market_profile(&bars);
    println!("bars:           {}", bars.len());
    println!("trendiness:     {:.6}", profile.trendiness);
    println!("mean reversion: {:.6}", profile.mean_reversion);
    println!("volatility:     {:.6}", profile.volatility);
    println!("tail risk:      {:.6}", profile.tail_risk);
    println!("bucket:         {}", profile_bucket(&profile));
    Ok(())
}

fn print_leaderboard(ranked: &[CandidateEvaluation]) {
    println!(
        "{:<4} {:<34} {:>7} {:>10} {:>8} {:>7} {:>9}",
        "#", "candidate", "score", "test pnl", "sharpe", "consis", "drawdown"
    );
    for (i, eval) in ranked.iter().enumerate() {
        println!(
            "{:<4} {:<34} {:>7.3} {:>10.4} {:>8.2} {:>7.2} {:>9.4}",
            i + 1,
            eval.candidate.id,
            eval.score,
            eval.metrics.avg_test_pnl,
            eval.metrics.avg_sharpe,
            eval.metrics.consistency,
            eval.metrics.avg_drawdown,
        );
    }
}

fn print_weights(weights: &[PortfolioWeight]) {
    println!("\nportfolio weights:");
    for weight in weights {
        println!("  {:<34} {:>7.4}", weight.candidate_id, weight.weight);
    }
}

fn print_walk_forward(report: &WalkForwardReport) {
    println!("best candidate:   {}", report.best.id);
    println!("family:           {}", report.best.family);
    println!("evaluated:        {}", report.candidates_evaluated);
    println!(
        "train: pnl {:>9.4}  sharpe {:>6.2}  drawdown {:>8.4}  trades {}",
        report.train.metrics.total_pnl,
        report.train.metrics.sharpe,
        report.train.metrics.max_drawdown,
        report.train.metrics.trade_count,
    );
    println!(
        "test:  pnl {:>9.4}  sharpe {:>6.2}  drawdown {:>8.4}  trades {}",
        report.test.metrics.total_pnl,
        report.test.metrics.sharpe,
        report.test.metrics.max_drawdown,
        report.test.metrics.trade_count,
    );
    println!("overfit score:    {:.3}", report.overfit_score);
    println!("robustness score: {:.3}", report.robustness_score);
}

fn write_json(path: &PathBuf, value: &impl serde::Serialize) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
