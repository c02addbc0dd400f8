//! SigLab CLI: feature building, single backtests, grid search, and
//! walk-forward evaluation.
//!
//! Commands:
//! - `features` builds derived feature columns from a candle CSV
//! - `backtest` runs one SMA crossover configuration and prints metrics
//! - `grid` ranks the whole candidate grid on the full series
//! - `walk-forward` runs the chronological train/test protocol
//!
//! Every command accepts `--synthetic` to run on a seeded sample series
//! instead of a data file, which keeps the plumbing demoable offline.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Duration, TimeZone, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use siglab_core::backtest::{run_backtest, BacktestParams};
use siglab_core::data::{
    add_basic_features, find_gaps, parse_label, synthetic_candles, FeatureFrame, FeatureParams,
};
use siglab_core::metrics::PerformanceMetrics;
use siglab_core::signals::{SignalGenerator, SmaCrossover};
use siglab_runner::{
    export_experiments, export_walk_forward, load_candles_csv, load_features_csv,
    render_grid_table, render_walk_forward, run_grid_search, walk_forward::run_walk_forward,
    EvalConfig,
};

#[derive(Parser)]
#[command(name = "siglab", about = "SigLab: signal evaluation over historical candles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build derived feature columns (returns, volatility, z-score) from a
    /// candle CSV.
    Features {
        /// Input candle CSV (timestamp, open, high, low, close, volume).
        input: PathBuf,

        /// Output feature CSV.
        #[arg(long, default_value = "features.csv")]
        output: PathBuf,

        /// Price column to derive returns from.
        #[arg(long, default_value = "close")]
        price_col: String,

        /// Rolling window for volatility and z-score columns.
        #[arg(long, default_value_t = 24)]
        window: usize,

        /// Timeframe label for gap diagnostics (e.g. 15m, 1h, 1d).
        #[arg(long, default_value = "1h")]
        timeframe: String,
    },
    /// Run a single SMA crossover backtest and print its metrics.
    Backtest {
        /// Feature CSV. Omit with --synthetic.
        #[arg(long)]
        data: Option<PathBuf>,

        /// TOML evaluation config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Short SMA window.
        #[arg(long, default_value_t = 20)]
        short: usize,

        /// Long SMA window.
        #[arg(long, default_value_t = 100)]
        long: usize,

        /// Run on a seeded synthetic series instead of a data file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Synthetic series length in periods.
        #[arg(long, default_value_t = 8_760)]
        periods: usize,

        /// Synthetic series seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Evaluate the whole candidate grid on the full series (exploratory
    /// ranking; no out-of-sample validation).
    Grid {
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the ranked experiment table to this CSV.
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        synthetic: bool,

        #[arg(long, default_value_t = 8_760)]
        periods: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Select a configuration on the training window and validate it,
    /// unmodified, out of sample.
    WalkForward {
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Write a one-row summary to this CSV.
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        synthetic: bool,

        #[arg(long, default_value_t = 8_760)]
        periods: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Features {
            input,
            output,
            price_col,
            window,
            timeframe,
        } => cmd_features(input, output, price_col, window, &timeframe),
        Commands::Backtest {
            data,
            config,
            short,
            long,
            synthetic,
            periods,
            seed,
        } => {
            let config = load_config(config)?;
            let frame = load_data(data, synthetic, periods, seed)?;
            cmd_backtest(&frame, &config, short, long)
        }
        Commands::Grid {
            data,
            config,
            output,
            synthetic,
            periods,
            seed,
        } => {
            let config = load_config(config)?;
            let frame = load_data(data, synthetic, periods, seed)?;
            cmd_grid(&frame, &config, output)
        }
        Commands::WalkForward {
            data,
            config,
            output,
            synthetic,
            periods,
            seed,
        } => {
            let config = load_config(config)?;
            let frame = load_data(data, synthetic, periods, seed)?;
            cmd_walk_forward(&frame, &config, output)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EvalConfig> {
    match path {
        Some(path) => EvalConfig::from_toml_file(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EvalConfig::default()),
    }
}

/// Resolves the input series: a feature CSV, or a synthetic series with
/// features derived on the fly.
fn load_data(
    data: Option<PathBuf>,
    synthetic: bool,
    periods: usize,
    seed: u64,
) -> Result<FeatureFrame> {
    match (data, synthetic) {
        (Some(path), false) => load_features_csv(&path)
            .with_context(|| format!("loading features {}", path.display())),
        (None, true) => {
            info!(periods, seed, "generating synthetic series");
            let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
            let candles = synthetic_candles(periods, start, Duration::hours(1), 0.0003, 0.012, seed);
            Ok(add_basic_features(&candles, &FeatureParams::default())?)
        }
        (Some(_), true) => bail!("--data and --synthetic are mutually exclusive"),
        (None, false) => bail!("provide --data <csv> or --synthetic"),
    }
}

fn cmd_features(
    input: PathBuf,
    output: PathBuf,
    price_col: String,
    window: usize,
    timeframe: &str,
) -> Result<()> {
    let period = parse_label(timeframe)?;
    let candles = load_candles_csv(&input)
        .with_context(|| format!("loading candles {}", input.display()))?
        .canonicalize();

    let gaps = find_gaps(candles.index(), period);
    if !gaps.is_empty() {
        let missing: i64 = gaps.iter().map(|g| g.missing_periods).sum();
        info!(gaps = gaps.len(), missing, "index has gaps larger than the timeframe");
    }

    let params = FeatureParams {
        price_col,
        vol_window: window,
        z_window: window,
    };
    let features = add_basic_features(&candles, &params)?;
    siglab_runner::write_frame_csv(&features, &output)?;
    println!(
        "wrote {} rows x {} columns to {}",
        features.len(),
        features.column_names().len() + 1,
        output.display()
    );
    Ok(())
}

fn cmd_backtest(frame: &FeatureFrame, config: &EvalConfig, short: usize, long: usize) -> Result<()> {
    let producer = SmaCrossover::new(short, long)?;
    let signaled = producer.generate(frame)?;
    let result = run_backtest(
        &signaled,
        &BacktestParams {
            initial_capital: config.initial_capital,
            costs: config.cost_model(),
            return_col: config.return_col.clone(),
            ..Default::default()
        },
    )?;
    let metrics = PerformanceMetrics::compute(&result, config.periods_per_year);

    println!("{}", producer.name());
    println!("initial capital: {:>12.2}", result.initial_capital);
    println!("final capital:   {:>12.2}", result.final_equity());
    println!("trades (half-turns): {}", result.trade_count);
    match metrics.sharpe {
        Some(s) => println!("sharpe: {s:.3}"),
        None => println!("sharpe: n/a"),
    }
    match metrics.cagr {
        Some(c) => println!("cagr:   {:.2}%", c * 100.0),
        None => println!("cagr:   n/a"),
    }
    match metrics.max_drawdown {
        Some(dd) => println!(
            "max drawdown: {:.2}% ({} -> {})",
            dd.depth * 100.0,
            dd.peak,
            dd.trough
        ),
        None => println!("max drawdown: n/a"),
    }
    Ok(())
}

fn cmd_grid(frame: &FeatureFrame, config: &EvalConfig, output: Option<PathBuf>) -> Result<()> {
    let results = run_grid_search(frame, config)?;
    println!("{}", render_grid_table(&results));
    if let Some(path) = output {
        export_experiments(&results, &path)?;
        println!("wrote experiment table to {}", path.display());
    }
    Ok(())
}

fn cmd_walk_forward(
    frame: &FeatureFrame,
    config: &EvalConfig,
    output: Option<PathBuf>,
) -> Result<()> {
    let summary = run_walk_forward(frame, config)?;
    println!("{}", render_walk_forward(&summary));
    if let Some(path) = output {
        export_walk_forward(&summary, &path)?;
        println!("wrote walk-forward summary to {}", path.display());
    }
    Ok(())
}
