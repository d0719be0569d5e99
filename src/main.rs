use alphastudio::prelude::*;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alphastudio")]
#[command(about = "A moving-average crossover backtester and grid-search optimizer", long_about = None)]
struct Cli {
    //log filter when ALPHASTUDIO_LOG is unset (eg info, debug, alphastudio=trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    //log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    //run a single backtest
    Run {
        //path to csv data file
        #[arg(long)]
        data: PathBuf,

        //fast sma window
        #[arg(long, default_value_t = MAParams::default().fast)]
        fast: usize,

        //slow sma window
        #[arg(long, default_value_t = MAParams::default().slow)]
        slow: usize,

        //fee per trade in basis points
        #[arg(long, default_value_t = MAParams::default().fee_bps)]
        fee_bps: f64,

        //slippage per trade in basis points
        #[arg(long, default_value_t = MAParams::default().slippage_bps)]
        slippage_bps: f64,

        //print every trade
        #[arg(long)]
        show_trades: bool,
    },

    //grid search fast/slow windows across one or more files
    Optimize {
        //csv data files (overrides the config file's list)
        #[arg(long, num_args = 1..)]
        data: Vec<PathBuf>,

        //json configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        fast_min: Option<usize>,

        #[arg(long)]
        fast_max: Option<usize>,

        #[arg(long)]
        slow_min: Option<usize>,

        #[arg(long)]
        slow_max: Option<usize>,

        #[arg(long)]
        fee_bps: Option<f64>,

        #[arg(long)]
        slippage_bps: Option<f64>,

        //evaluate cells on a single thread
        #[arg(long)]
        sequential: bool,

        //number of ranked cells to print
        #[arg(long, default_value = "10")]
        top: usize,
    },

    //load a file and report what the loader saw
    Inspect {
        //path to csv data file
        #[arg(long)]
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Run {
            data,
            fast,
            slow,
            fee_bps,
            slippage_bps,
            show_trades,
        } => {
            let params = MAParams::new(fast, slow, fee_bps, slippage_bps);
            run_backtest(data, params, show_trades)?;
        }
        Commands::Optimize {
            data,
            config,
            fast_min,
            fast_max,
            slow_min,
            slow_max,
            fee_bps,
            slippage_bps,
            sequential,
            top,
        } => {
            let mut studio = match config {
                Some(path) => StudioConfiguration::from_json_file(&path)
                    .context(format!("Failed to read config {:?}", path))?,
                None => StudioConfiguration::default(),
            };

            if !data.is_empty() {
                studio.data_paths = data;
            }
            studio.fast_range.min = fast_min.unwrap_or(studio.fast_range.min);
            studio.fast_range.max = fast_max.unwrap_or(studio.fast_range.max);
            studio.slow_range.min = slow_min.unwrap_or(studio.slow_range.min);
            studio.slow_range.max = slow_max.unwrap_or(studio.slow_range.max);
            studio.params.fee_bps = fee_bps.unwrap_or(studio.params.fee_bps);
            studio.params.slippage_bps = slippage_bps.unwrap_or(studio.params.slippage_bps);
            if sequential {
                studio.parallel = false;
            }

            run_optimize(&studio, top)?;
        }
        Commands::Inspect { data } => inspect(data)?,
    }

    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = std::env::var("ALPHASTUDIO_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter).context("invalid log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}

fn run_backtest(data_path: PathBuf, params: MAParams, show_trades: bool) -> Result<()> {
    println!("Alpha Studio Backtest");
    println!("=====================\n");

    //load data
    println!("Loading data from {:?}...", data_path);
    let loaded = load(&data_path).context(format!("Failed to load data from {:?}", data_path))?;
    print_load_summary(&loaded);

    if loaded.is_empty() {
        anyhow::bail!("No bars loaded from {:?}", data_path);
    }

    if !params.is_valid() {
        println!(
            "Warning: fast ({}) must be positive and below slow ({}), result will be empty",
            params.fast, params.slow
        );
    }

    let strategy = SmaCrossover::new(&[], params.fast, params.slow);
    println!(
        "Strategy: {} (fast={}, slow={})",
        strategy.name(),
        params.fast,
        params.slow
    );
    println!(
        "Costs: fee {} bps + slippage {} bps per trade\n",
        params.fee_bps, params.slippage_bps
    );

    //run backtest
    let result = backtest(&loaded.bars, &params);

    //display results
    println!("Backtest Results");
    println!("================\n");
    SummaryMetrics::from_result(&result).pretty_print_table();

    if show_trades {
        print_trades(&loaded.bars, &result.trades);
    }

    Ok(())
}

fn run_optimize(studio: &StudioConfiguration, top: usize) -> Result<()> {
    println!("Alpha Studio Grid Search");
    println!("========================\n");

    if studio.data_paths.is_empty() {
        anyhow::bail!("No data files given (use --data or a config file)");
    }

    println!("Datasets: {}", studio.data_paths.len());
    println!(
        "Fast: {}..={}  Slow: {}..={}",
        studio.fast_range.min, studio.fast_range.max, studio.slow_range.min, studio.slow_range.max
    );
    println!(
        "Costs: fee {} bps + slippage {} bps per trade\n",
        studio.params.fee_bps, studio.params.slippage_bps
    );

    if studio.fast_range.is_empty() || studio.slow_range.is_empty() {
        println!("Warning: an empty window range was given, nothing will be evaluated\n");
    }

    let search = GridSearch::from_paths(studio.data_paths.as_slice(), studio.params)
        .with_ranges(studio.fast_range.as_range(), studio.slow_range.as_range())
        .with_parallelism(studio.parallel);

    println!(
        "Loaded {} of {} datasets, {} combinations to evaluate\n",
        search.dataset_count(),
        studio.data_paths.len(),
        search.cells().len()
    );

    let report = search.run_with_scores();

    let Some(best) = report.best else {
        println!("No valid combination found");
        return Ok(());
    };

    println!(
        "Best: fast={} slow={} score={:.6}\n",
        best.best_fast, best.best_slow, best.best_score
    );

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Rank"),
        Cell::new("Fast"),
        Cell::new("Slow"),
        Cell::new("Score"),
    ]));
    for (rank, ((fast, slow), score)) in report.top(top).into_iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&format!("{}", rank + 1)),
            Cell::new(&format!("{}", fast)),
            Cell::new(&format!("{}", slow)),
            Cell::new(&format!("{:.6}", score)),
        ]));
    }
    table.printstd();

    Ok(())
}

fn inspect(data_path: PathBuf) -> Result<()> {
    let loaded = load(&data_path).context(format!("Failed to load data from {:?}", data_path))?;
    print_load_summary(&loaded);
    Ok(())
}

fn print_load_summary(loaded: &LoadedBars) {
    println!("Schema: {}", loaded.schema.name());
    println!("Loaded {} bars", loaded.bars.len());

    if let (Some(first), Some(last)) = (loaded.bars.first(), loaded.bars.last()) {
        println!(
            "Date range: {} to {}",
            format_bar_time(first),
            format_bar_time(last)
        );
    }

    if let Some(warning) = loaded.warning() {
        println!(
            "Warnings: {} (last: {})",
            loaded.diagnostics.warning_count, warning
        );
    }
    println!();
}

fn print_trades(bars: &[Bar], trades: &[Trade]) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Bar"),
        Cell::new("Time"),
        Cell::new("Side"),
        Cell::new("Price"),
    ]));

    for trade in trades {
        table.add_row(Row::new(vec![
            Cell::new(&format!("{}", trade.idx)),
            Cell::new(&bars.get(trade.idx).map(format_bar_time).unwrap_or_default()),
            Cell::new(&format!("{:?}", trade.side)),
            Cell::new(&format!("{:.4}", trade.price)),
        ]));
    }

    println!("\nTrades");
    table.printstd();
}

fn format_bar_time(bar: &Bar) -> String {
    bar.datetime()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| bar.ts_ms.to_string())
}
