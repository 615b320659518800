//! GrowthLab CLI — ticker comparison and dividend reinvestment from the shell.
//!
//! Commands:
//! - `compare` — normalized growth, CAGR and final value for several tickers
//! - `reinvest` — dividend reinvestment simulation for one ticker
//! - `config show` / `config default` / `config path` — inspect configuration
//!
//! Values not given on the command line come from the config file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use growthlab_core::logging::{init_logging, LogConfig};
use growthlab_runner::comparator::{run_comparison, ComparatorRequest, ComparisonReport};
use growthlab_runner::config::{GrowthConfig, ProviderSource};
use growthlab_runner::simulator::{run_simulation, SimulationReport, SimulationRequest};
use growthlab_runner::{
    build_provider, format_cagr, format_currency, save_comparison_artifacts,
    save_simulation_artifacts,
};

#[derive(Parser)]
#[command(
    name = "growthlab",
    about = "GrowthLab CLI — investment growth and dividend reinvestment"
)]
struct Cli {
    /// Config file. Defaults to <config_dir>/growthlab/config.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data source: yahoo, csv or synthetic.
    #[arg(long, global = true)]
    source: Option<String>,

    /// Directory of <SYMBOL>.csv files (implies --source csv).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Write report artifacts under this directory.
    #[arg(long, global = true)]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare growth of several tickers from a common investment.
    Compare {
        /// Comma-separated symbols, e.g. "AAPL, TSM, MSFT".
        #[arg(long)]
        symbols: Option<String>,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), exclusive.
        #[arg(long)]
        end: Option<String>,

        /// Add cumulative dividends to prices (simplified additive model).
        #[arg(long, default_value_t = false)]
        dividends: bool,

        /// Initial investment per ticker.
        #[arg(long)]
        investment: Option<f64>,

        /// Also print the raw adjusted-close table.
        #[arg(long, default_value_t = false)]
        show_prices: bool,
    },
    /// Simulate reinvesting every dividend of one ticker.
    Reinvest {
        #[arg(long)]
        symbol: Option<String>,

        /// Investment start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), exclusive. Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Initial investment.
        #[arg(long)]
        investment: Option<f64>,

        /// Print every point of the growth curve.
        #[arg(long, default_value_t = false)]
        show_curve: bool,
    },
    /// Configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the built-in defaults as TOML.
    Default,
    /// Print the default config file location.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LogConfig::from_env().with_default_level("warn")) {
        eprintln!("warning: logging disabled: {e}");
    }

    let mut config = GrowthConfig::load(cli.config.as_deref())?;
    apply_provider_flags(&mut config, cli.source.as_deref(), cli.data_dir)?;

    match cli.command {
        Commands::Compare {
            symbols,
            start,
            end,
            dividends,
            investment,
            show_prices,
        } => {
            let defaults = &config.comparator;
            let request = ComparatorRequest::parse(
                symbols.as_deref().unwrap_or(&defaults.symbols),
                parse_date_or(start.as_deref(), defaults.start)?,
                parse_date_or(end.as_deref(), defaults.end)?,
                dividends || defaults.include_dividends,
                investment.unwrap_or(defaults.initial_investment),
            )?;
            let provider = build_provider(&config.provider)?;
            let report = run_comparison(provider.as_ref(), &request)?;
            print_comparison(&report, show_prices);
            if let Some(dir) = &cli.export {
                let run_dir = save_comparison_artifacts(&report, dir)?;
                println!("Artifacts saved to: {}", run_dir.display());
            }
            Ok(())
        }
        Commands::Reinvest {
            symbol,
            start,
            end,
            investment,
            show_curve,
        } => {
            let defaults = &config.simulator;
            let end = match end.as_deref() {
                Some(s) => Some(parse_date(s)?),
                None => defaults.end,
            };
            let request = SimulationRequest::new(
                symbol.as_deref().unwrap_or(&defaults.symbol),
                parse_date_or(start.as_deref(), defaults.start)?,
                end,
                investment.unwrap_or(defaults.initial_investment),
                defaults.min_investment,
            )?;
            let provider = build_provider(&config.provider)?;
            let report = run_simulation(provider.as_ref(), &request)?;
            print_simulation(&report, show_curve);
            if let Some(dir) = &cli.export {
                let run_dir = save_simulation_artifacts(&report, dir)?;
                println!("Artifacts saved to: {}", run_dir.display());
            }
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigAction::Default => {
                print!("{}", GrowthConfig::default().to_toml()?);
                Ok(())
            }
            ConfigAction::Path => {
                match GrowthConfig::default_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("(no config directory on this platform)"),
                }
                Ok(())
            }
        },
    }
}

fn apply_provider_flags(
    config: &mut GrowthConfig,
    source: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    if let Some(dir) = data_dir {
        config.provider.source = ProviderSource::Csv;
        config.provider.csv_dir = dir;
    }
    if let Some(name) = source {
        config.provider.source = match ProviderSource::parse(name) {
            Some(source) => source,
            None => bail!("unknown source '{name}'. Valid: yahoo, csv, synthetic"),
        };
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn parse_date_or(s: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    s.map(parse_date).transpose().map(|d| d.unwrap_or(default))
}

fn print_comparison(report: &ComparisonReport, show_prices: bool) {
    let req = &report.request;
    println!();
    println!("=== Ticker Comparison ===");
    println!("Symbols:        {}", req.symbols.join(", "));
    println!("Period:         {} to {} ({:.2} years)", req.start, req.end, report.years);
    println!("Investment:     {}", format_currency(req.initial_investment));
    if let Some(model) = report.dividend_model() {
        println!("Dividends:      {model}");
    }
    println!();
    println!("{:<10} {:>8} {:>16}  {}", "Symbol", "Days", "Final Value", "CAGR");
    println!("{}", "-".repeat(52));
    for t in &report.tickers {
        println!(
            "{:<10} {:>8} {:>16}  {}",
            t.symbol,
            t.prices.len(),
            format_currency(t.final_value),
            format_cagr(&t.cagr)
        );
    }
    for f in &report.failures {
        println!("{:<10} {:>8} {:>16}  {}", f.symbol, "-", "-", f.error);
    }

    if show_prices {
        print_price_table(report);
    }

    if !report.missing.is_empty() {
        println!();
        for m in &report.missing {
            println!("WARNING: {} skipped: {}", m.symbol, m.reason);
        }
    }
    if report.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
}

fn print_price_table(report: &ComparisonReport) {
    let table = &report.prices;
    println!();
    print!("{:<12}", "Date");
    for symbol in &table.symbols {
        print!(" {symbol:>12}");
    }
    println!();
    for (date, cells) in table.rows() {
        print!("{:<12}", date.to_string());
        for cell in cells {
            match cell {
                Some(price) => print!(" {price:>12.4}"),
                None => print!(" {:>12}", "-"),
            }
        }
        println!();
    }
}

fn print_simulation(report: &SimulationReport, show_curve: bool) {
    let req = &report.request;
    let out = &report.outcome;
    println!();
    println!("=== Dividend Reinvestment ===");
    println!("Symbol:         {}", req.symbol);
    println!("Requested:      {} to {}", req.start, req.end);
    println!(
        "Traded:         {} to {} ({} days)",
        report.first_trade_date,
        report.last_trade_date,
        out.growth.len()
    );
    println!("Investment:     {}", format_currency(req.initial_investment));
    println!();
    println!("--- Result ---");
    println!("Final Value:    {}", format_currency(out.final_value));
    println!("CAGR:           {}", format_cagr(&report.cagr));
    println!("Shares:         {:.4} -> {:.4}", out.initial_shares, out.final_shares);
    println!(
        "Dividends:      {} reinvested ({})",
        out.dividends_reinvested,
        format_currency(out.dividend_cash)
    );
    if out.unmatched_dividends > 0 {
        println!(
            "WARNING: {} dividend date(s) had no trading day and were ignored",
            out.unmatched_dividends
        );
    }
    if report.source == growthlab_core::data::DataSource::Synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }

    if show_curve {
        println!();
        println!("{:<12} {:>16}", "Date", "Value");
        for point in &out.growth {
            println!("{:<12} {:>16}", point.date.to_string(), format_currency(point.value));
        }
    }
}
