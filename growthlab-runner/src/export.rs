//! Artifact export: JSON reports, CSV tables and a Parquet price table.
//!
//! Each run gets its own directory named
//! `<kind>_<first-symbol>_<fingerprint>`, where the fingerprint is a BLAKE3
//! hash of the request. The same request always lands in the same directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, DataType, ParquetWriter};
use serde::Serialize;

use growthlab_core::data::PriceTable;

use crate::comparator::ComparisonReport;
use crate::simulator::SimulationReport;

/// Hex chars of the request hash kept in directory names.
const FINGERPRINT_LEN: usize = 12;

/// Short content hash of any serializable request.
pub fn fingerprint<T: Serialize>(request: &T) -> Result<String> {
    let json = serde_json::to_string(request).context("failed to serialize request")?;
    let hash = blake3::hash(json.as_bytes()).to_hex();
    Ok(hash.as_str()[..FINGERPRINT_LEN].to_string())
}

fn artifact_dir<T: Serialize>(
    output_dir: &Path,
    kind: &str,
    symbol: &str,
    request: &T,
) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!("{kind}_{symbol}_{}", fingerprint(request)?));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;
    Ok(run_dir)
}

// ─── Comparator ─────────────────────────────────────────────────────

/// Write `report.json`, `investment_values.csv`, `cagr.csv` and
/// `prices.parquet`. Returns the run directory.
pub fn save_comparison_artifacts(report: &ComparisonReport, output_dir: &Path) -> Result<PathBuf> {
    let first = report
        .request
        .symbols
        .first()
        .map(String::as_str)
        .unwrap_or("none");
    let run_dir = artifact_dir(output_dir, "compare", first, &report.request)?;

    let json = serde_json::to_string_pretty(report).context("failed to serialize comparison")?;
    std::fs::write(run_dir.join("report.json"), json)?;
    std::fs::write(
        run_dir.join("investment_values.csv"),
        export_investment_values_csv(report)?,
    )?;
    std::fs::write(run_dir.join("cagr.csv"), export_cagr_csv(report)?)?;
    write_price_table_parquet(&run_dir.join("prices.parquet"), &report.prices)?;

    tracing::info!(dir = %run_dir.display(), "comparison artifacts written");
    Ok(run_dir)
}

/// Long format: `symbol,date,value`.
pub fn export_investment_values_csv(report: &ComparisonReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["symbol", "date", "value"])?;
    for ticker in &report.tickers {
        for point in &ticker.investment_values {
            wtr.write_record([
                ticker.symbol.clone(),
                point.date.to_string(),
                format!("{:.6}", point.value),
            ])?;
        }
    }
    let bytes = wtr.into_inner().context("failed to flush CSV")?;
    Ok(String::from_utf8(bytes)?)
}

/// One row per normalized ticker; `cagr_percent` is empty when undefined.
pub fn export_cagr_csv(report: &ComparisonReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["symbol", "cagr_percent", "final_value", "cagr_error"])?;
    for ticker in &report.tickers {
        let (pct, err) = match &ticker.cagr {
            Ok(rate) => (format!("{:.4}", rate * 100.0), String::new()),
            Err(e) => (String::new(), e.to_string()),
        };
        wtr.write_record([
            ticker.symbol.clone(),
            pct,
            format!("{:.2}", ticker.final_value),
            err,
        ])?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV")?;
    Ok(String::from_utf8(bytes)?)
}

/// Raw adjusted-close table as a `date` column plus one nullable column per
/// symbol.
pub fn price_table_frame(table: &PriceTable) -> Result<DataFrame> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch date")?;
    let days: Vec<i32> = table
        .dates
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();

    let mut columns = Vec::with_capacity(table.symbols.len() + 1);
    columns.push(
        Column::new("date".into(), days)
            .cast(&DataType::Date)
            .context("failed to cast date column")?,
    );
    for (symbol, cells) in table.symbols.iter().zip(&table.columns) {
        columns.push(Column::new(symbol.as_str().into(), cells.clone()));
    }
    DataFrame::new(columns).context("failed to build price dataframe")
}

pub fn write_price_table_parquet(path: &Path, table: &PriceTable) -> Result<()> {
    let mut df = price_table_frame(table)?;
    let mut file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    ParquetWriter::new(&mut file)
        .finish(&mut df)
        .context("failed to write price parquet")?;
    Ok(())
}

// ─── Simulator ──────────────────────────────────────────────────────

/// Write `report.json` and `growth.csv`. Returns the run directory.
pub fn save_simulation_artifacts(report: &SimulationReport, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = artifact_dir(output_dir, "reinvest", &report.request.symbol, &report.request)?;

    let json = serde_json::to_string_pretty(report).context("failed to serialize simulation")?;
    std::fs::write(run_dir.join("report.json"), json)?;
    std::fs::write(run_dir.join("growth.csv"), export_growth_csv(report)?)?;

    tracing::info!(dir = %run_dir.display(), "simulation artifacts written");
    Ok(run_dir)
}

/// `date,value`, one row per trading day.
pub fn export_growth_csv(report: &SimulationReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "value"])?;
    for point in &report.outcome.growth {
        wtr.write_record([point.date.to_string(), format!("{:.6}", point.value)])?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV")?;
    Ok(String::from_utf8(bytes)?)
}
