//! cecl-runner: headless dataset runner for the CECL portfolio core.
//!
//! Usage:
//!   cecl-runner --seed 42 --loans 5000
//!   cecl-runner --seed 42 --segment credit_card --report
//!   cecl-runner --macro UNRATE
//!   cecl-runner --cohort --config overrides.json

use anyhow::{bail, Context, Result};
use cecl_core::{
    aggregation, backtest,
    config::{GeneratorConfig, Segment},
    dataset::{DatasetParams, PortfolioDataset, DEFAULT_LOAN_COUNT, DEFAULT_SEED},
    macro_data::{MacroIndicator, MacroSeriesClient},
    narrative::NarrativeClient,
};
use chrono::NaiveDate;
use std::env;
use std::fs;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", DEFAULT_SEED);
    let loans = parse_arg(&args, "--loans", DEFAULT_LOAN_COUNT);
    let as_of = match arg_value(&args, "--as-of") {
        Some(raw) => raw
            .parse::<NaiveDate>()
            .with_context(|| format!("invalid --as-of date '{raw}'"))?,
        None => chrono::Utc::now().date_naive(),
    };

    let segment = match arg_value(&args, "--segment") {
        Some(id) => match Segment::from_id(id) {
            Some(segment) => Some(segment),
            None => bail!("unknown segment '{id}'"),
        },
        None => None,
    };

    let config = match arg_value(&args, "--config") {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading generator config {path}"))?;
            serde_json::from_str::<GeneratorConfig>(&raw)
                .with_context(|| format!("parsing generator config {path}"))?
        }
        None => GeneratorConfig::default(),
    };

    // The macro fetch needs no dataset at all.
    if let Some(series_id) = arg_value(&args, "--macro") {
        let Some(indicator) = MacroIndicator::from_series_id(series_id) else {
            bail!("unknown macro series '{series_id}'");
        };
        let series = MacroSeriesClient::from_env().fetch(indicator, as_of);
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    let params = DatasetParams {
        seed,
        loan_count: loans,
        as_of,
        config,
    };
    let dataset = PortfolioDataset::generate(params);

    if args.iter().any(|a| a == "--cohort") {
        let span = dataset.params().config.history_months;
        let curves = backtest::cohort_curves(dataset.charge_off_histories(), span);
        println!("{}", serde_json::to_string_pretty(&curves)?);
        return Ok(());
    }

    let report = aggregation::report_data(&dataset, segment);

    if args.iter().any(|a| a == "--report") {
        let narrative = NarrativeClient::from_env().generate(&report);
        println!("ai_generated: {}", narrative.ai_generated);
        println!();
        println!("{}", narrative.text);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
