//! Macroeconomic indicator series client.
//!
//! Fetches observation series from the public FRED API when a
//! credential is configured. Missing credential, non-success status,
//! transport failure, or an unparseable body all take the same path:
//! log a warning and return the locally computed mock series, flagged
//! `is_mock = true`. One attempt, no retry.
//!
//! The mock series runs on its own LCG stream keyed per indicator, so
//! it is deterministic across sessions and never touches the dataset
//! generator streams.

use std::time::Duration;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    error::CoreResult,
    rng::{LcgRng, StreamSlot},
};

const FRED_OBSERVATIONS_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Five years of monthly observations.
const MOCK_MONTHS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroIndicator {
    UnemploymentRate,
    FedFundsRate,
    Gdp,
    Cpi,
}

impl MacroIndicator {
    pub fn series_id(&self) -> &'static str {
        match self {
            Self::UnemploymentRate => "UNRATE",
            Self::FedFundsRate => "FEDFUNDS",
            Self::Gdp => "GDP",
            Self::Cpi => "CPIAUCSL",
        }
    }

    pub fn from_series_id(id: &str) -> Option<MacroIndicator> {
        match id.to_ascii_uppercase().as_str() {
            "UNRATE" => Some(Self::UnemploymentRate),
            "FEDFUNDS" => Some(Self::FedFundsRate),
            "GDP" => Some(Self::Gdp),
            "CPIAUCSL" => Some(Self::Cpi),
            _ => None,
        }
    }

    /// (base level, max monthly step, floor, ceiling, monthly drift)
    /// for the mock random walk.
    fn mock_params(&self) -> (f64, f64, f64, f64, f64) {
        match self {
            Self::UnemploymentRate => (4.2, 0.15, 3.0, 8.0, 0.0),
            Self::FedFundsRate => (4.5, 0.25, 0.25, 6.5, 0.0),
            Self::Gdp => (21_000.0, 90.0, 18_000.0, 30_000.0, 55.0),
            Self::Cpi => (295.0, 0.4, 250.0, 360.0, 0.7),
        }
    }

    fn mock_stream_key(&self) -> u64 {
        match self {
            Self::UnemploymentRate => 101,
            Self::FedFundsRate => 102,
            Self::Gdp => 103,
            Self::Cpi => 104,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroObservation {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroSeries {
    pub indicator: MacroIndicator,
    pub series_id: &'static str,
    pub observations: Vec<MacroObservation>,
    /// True when the series was computed locally instead of fetched.
    pub is_mock: bool,
}

/// Wire shape of the FRED observations payload. Values arrive as
/// strings, "." where an observation is missing.
#[derive(Debug, Deserialize)]
struct FredObservationsBody {
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: NaiveDate,
    value: String,
}

pub struct MacroSeriesClient {
    api_key: Option<String>,
    base_url: String,
}

impl MacroSeriesClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: FRED_OBSERVATIONS_URL.into(),
        }
    }

    /// Credential from CECL_FRED_API_KEY. Missing key means mock-only.
    pub fn from_env() -> Self {
        Self::new(std::env::var("CECL_FRED_API_KEY").ok())
    }

    pub fn fetch(&self, indicator: MacroIndicator, as_of: NaiveDate) -> MacroSeries {
        let Some(api_key) = &self.api_key else {
            log::warn!(
                "no FRED credential configured, using mock series for {}",
                indicator.series_id()
            );
            return mock_series(indicator, as_of);
        };

        match self.request(api_key, indicator, as_of) {
            Ok(observations) => MacroSeries {
                indicator,
                series_id: indicator.series_id(),
                observations,
                is_mock: false,
            },
            Err(err) => {
                log::warn!(
                    "FRED fetch for {} failed, using mock series: {err}",
                    indicator.series_id()
                );
                mock_series(indicator, as_of)
            }
        }
    }

    fn request(
        &self,
        api_key: &str,
        indicator: MacroIndicator,
        as_of: NaiveDate,
    ) -> CoreResult<Vec<MacroObservation>> {
        let start = (first_of_month(as_of) - Months::new(MOCK_MONTHS - 1)).to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let body: FredObservationsBody = client
            .get(&self.base_url)
            .query(&[
                ("series_id", indicator.series_id()),
                ("api_key", api_key),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        // Missing observations ship as "." and are dropped.
        Ok(body
            .observations
            .into_iter()
            .filter_map(|obs| {
                obs.value
                    .parse::<f64>()
                    .ok()
                    .map(|value| MacroObservation { date: obs.date, value })
            })
            .collect())
    }
}

/// Locally computed stand-in series: a bounded random walk with
/// per-indicator level, drift, and noise, on a dedicated LCG stream.
pub fn mock_series(indicator: MacroIndicator, as_of: NaiveDate) -> MacroSeries {
    let (base, step, floor, ceiling, drift) = indicator.mock_params();
    let mut rng = LcgRng::new(StreamSlot::MacroMock.seed_for(indicator.mock_stream_key()));

    let start = first_of_month(as_of) - Months::new(MOCK_MONTHS - 1);
    let mut level = base;
    let observations = (0..MOCK_MONTHS)
        .map(|month| {
            level = (level + drift + rng.between(-step, step)).clamp(floor, ceiling);
            MacroObservation {
                date: start + Months::new(month),
                value: (level * 100.0).round() / 100.0,
            }
        })
        .collect();

    MacroSeries {
        indicator,
        series_id: indicator.series_id(),
        observations,
        is_mock: true,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("first of month is always valid")
}
