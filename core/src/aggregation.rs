//! Read-only aggregation over a generated dataset.
//!
//! This layer is REACTIVE. It never mutates the dataset and holds no
//! state of its own; every function is a pure fold over the immutable
//! loan and snapshot sets, deterministic given the dataset.
//!
//! Averages follow the latest-snapshot convention: each loan
//! contributes its most recent snapshot (max snapshot date), never an
//! average over its full history. Every division is guarded — empty
//! subsets produce the zero record, not NaN.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{
    config::{Segment, SEGMENTS},
    dataset::PortfolioDataset,
    loan::Loan,
    snapshot::LoanMetricsSnapshot,
    types::StateCode,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub loan_count: usize,
    /// Sum of current balances.
    pub total_exposure: f64,
    pub avg_pd: f64,
    pub avg_lgd: f64,
    /// Sum of latest-snapshot expected losses.
    pub total_expected_loss: f64,
    pub charge_off_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentMetrics {
    pub segment: Segment,
    pub label: &'static str,
    pub loan_count: usize,
    pub total_exposure: f64,
    pub avg_pd: f64,
    pub avg_lgd: f64,
    pub total_expected_loss: f64,
    pub charge_off_rate: f64,
    /// This segment's share of portfolio exposure, percent.
    pub exposure_share_pct: f64,
}

impl SegmentMetrics {
    pub fn zero(segment: Segment) -> Self {
        Self {
            segment,
            label: segment.label(),
            loan_count: 0,
            total_exposure: 0.0,
            avg_pd: 0.0,
            avg_lgd: 0.0,
            total_expected_loss: 0.0,
            charge_off_rate: 0.0,
            exposure_share_pct: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicMetrics {
    pub state: StateCode,
    pub loan_count: usize,
    pub total_exposure: f64,
    pub avg_pd: f64,
    pub avg_lgd: f64,
    pub total_expected_loss: f64,
    pub charge_off_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicSummary {
    /// Herfindahl-Hirschman index over state exposure shares:
    /// sum of (share x 100)^2. 10000 = single-state portfolio.
    pub hhi: f64,
    /// Exposure share of the three largest states, percent.
    pub top3_share_pct: f64,
    pub state_count: usize,
}

/// Report payload handed to the narrative layer. Exactly two scopes,
/// each with a fixed field set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ReportData {
    Portfolio {
        portfolio: PortfolioMetrics,
        /// All segments, sorted descending by exposure.
        segments: Vec<SegmentMetrics>,
        geography: GeographicSummary,
    },
    Segment {
        portfolio: PortfolioMetrics,
        segment: SegmentMetrics,
        geography: GeographicSummary,
    },
}

/// Latest snapshot per loan, keyed by loan id.
fn latest_snapshots(dataset: &PortfolioDataset) -> HashMap<&str, &LoanMetricsSnapshot> {
    let mut latest: HashMap<&str, &LoanMetricsSnapshot> = HashMap::new();
    for snapshot in dataset.snapshots() {
        latest
            .entry(snapshot.loan_id.as_str())
            .and_modify(|current| {
                if snapshot.snapshot_date > current.snapshot_date {
                    *current = snapshot;
                }
            })
            .or_insert(snapshot);
    }
    latest
}

/// Shared fold over an arbitrary loan subset.
struct SubsetRollup {
    loan_count: usize,
    total_exposure: f64,
    avg_pd: f64,
    avg_lgd: f64,
    total_expected_loss: f64,
    charge_off_rate: f64,
}

fn roll_up<'a>(
    loans: impl Iterator<Item = &'a Loan>,
    latest: &HashMap<&str, &LoanMetricsSnapshot>,
) -> SubsetRollup {
    let mut loan_count = 0usize;
    let mut charged_off = 0usize;
    let mut total_exposure = 0.0;
    let mut pd_sum = 0.0;
    let mut lgd_sum = 0.0;
    let mut expected_loss = 0.0;
    let mut sampled = 0usize;

    for loan in loans {
        loan_count += 1;
        total_exposure += loan.current_balance;
        if loan.charged_off {
            charged_off += 1;
        }
        // Loans originated after the newest quarter end have no
        // snapshot yet; they carry exposure but not risk averages.
        if let Some(snapshot) = latest.get(loan.id.as_str()) {
            pd_sum += snapshot.pd;
            lgd_sum += snapshot.lgd;
            expected_loss += snapshot.expected_loss;
            sampled += 1;
        }
    }

    SubsetRollup {
        loan_count,
        total_exposure,
        avg_pd: if sampled > 0 { pd_sum / sampled as f64 } else { 0.0 },
        avg_lgd: if sampled > 0 { lgd_sum / sampled as f64 } else { 0.0 },
        total_expected_loss: expected_loss,
        charge_off_rate: if loan_count > 0 {
            charged_off as f64 / loan_count as f64
        } else {
            0.0
        },
    }
}

pub fn portfolio_metrics(dataset: &PortfolioDataset) -> PortfolioMetrics {
    let latest = latest_snapshots(dataset);
    let rollup = roll_up(dataset.loans().iter(), &latest);
    PortfolioMetrics {
        loan_count: rollup.loan_count,
        total_exposure: rollup.total_exposure,
        avg_pd: rollup.avg_pd,
        avg_lgd: rollup.avg_lgd,
        total_expected_loss: rollup.total_expected_loss,
        charge_off_rate: rollup.charge_off_rate,
    }
}

pub fn segment_metrics(dataset: &PortfolioDataset, segment: Segment) -> SegmentMetrics {
    let latest = latest_snapshots(dataset);
    let portfolio_exposure: f64 = dataset.loans().iter().map(|l| l.current_balance).sum();
    segment_rollup(dataset, segment, &latest, portfolio_exposure)
}

fn segment_rollup(
    dataset: &PortfolioDataset,
    segment: Segment,
    latest: &HashMap<&str, &LoanMetricsSnapshot>,
    portfolio_exposure: f64,
) -> SegmentMetrics {
    let rollup = roll_up(
        dataset.loans().iter().filter(|l| l.segment == segment),
        latest,
    );
    if rollup.loan_count == 0 {
        return SegmentMetrics::zero(segment);
    }
    SegmentMetrics {
        segment,
        label: segment.label(),
        loan_count: rollup.loan_count,
        total_exposure: rollup.total_exposure,
        avg_pd: rollup.avg_pd,
        avg_lgd: rollup.avg_lgd,
        total_expected_loss: rollup.total_expected_loss,
        charge_off_rate: rollup.charge_off_rate,
        exposure_share_pct: if portfolio_exposure > 0.0 {
            100.0 * rollup.total_exposure / portfolio_exposure
        } else {
            0.0
        },
    }
}

/// All eight segments, sorted descending by exposure.
pub fn all_segment_metrics(dataset: &PortfolioDataset) -> Vec<SegmentMetrics> {
    let latest = latest_snapshots(dataset);
    let portfolio_exposure: f64 = dataset.loans().iter().map(|l| l.current_balance).sum();
    let mut metrics: Vec<SegmentMetrics> = SEGMENTS
        .iter()
        .map(|&s| segment_rollup(dataset, s, &latest, portfolio_exposure))
        .collect();
    metrics.sort_by(|a, b| {
        b.total_exposure
            .partial_cmp(&a.total_exposure)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    metrics
}

/// Per-state rollups, sorted descending by exposure. States with no
/// loans are absent; an empty loan set yields an empty vec.
pub fn geographic_metrics(dataset: &PortfolioDataset) -> Vec<GeographicMetrics> {
    let latest = latest_snapshots(dataset);

    // BTreeMap keeps tie-broken output order independent of hash state.
    let mut by_state: BTreeMap<StateCode, Vec<&Loan>> = BTreeMap::new();
    for loan in dataset.loans() {
        by_state.entry(loan.state).or_default().push(loan);
    }

    let mut metrics: Vec<GeographicMetrics> = by_state
        .into_iter()
        .map(|(state, loans)| {
            let rollup = roll_up(loans.into_iter(), &latest);
            GeographicMetrics {
                state,
                loan_count: rollup.loan_count,
                total_exposure: rollup.total_exposure,
                avg_pd: rollup.avg_pd,
                avg_lgd: rollup.avg_lgd,
                total_expected_loss: rollup.total_expected_loss,
                charge_off_rate: rollup.charge_off_rate,
            }
        })
        .collect();
    metrics.sort_by(|a, b| {
        b.total_exposure
            .partial_cmp(&a.total_exposure)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    metrics
}

pub fn geographic_summary(dataset: &PortfolioDataset) -> GeographicSummary {
    let by_state = geographic_metrics(dataset);
    let total: f64 = by_state.iter().map(|m| m.total_exposure).sum();
    if total <= 0.0 {
        return GeographicSummary {
            hhi: 0.0,
            top3_share_pct: 0.0,
            state_count: 0,
        };
    }

    let hhi = by_state
        .iter()
        .map(|m| {
            let share_pct = 100.0 * m.total_exposure / total;
            share_pct * share_pct
        })
        .sum::<f64>();
    // geographic_metrics is already sorted descending by exposure.
    let top3_share_pct = by_state
        .iter()
        .take(3)
        .map(|m| 100.0 * m.total_exposure / total)
        .sum::<f64>();

    GeographicSummary {
        hhi,
        top3_share_pct,
        state_count: by_state.len(),
    }
}

/// Bundle the aggregates for the narrative layer. `segment: None`
/// produces the portfolio-scope report; `Some(..)` the segment scope.
pub fn report_data(dataset: &PortfolioDataset, segment: Option<Segment>) -> ReportData {
    let portfolio = portfolio_metrics(dataset);
    let geography = geographic_summary(dataset);
    match segment {
        None => ReportData::Portfolio {
            portfolio,
            segments: all_segment_metrics(dataset),
            geography,
        },
        Some(segment) => ReportData::Segment {
            portfolio,
            segment: segment_metrics(dataset, segment),
            geography,
        },
    }
}
