//! Aggregation-layer properties: exact ratios, the segment partition,
//! zero-record guards, and the concentration summary.

use std::collections::HashMap;

use cecl_core::{
    aggregation::{
        all_segment_metrics, geographic_metrics, geographic_summary, portfolio_metrics,
        report_data, segment_metrics, ReportData,
    },
    config::Segment,
    dataset::{DatasetParams, PortfolioDataset},
    loan::generate_loans,
    snapshot::generate_snapshots,
};
use chrono::NaiveDate;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
}

fn scenario() -> PortfolioDataset {
    PortfolioDataset::generate(DatasetParams::new(42, 3000, as_of()))
}

#[test]
fn charge_off_rate_is_the_exact_ratio() {
    let dataset = scenario();
    let metrics = portfolio_metrics(&dataset);
    let charged_off = dataset.loans().iter().filter(|l| l.charged_off).count();

    assert_eq!(metrics.loan_count, 3000);
    assert_eq!(
        metrics.charge_off_rate,
        charged_off as f64 / 3000.0,
        "charge-off rate is not the exact count ratio"
    );
}

#[test]
fn expected_loss_sums_latest_snapshots_only() {
    let dataset = scenario();
    let metrics = portfolio_metrics(&dataset);

    let mut latest: HashMap<&str, (NaiveDate, f64)> = HashMap::new();
    for snapshot in dataset.snapshots() {
        let entry = latest
            .entry(snapshot.loan_id.as_str())
            .or_insert((snapshot.snapshot_date, snapshot.expected_loss));
        if snapshot.snapshot_date > entry.0 {
            *entry = (snapshot.snapshot_date, snapshot.expected_loss);
        }
    }
    let expected: f64 = latest.values().map(|(_, el)| el).sum();
    assert!(
        (metrics.total_expected_loss - expected).abs() / expected < 1e-9,
        "total expected loss {} != latest-snapshot sum {expected}",
        metrics.total_expected_loss
    );
}

#[test]
fn segment_exposures_partition_the_portfolio() {
    let dataset = scenario();
    let portfolio = portfolio_metrics(&dataset);
    let segments = all_segment_metrics(&dataset);

    assert_eq!(segments.len(), 8, "expected all eight segments");

    let summed: f64 = segments.iter().map(|m| m.total_exposure).sum();
    assert!(
        (summed - portfolio.total_exposure).abs() / portfolio.total_exposure < 1e-9,
        "segment exposures {summed} do not partition portfolio {}",
        portfolio.total_exposure
    );

    let counts: usize = segments.iter().map(|m| m.loan_count).sum();
    assert_eq!(counts, portfolio.loan_count, "segment loan counts do not partition");

    let share: f64 = segments.iter().map(|m| m.exposure_share_pct).sum();
    assert!((share - 100.0).abs() < 1e-6, "shares sum to {share}, not 100");

    for pair in segments.windows(2) {
        assert!(
            pair[0].total_exposure >= pair[1].total_exposure,
            "segments not sorted descending by exposure"
        );
    }
}

#[test]
fn geographic_metrics_partition_too() {
    let dataset = scenario();
    let portfolio = portfolio_metrics(&dataset);
    let states = geographic_metrics(&dataset);

    let summed: f64 = states.iter().map(|m| m.total_exposure).sum();
    assert!((summed - portfolio.total_exposure).abs() / portfolio.total_exposure < 1e-9);
    for pair in states.windows(2) {
        assert!(pair[0].total_exposure >= pair[1].total_exposure);
    }
}

#[test]
fn empty_dataset_yields_zero_records_not_errors() {
    let params = DatasetParams::new(42, 0, as_of());
    let dataset = PortfolioDataset::generate(params);

    let portfolio = portfolio_metrics(&dataset);
    assert_eq!(portfolio.loan_count, 0);
    assert_eq!(portfolio.total_exposure, 0.0);
    assert_eq!(portfolio.avg_pd, 0.0);
    assert_eq!(portfolio.charge_off_rate, 0.0);

    let segment = segment_metrics(&dataset, Segment::CreditCard);
    assert_eq!(segment.loan_count, 0);
    assert_eq!(segment.avg_pd, 0.0);
    assert_eq!(segment.exposure_share_pct, 0.0);

    assert!(geographic_metrics(&dataset).is_empty());
    let summary = geographic_summary(&dataset);
    assert_eq!(summary.hhi, 0.0);
    assert_eq!(summary.state_count, 0);
}

#[test]
fn single_state_portfolio_has_hhi_10000() {
    let params = DatasetParams::new(42, 50, as_of());
    let mut loans = generate_loans(50, params.seed, params.as_of, &params.config);
    for loan in &mut loans {
        loan.state = "TX";
    }
    let snapshots = generate_snapshots(&loans, params.seed, params.as_of, &params.config);
    let dataset = PortfolioDataset::from_parts(params, loans, snapshots, Vec::new());

    let summary = geographic_summary(&dataset);
    assert!(
        (summary.hhi - 10_000.0).abs() < 1e-6,
        "degenerate single-state HHI is {}, expected 10000",
        summary.hhi
    );
    assert_eq!(summary.state_count, 1);
    assert!((summary.top3_share_pct - 100.0).abs() < 1e-6);
}

#[test]
fn report_scopes_carry_their_fixed_shapes() {
    let dataset = scenario();

    match report_data(&dataset, None) {
        ReportData::Portfolio {
            portfolio,
            segments,
            geography,
        } => {
            assert_eq!(segments.len(), 8);
            assert!(portfolio.total_exposure > 0.0);
            assert!(geography.hhi > 0.0 && geography.hhi < 10_000.0);
            assert!(geography.top3_share_pct > 0.0 && geography.top3_share_pct <= 100.0);
        }
        other => panic!("expected portfolio scope, got {other:?}"),
    }

    match report_data(&dataset, Some(Segment::AutoLoan)) {
        ReportData::Segment { segment, .. } => {
            assert_eq!(segment.segment, Segment::AutoLoan);
            assert!(segment.loan_count > 0);
        }
        other => panic!("expected segment scope, got {other:?}"),
    }
}

#[test]
fn averages_come_from_latest_snapshots() {
    // A loan's latest snapshot determines its contribution: PD averages
    // must land inside the union of segment PD ranges, post-stress.
    let dataset = scenario();
    let metrics = portfolio_metrics(&dataset);
    assert!(metrics.avg_pd > 0.0 && metrics.avg_pd < 0.10, "avg PD {}", metrics.avg_pd);
    assert!(metrics.avg_lgd > 0.0 && metrics.avg_lgd < 0.90, "avg LGD {}", metrics.avg_lgd);
}
