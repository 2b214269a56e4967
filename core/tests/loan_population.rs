//! Loan population invariants: the seed-42 5000-loan scenario.

use cecl_core::{
    config::SEGMENTS,
    dataset::{DatasetParams, PortfolioDataset},
};
use chrono::{Datelike, Months, NaiveDate};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
}

fn scenario() -> PortfolioDataset {
    PortfolioDataset::generate(DatasetParams::new(42, 5000, as_of()))
}

#[test]
fn generates_requested_count_with_known_segments() {
    let dataset = scenario();
    assert_eq!(dataset.loans().len(), 5000);
    for loan in dataset.loans() {
        assert!(
            SEGMENTS.contains(&loan.segment),
            "{}: segment outside the enumerated eight",
            loan.id
        );
    }
}

#[test]
fn balances_stay_in_the_drawdown_band() {
    for loan in scenario().loans() {
        assert!(
            loan.current_balance <= loan.original_balance,
            "{}: current balance exceeds original",
            loan.id
        );
        assert!(
            loan.current_balance >= 0.7 * loan.original_balance,
            "{}: current balance below 70% floor",
            loan.id
        );
        let bounds = loan.segment.config().balance_range;
        assert!(
            loan.original_balance >= bounds.0 && loan.original_balance <= bounds.1,
            "{}: original balance outside segment bounds",
            loan.id
        );
    }
}

#[test]
fn terms_scores_and_rates_stay_bounded() {
    for loan in scenario().loans() {
        let term_bounds = loan.segment.config().term_range;
        assert!(
            loan.term_months >= term_bounds.0 && loan.term_months <= term_bounds.1,
            "{}: term outside segment bounds",
            loan.id
        );
        assert!((580..=850).contains(&loan.credit_score), "{}: credit score", loan.id);
        assert!(
            loan.interest_rate >= 0.03 && loan.interest_rate < 0.12,
            "{}: rate out of band",
            loan.id
        );
        assert_eq!(
            loan.maturity_date,
            loan.origination_date + Months::new(loan.term_months as u32),
            "{}: maturity is not origination + term",
            loan.id
        );
        assert!(loan.origination_date < as_of(), "{}: future origination", loan.id);
    }
}

#[test]
fn charge_off_rate_sits_below_the_candidate_rate() {
    let dataset = scenario();
    let charged_off = dataset.loans().iter().filter(|l| l.charged_off).count();
    let rate = charged_off as f64 / dataset.loans().len() as f64;
    assert!(
        (0.0..=0.04).contains(&rate),
        "charge-off rate {rate} outside [0, 0.04]"
    );
    // The date-feasibility filter should leave some realized charge-offs.
    assert!(charged_off > 0, "scenario produced no charge-offs at all");
}

#[test]
fn charge_off_dates_respect_the_feasibility_window() {
    for loan in scenario().loans().iter().filter(|l| l.charged_off) {
        let date = loan.charge_off_date.expect("charged-off loan without date");
        let amount = loan.charge_off_amount.expect("charged-off loan without amount");

        assert!(loan.origination_date < date, "{}: charge-off before origination", loan.id);
        assert!(date < as_of(), "{}: charge-off in the future", loan.id);

        let offset = (date.year() - loan.origination_date.year()) * 12
            + date.month() as i32
            - loan.origination_date.month() as i32;
        let cap = loan.term_months.min(48);
        assert!(
            (6..=cap as i32).contains(&offset),
            "{}: charge-off month offset {offset} outside [6, {cap}]",
            loan.id
        );

        assert!(
            amount >= 0.3 * loan.original_balance && amount <= 0.8 * loan.original_balance,
            "{}: charge-off amount outside [0.3, 0.8] x original",
            loan.id
        );
    }
}

#[test]
fn performing_loans_carry_no_charge_off_fields() {
    for loan in scenario().loans().iter().filter(|l| !l.charged_off) {
        assert!(loan.charge_off_date.is_none(), "{}: stray charge-off date", loan.id);
        assert!(loan.charge_off_amount.is_none(), "{}: stray charge-off amount", loan.id);
    }
}
