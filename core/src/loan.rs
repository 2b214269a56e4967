//! Synthetic loan population generation.
//!
//! RULE: the draw order inside the per-loan loop is part of the
//! determinism contract. Changing it changes every dataset generated
//! from an existing seed. Extend at the end of the loop only.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use crate::{
    config::{GeneratorConfig, Segment, SEGMENTS, SEGMENT_CONFIGS, US_STATES},
    rng::{LcgRng, StreamSlot},
    types::{LoanId, StateCode},
};

/// Origination dates are drawn uniformly from this many days before as-of.
const ORIGINATION_WINDOW_DAYS: i64 = 5 * 365;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    pub id: LoanId,
    pub segment: Segment,
    pub state: StateCode,
    pub origination_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub term_months: i64,
    pub original_balance: f64,
    pub current_balance: f64,
    pub interest_rate: f64,
    pub credit_score: i64,
    pub charged_off: bool,
    pub charge_off_date: Option<NaiveDate>,
    pub charge_off_amount: Option<f64>,
}

/// Generate the synthetic loan population.
///
/// Runs on the Loans stream seed derived from `master_seed`, so the
/// same (seed, count, as_of, config) always yields a byte-identical
/// population regardless of what the other generators have done.
pub fn generate_loans(
    count: usize,
    master_seed: u64,
    as_of: NaiveDate,
    config: &GeneratorConfig,
) -> Vec<Loan> {
    let mut rng = LcgRng::new(StreamSlot::Loans.seed_for(master_seed));
    let segment_weights: Vec<f64> = SEGMENT_CONFIGS.iter().map(|c| c.weight).collect();
    let state_weights: Vec<f64> = US_STATES.iter().map(|(_, w)| *w).collect();

    let mut loans = Vec::with_capacity(count);
    for index in 0..count {
        loans.push(generate_one(
            index,
            &mut rng,
            &segment_weights,
            &state_weights,
            as_of,
            config,
        ));
    }

    let charged_off = loans.iter().filter(|l| l.charged_off).count();
    log::debug!(
        "generated {} loans, {} charged off ({:.2}%)",
        loans.len(),
        charged_off,
        if loans.is_empty() { 0.0 } else { 100.0 * charged_off as f64 / loans.len() as f64 }
    );
    loans
}

fn generate_one(
    index: usize,
    rng: &mut LcgRng,
    segment_weights: &[f64],
    state_weights: &[f64],
    as_of: NaiveDate,
    config: &GeneratorConfig,
) -> Loan {
    let segment = *rng.weighted_pick(&SEGMENTS, segment_weights);
    let params = segment.config();

    let original_balance = rng.between(params.balance_range.0, params.balance_range.1);
    let term_months = rng.int_between(params.term_range.0, params.term_range.1);

    let days_back = rng.int_between(1, ORIGINATION_WINDOW_DAYS);
    let origination_date = as_of - Days::new(days_back as u64);
    let maturity_date = origination_date + Months::new(term_months as u32);

    let current_balance = original_balance * rng.between(0.7, 1.0);
    let state = rng.weighted_pick(&US_STATES, state_weights).0;
    let credit_score = rng.int_between(580, 850);
    let interest_rate = rng.between(0.03, 0.12);

    // Charge-off candidacy is drawn for every loan; realization is
    // conditional on the drawn month landing before as-of, so the
    // realized rate sits a little under the candidate rate.
    let mut charged_off = false;
    let mut charge_off_date = None;
    let mut charge_off_amount = None;
    if rng.chance(config.charge_off_candidate_rate) {
        let month_cap = term_months.min(config.charge_off_month_max);
        let offset = rng.int_between(config.charge_off_month_min, month_cap);
        let candidate_date = origination_date + Months::new(offset as u32);
        if candidate_date < as_of {
            charged_off = true;
            charge_off_date = Some(candidate_date);
            charge_off_amount = Some(
                original_balance
                    * rng.between(config.charge_off_amount_range.0, config.charge_off_amount_range.1),
            );
        }
    }

    Loan {
        id: format!("LOAN-{:05}", index + 1),
        segment,
        state,
        origination_date,
        maturity_date,
        term_months,
        original_balance,
        current_balance,
        interest_rate,
        credit_score,
        charged_off,
        charge_off_date,
        charge_off_amount,
    }
}
