//! Pre-charge-off risk trajectories.
//!
//! For a bounded subset of charged-off loans, a monthly history of the
//! 36 months leading into the charge-off. The escalation shape is the
//! contract the dashboard's early-warning views depend on:
//!   - PD ramps quadratically toward charge-off, capped at 0.95.
//!   - LGD ramps linearly, capped at 0.90.
//!   - Payment status deteriorates in fixed stages.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::{
    config::{GeneratorConfig, Segment},
    loan::Loan,
    rng::{LcgRng, StreamSlot},
    types::LoanId,
};

/// Ordered delinquency ladder. Later variants are strictly worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Current,
    Delinquent30,
    Delinquent60,
    Delinquent90,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRiskPoint {
    /// Months relative to charge-off: -36..=0.
    pub month_offset: i32,
    pub date: NaiveDate,
    pub pd: f64,
    pub lgd: f64,
    pub portfolio_value: f64,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeOffHistory {
    pub loan_id: LoanId,
    pub segment: Segment,
    pub charge_off_date: NaiveDate,
    pub charge_off_amount: f64,
    /// Exactly history_months + 1 points, offset -36 through 0.
    pub monthly: Vec<MonthlyRiskPoint>,
}

/// Generate trajectories for the first `history_limit` charged-off
/// loans in original iteration order. The order is part of the
/// determinism contract — never re-sort the input before slicing.
pub fn generate_charge_off_histories(
    loans: &[Loan],
    master_seed: u64,
    config: &GeneratorConfig,
) -> Vec<ChargeOffHistory> {
    let mut rng = LcgRng::new(StreamSlot::ChargeOffs.seed_for(master_seed));

    let histories: Vec<ChargeOffHistory> = loans
        .iter()
        .filter(|l| l.charged_off)
        .take(config.history_limit)
        .filter_map(|loan| build_history(loan, &mut rng, config))
        .collect();

    log::debug!("generated {} charge-off trajectories", histories.len());
    histories
}

fn build_history(
    loan: &Loan,
    rng: &mut LcgRng,
    config: &GeneratorConfig,
) -> Option<ChargeOffHistory> {
    // Charged-off loans always carry both fields; a loan without them
    // was never realized and gets no trajectory.
    let charge_off_date = loan.charge_off_date?;
    let charge_off_amount = loan.charge_off_amount?;

    let params = loan.segment.config();
    let span = config.history_months;
    let mut monthly = Vec::with_capacity(span as usize + 1);

    for months_before in (0..=span).rev() {
        let progress = 1.0 - months_before as f64 / span as f64;
        let pd_multiplier = 1.0 + progress * progress * config.ramp_pd_height;
        let lgd_multiplier = 1.0 + progress * config.ramp_lgd_height;

        let pd = (params.avg_pd() * pd_multiplier * rng.between(0.8, 1.2))
            .min(config.ramp_pd_cap);
        let lgd = (params.avg_lgd() * lgd_multiplier * rng.between(0.9, 1.1))
            .min(config.ramp_lgd_cap);
        let portfolio_value = loan.current_balance * rng.between(0.95, 1.02);

        monthly.push(MonthlyRiskPoint {
            month_offset: -(months_before as i32),
            date: charge_off_date - Months::new(months_before as u32),
            pd,
            lgd,
            portfolio_value,
            payment_status: status_for(months_before, rng),
        });
    }

    Some(ChargeOffHistory {
        loan_id: loan.id.clone(),
        segment: loan.segment,
        charge_off_date,
        charge_off_amount,
        monthly,
    })
}

/// Staged delinquency thresholds, months before charge-off.
fn status_for(months_before: i64, rng: &mut LcgRng) -> PaymentStatus {
    if months_before <= 3 {
        PaymentStatus::Delinquent90
    } else if months_before <= 6 {
        PaymentStatus::Delinquent60
    } else if months_before <= 12 && rng.chance(0.7) {
        PaymentStatus::Delinquent30
    } else {
        PaymentStatus::Current
    }
}
