//! Backtesting error statistics and cohort escalation curves.
//!
//! Descriptive statistics over parallel predicted/actual series, plus
//! per-month cohort aggregates across charge-off trajectories. Empty
//! inputs produce the zero record; the only typed failure is a length
//! mismatch between the two series.

use serde::Serialize;

use crate::{
    chargeoff::ChargeOffHistory,
    error::{CoreError, CoreResult},
};

/// Percent-error threshold a point must beat to count as accurate.
pub const ACCURACY_THRESHOLD_PCT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestStats {
    /// Mean absolute error.
    pub mae: f64,
    /// Root-mean-square error.
    pub rmse: f64,
    /// Mean absolute percent error, averaged per point over
    /// |actual - predicted| / predicted x 100. Points with a zero
    /// prediction are excluded from this average only.
    pub mape: f64,
    /// Mean signed error, actual - predicted.
    pub bias: f64,
    /// Percent of points within ACCURACY_THRESHOLD_PCT.
    pub accuracy: f64,
    pub sample_count: usize,
}

impl BacktestStats {
    pub fn zero() -> Self {
        Self {
            mae: 0.0,
            rmse: 0.0,
            mape: 0.0,
            bias: 0.0,
            accuracy: 0.0,
            sample_count: 0,
        }
    }
}

pub fn backtest_stats(predicted: &[f64], actual: &[f64]) -> CoreResult<BacktestStats> {
    if predicted.len() != actual.len() {
        return Err(CoreError::SeriesLengthMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }
    if predicted.is_empty() {
        return Ok(BacktestStats::zero());
    }

    let n = predicted.len() as f64;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut signed_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut pct_count = 0usize;
    let mut within = 0usize;

    for (&p, &a) in predicted.iter().zip(actual) {
        let error = a - p;
        abs_sum += error.abs();
        sq_sum += error * error;
        signed_sum += error;
        if p != 0.0 {
            let pct = (error.abs() / p.abs()) * 100.0;
            pct_sum += pct;
            pct_count += 1;
            if pct <= ACCURACY_THRESHOLD_PCT {
                within += 1;
            }
        } else if error == 0.0 {
            // Zero predicted, zero actual: a perfect point with no
            // defined percent error.
            within += 1;
        }
    }

    Ok(BacktestStats {
        mae: abs_sum / n,
        rmse: (sq_sum / n).sqrt(),
        mape: if pct_count > 0 { pct_sum / pct_count as f64 } else { 0.0 },
        bias: signed_sum / n,
        accuracy: 100.0 * within as f64 / n,
        sample_count: predicted.len(),
    })
}

/// PD/LGD aggregates for one months-before-charge-off bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortBucket {
    /// Months before charge-off, 36 down to 0.
    pub months_before: i64,
    pub avg_pd: f64,
    pub min_pd: f64,
    pub max_pd: f64,
    pub avg_lgd: f64,
    pub min_lgd: f64,
    pub max_lgd: f64,
    pub sample_count: usize,
}

impl CohortBucket {
    fn zero(months_before: i64) -> Self {
        Self {
            months_before,
            avg_pd: 0.0,
            min_pd: 0.0,
            max_pd: 0.0,
            avg_lgd: 0.0,
            min_lgd: 0.0,
            max_lgd: 0.0,
            sample_count: 0,
        }
    }
}

/// Aggregate the escalation curve across trajectories, one bucket per
/// month offset from -span to 0, ordered oldest to newest. Buckets a
/// short trajectory never reaches come back zeroed, never NaN.
pub fn cohort_curves(histories: &[ChargeOffHistory], span: i64) -> Vec<CohortBucket> {
    let mut buckets = Vec::with_capacity(span as usize + 1);
    for months_before in (0..=span).rev() {
        let offset = -(months_before as i32);
        let mut pd_sum = 0.0;
        let mut lgd_sum = 0.0;
        let mut min_pd = f64::MAX;
        let mut max_pd = f64::MIN;
        let mut min_lgd = f64::MAX;
        let mut max_lgd = f64::MIN;
        let mut count = 0usize;

        for history in histories {
            for point in history.monthly.iter().filter(|p| p.month_offset == offset) {
                pd_sum += point.pd;
                lgd_sum += point.lgd;
                min_pd = min_pd.min(point.pd);
                max_pd = max_pd.max(point.pd);
                min_lgd = min_lgd.min(point.lgd);
                max_lgd = max_lgd.max(point.lgd);
                count += 1;
            }
        }

        buckets.push(if count == 0 {
            CohortBucket::zero(months_before)
        } else {
            CohortBucket {
                months_before,
                avg_pd: pd_sum / count as f64,
                min_pd,
                max_pd,
                avg_lgd: lgd_sum / count as f64,
                min_lgd,
                max_lgd,
                sample_count: count,
            }
        });
    }
    buckets
}
