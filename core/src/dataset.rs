//! The dataset composition root.
//!
//! RULE: there is no global cache. A PortfolioDataset is built once by
//! whoever owns the session (the runner, a test) and handed by
//! reference to the aggregation layer. One dataset = one stable,
//! immutable synthetic population; "the same data on every read" is an
//! ownership guarantee, not a memoization trick.
//!
//! Generation order is fixed: loans, then snapshots, then charge-off
//! trajectories. Later stages consume the loan set, but every stage
//! runs on its own seed stream, so the stages cannot perturb each
//! other's draws.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    chargeoff::{generate_charge_off_histories, ChargeOffHistory},
    config::GeneratorConfig,
    loan::{generate_loans, Loan},
    snapshot::{generate_snapshots, LoanMetricsSnapshot},
    types::Seed,
};

pub const DEFAULT_SEED: Seed = 42;
pub const DEFAULT_LOAN_COUNT: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetParams {
    pub seed: Seed,
    pub loan_count: usize,
    /// The reporting date every generated date is anchored to.
    pub as_of: NaiveDate,
    #[serde(default)]
    pub config: GeneratorConfig,
}

impl DatasetParams {
    pub fn new(seed: Seed, loan_count: usize, as_of: NaiveDate) -> Self {
        Self {
            seed,
            loan_count,
            as_of,
            config: GeneratorConfig::default(),
        }
    }
}

impl Default for DatasetParams {
    fn default() -> Self {
        Self::new(
            DEFAULT_SEED,
            DEFAULT_LOAN_COUNT,
            chrono::Utc::now().date_naive(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioDataset {
    params: DatasetParams,
    loans: Vec<Loan>,
    snapshots: Vec<LoanMetricsSnapshot>,
    charge_off_histories: Vec<ChargeOffHistory>,
}

impl PortfolioDataset {
    /// Run the full generation pipeline. Deterministic in `params`.
    pub fn generate(params: DatasetParams) -> Self {
        log::info!(
            "generating dataset: seed={} loans={} as_of={}",
            params.seed,
            params.loan_count,
            params.as_of
        );

        let loans =
            generate_loans(params.loan_count, params.seed, params.as_of, &params.config);
        let snapshots =
            generate_snapshots(&loans, params.seed, params.as_of, &params.config);
        let charge_off_histories =
            generate_charge_off_histories(&loans, params.seed, &params.config);

        Self {
            params,
            loans,
            snapshots,
            charge_off_histories,
        }
    }

    /// Assemble a dataset from pre-built parts. Used by tests and
    /// tooling that need hand-crafted populations; production code
    /// goes through `generate`.
    pub fn from_parts(
        params: DatasetParams,
        loans: Vec<Loan>,
        snapshots: Vec<LoanMetricsSnapshot>,
        charge_off_histories: Vec<ChargeOffHistory>,
    ) -> Self {
        Self {
            params,
            loans,
            snapshots,
            charge_off_histories,
        }
    }

    pub fn params(&self) -> &DatasetParams {
        &self.params
    }

    pub fn as_of(&self) -> NaiveDate {
        self.params.as_of
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn snapshots(&self) -> &[LoanMetricsSnapshot] {
        &self.snapshots
    }

    pub fn charge_off_histories(&self) -> &[ChargeOffHistory] {
        &self.charge_off_histories
    }
}
