//! Shared primitive types used across the entire crate.

/// A stable, unique loan identifier, e.g. "LOAN-00042".
pub type LoanId = String;

/// Two-letter US state or district code, e.g. "CA".
pub type StateCode = &'static str;

/// The dataset master seed.
pub type Seed = u64;
