//! Static reference data and generation parameters.
//!
//! Segment risk parameters and the state population table are fixed
//! reference tables — every generated value is bounded by them.
//! The stylized-cycle constants (stress window, escalation ramps) live
//! in GeneratorConfig so a runner can override them from JSON without
//! touching generator code.

use serde::{Deserialize, Serialize};

use crate::types::StateCode;

/// The eight loan segments in the synthetic portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    ResidentialMortgage,
    HomeEquity,
    AutoLoan,
    CreditCard,
    PersonalLoan,
    SmallBusiness,
    CommercialRealEstate,
    CommercialIndustrial,
}

pub const SEGMENTS: [Segment; 8] = [
    Segment::ResidentialMortgage,
    Segment::HomeEquity,
    Segment::AutoLoan,
    Segment::CreditCard,
    Segment::PersonalLoan,
    Segment::SmallBusiness,
    Segment::CommercialRealEstate,
    Segment::CommercialIndustrial,
];

impl Segment {
    pub fn id(&self) -> &'static str {
        match self {
            Self::ResidentialMortgage => "residential_mortgage",
            Self::HomeEquity => "home_equity",
            Self::AutoLoan => "auto_loan",
            Self::CreditCard => "credit_card",
            Self::PersonalLoan => "personal_loan",
            Self::SmallBusiness => "small_business",
            Self::CommercialRealEstate => "commercial_real_estate",
            Self::CommercialIndustrial => "commercial_industrial",
        }
    }

    pub fn label(&self) -> &'static str {
        self.config().label
    }

    pub fn from_id(id: &str) -> Option<Segment> {
        SEGMENTS.iter().copied().find(|s| s.id() == id)
    }

    pub fn config(&self) -> &'static SegmentConfig {
        &SEGMENT_CONFIGS[SEGMENTS.iter().position(|s| s == self).unwrap_or(0)]
    }
}

/// Per-segment risk-parameter bounds. Never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentConfig {
    pub segment: Segment,
    pub label: &'static str,
    /// Relative generation weight; raw, not normalized.
    pub weight: f64,
    pub pd_range: (f64, f64),
    pub lgd_range: (f64, f64),
    /// Original balance bounds, dollars.
    pub balance_range: (f64, f64),
    /// Term bounds, months.
    pub term_range: (i64, i64),
}

impl SegmentConfig {
    /// Midpoint of the PD range — the segment's through-the-cycle average.
    pub fn avg_pd(&self) -> f64 {
        (self.pd_range.0 + self.pd_range.1) / 2.0
    }

    pub fn avg_lgd(&self) -> f64 {
        (self.lgd_range.0 + self.lgd_range.1) / 2.0
    }
}

/// Indexed in the same order as SEGMENTS.
pub static SEGMENT_CONFIGS: [SegmentConfig; 8] = [
    SegmentConfig {
        segment: Segment::ResidentialMortgage,
        label: "Residential Mortgage",
        weight: 20.0,
        pd_range: (0.005, 0.020),
        lgd_range: (0.15, 0.35),
        balance_range: (150_000.0, 600_000.0),
        term_range: (180, 360),
    },
    SegmentConfig {
        segment: Segment::HomeEquity,
        label: "Home Equity",
        weight: 8.0,
        pd_range: (0.010, 0.030),
        lgd_range: (0.20, 0.40),
        balance_range: (25_000.0, 150_000.0),
        term_range: (60, 240),
    },
    SegmentConfig {
        segment: Segment::AutoLoan,
        label: "Auto Loan",
        weight: 18.0,
        pd_range: (0.015, 0.040),
        lgd_range: (0.35, 0.55),
        balance_range: (15_000.0, 60_000.0),
        term_range: (36, 72),
    },
    SegmentConfig {
        segment: Segment::CreditCard,
        label: "Credit Card",
        weight: 15.0,
        pd_range: (0.030, 0.080),
        lgd_range: (0.65, 0.85),
        balance_range: (2_000.0, 25_000.0),
        term_range: (12, 60),
    },
    SegmentConfig {
        segment: Segment::PersonalLoan,
        label: "Personal Loan",
        weight: 10.0,
        pd_range: (0.025, 0.060),
        lgd_range: (0.55, 0.80),
        balance_range: (5_000.0, 40_000.0),
        term_range: (24, 60),
    },
    SegmentConfig {
        segment: Segment::SmallBusiness,
        label: "Small Business",
        weight: 12.0,
        pd_range: (0.020, 0.050),
        lgd_range: (0.40, 0.60),
        balance_range: (50_000.0, 500_000.0),
        term_range: (36, 120),
    },
    SegmentConfig {
        segment: Segment::CommercialRealEstate,
        label: "Commercial Real Estate",
        weight: 9.0,
        pd_range: (0.010, 0.030),
        lgd_range: (0.25, 0.45),
        balance_range: (500_000.0, 5_000_000.0),
        term_range: (60, 240),
    },
    SegmentConfig {
        segment: Segment::CommercialIndustrial,
        label: "Commercial & Industrial",
        weight: 8.0,
        pd_range: (0.015, 0.045),
        lgd_range: (0.30, 0.50),
        balance_range: (250_000.0, 3_000_000.0),
        term_range: (36, 84),
    },
];

/// (state code, population weight in millions, 2020-census rounded).
/// Used for population-weighted geography draws. 50 states + DC.
pub static US_STATES: [(StateCode, f64); 51] = [
    ("AL", 5.0),
    ("AK", 0.7),
    ("AZ", 7.2),
    ("AR", 3.0),
    ("CA", 39.5),
    ("CO", 5.8),
    ("CT", 3.6),
    ("DE", 1.0),
    ("DC", 0.7),
    ("FL", 21.5),
    ("GA", 10.7),
    ("HI", 1.5),
    ("ID", 1.8),
    ("IL", 12.8),
    ("IN", 6.8),
    ("IA", 3.2),
    ("KS", 2.9),
    ("KY", 4.5),
    ("LA", 4.7),
    ("ME", 1.4),
    ("MD", 6.2),
    ("MA", 7.0),
    ("MI", 10.1),
    ("MN", 5.7),
    ("MS", 3.0),
    ("MO", 6.2),
    ("MT", 1.1),
    ("NE", 2.0),
    ("NV", 3.1),
    ("NH", 1.4),
    ("NJ", 9.3),
    ("NM", 2.1),
    ("NY", 20.2),
    ("NC", 10.4),
    ("ND", 0.8),
    ("OH", 11.8),
    ("OK", 4.0),
    ("OR", 4.2),
    ("PA", 13.0),
    ("RI", 1.1),
    ("SC", 5.1),
    ("SD", 0.9),
    ("TN", 6.9),
    ("TX", 29.1),
    ("UT", 3.3),
    ("VT", 0.6),
    ("VA", 8.6),
    ("WA", 7.7),
    ("WV", 1.8),
    ("WI", 5.9),
    ("WY", 0.6),
];

/// Tunable generation constants. Defaults reproduce the stylized
/// economic cycle the dashboard renders: a five-quarter stress window
/// in the middle of the snapshot grid, and a quadratic-PD / linear-LGD
/// escalation ramp ahead of charge-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of quarter-end snapshot dates, newest anchored at as-of.
    pub quarter_count: usize,
    /// Inclusive index bounds of the stress window within the quarter grid.
    pub stress_window: (usize, usize),
    pub stress_pd_multiplier: f64,
    pub stress_pd_cap: f64,
    pub stress_lgd_multiplier: f64,
    pub stress_lgd_cap: f64,
    /// Probability a loan is drawn as a charge-off candidate.
    pub charge_off_candidate_rate: f64,
    /// Candidate charge-off month offset bounds from origination.
    pub charge_off_month_min: i64,
    pub charge_off_month_max: i64,
    /// Charge-off amount as a fraction of original balance.
    pub charge_off_amount_range: (f64, f64),
    /// Months of pre-charge-off history per trajectory.
    pub history_months: i64,
    /// At most this many charged-off loans get a trajectory.
    pub history_limit: usize,
    /// Height of the quadratic PD ramp at charge-off.
    pub ramp_pd_height: f64,
    pub ramp_pd_cap: f64,
    /// Height of the linear LGD ramp at charge-off.
    pub ramp_lgd_height: f64,
    pub ramp_lgd_cap: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            quarter_count: 20,
            stress_window: (8, 12),
            stress_pd_multiplier: 1.5,
            stress_pd_cap: 0.25,
            stress_lgd_multiplier: 1.2,
            stress_lgd_cap: 0.85,
            charge_off_candidate_rate: 0.04,
            charge_off_month_min: 6,
            charge_off_month_max: 48,
            charge_off_amount_range: (0.3, 0.8),
            history_months: 36,
            history_limit: 200,
            ramp_pd_height: 4.0,
            ramp_pd_cap: 0.95,
            ramp_lgd_height: 0.5,
            ramp_lgd_cap: 0.90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_configs_align_with_segment_order() {
        for (i, segment) in SEGMENTS.iter().enumerate() {
            assert_eq!(SEGMENT_CONFIGS[i].segment, *segment);
            assert_eq!(segment.config().segment, *segment);
        }
    }

    #[test]
    fn segment_ids_round_trip() {
        for segment in SEGMENTS {
            assert_eq!(Segment::from_id(segment.id()), Some(segment));
        }
        assert_eq!(Segment::from_id("yacht_finance"), None);
    }

    #[test]
    fn risk_ranges_are_ordered_and_bounded() {
        for config in &SEGMENT_CONFIGS {
            assert!(config.pd_range.0 < config.pd_range.1);
            assert!(config.lgd_range.0 < config.lgd_range.1);
            assert!(config.pd_range.1 <= 0.10, "{}: PD range too hot", config.label);
            assert!(config.lgd_range.1 <= 1.0);
            assert!(config.term_range.0 >= 12);
        }
    }

    #[test]
    fn default_generator_config_survives_json_round_trip() {
        let config = GeneratorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stress_window, (8, 12));
        assert_eq!(back.history_limit, 200);
    }

    #[test]
    fn partial_config_json_falls_back_to_defaults() {
        let back: GeneratorConfig = serde_json::from_str(r#"{"history_limit": 50}"#).unwrap();
        assert_eq!(back.history_limit, 50);
        assert_eq!(back.quarter_count, 20);
    }
}
