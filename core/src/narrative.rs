//! AI narrative report client.
//!
//! A thin, stateless proxy to an external chat-completion API. The
//! aggregates are flattened to key/value lines, wrapped in a prompt
//! template, and POSTed once. No credential, a non-success status, or
//! a transport error all degrade the same way: log a warning and hand
//! back the canned local narrative flagged `ai_generated = false`.
//! One attempt, no retry, never an error to the caller.

use std::fmt::Write as _;
use std::time::Duration;

use serde_json::json;

use crate::{
    aggregation::{GeographicSummary, PortfolioMetrics, ReportData, SegmentMetrics},
    error::CoreResult,
};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are a senior credit-risk analyst. Write a concise \
CECL portfolio commentary from the metrics provided: overall health, loss outlook, \
segment and geographic concentration, and any warning signals. Plain prose, no lists.";

#[derive(Debug, Clone)]
pub struct NarrativeReport {
    pub text: String,
    /// False when the text is the local fallback narrative.
    pub ai_generated: bool,
}

pub struct NarrativeClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl NarrativeClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Credential and overrides from CECL_AI_API_KEY, CECL_AI_ENDPOINT,
    /// CECL_AI_MODEL. Missing key means fallback-only operation.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("CECL_AI_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.into()),
            std::env::var("CECL_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            std::env::var("CECL_AI_API_KEY").ok(),
        )
    }

    pub fn generate(&self, report: &ReportData) -> NarrativeReport {
        let Some(api_key) = &self.api_key else {
            log::warn!("no AI credential configured, using fallback narrative");
            return NarrativeReport {
                text: fallback_narrative(report),
                ai_generated: false,
            };
        };

        match self.request(api_key, report) {
            Ok(text) => NarrativeReport {
                text,
                ai_generated: true,
            },
            Err(err) => {
                log::warn!("narrative request failed, using fallback: {err}");
                NarrativeReport {
                    text: fallback_narrative(report),
                    ai_generated: false,
                }
            }
        }
    }

    fn request(&self, api_key: &str, report: &ReportData) -> CoreResult<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format_report_for_prompt(report) },
            ],
        });

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()?
            .error_for_status()?;

        let payload: serde_json::Value = response.json()?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("completion response carried no text").into())
    }
}

/// Flatten the report to `key: value` lines for the prompt body.
pub fn format_report_for_prompt(report: &ReportData) -> String {
    let mut out = String::new();
    match report {
        ReportData::Portfolio {
            portfolio,
            segments,
            geography,
        } => {
            let _ = writeln!(out, "report_scope: portfolio");
            write_portfolio(&mut out, portfolio);
            write_geography(&mut out, geography);
            for metrics in segments {
                write_segment(&mut out, metrics);
            }
        }
        ReportData::Segment {
            portfolio,
            segment,
            geography,
        } => {
            let _ = writeln!(out, "report_scope: segment");
            let _ = writeln!(out, "focus_segment: {}", segment.label);
            write_portfolio(&mut out, portfolio);
            write_geography(&mut out, geography);
            write_segment(&mut out, segment);
        }
    }
    out
}

fn write_portfolio(out: &mut String, m: &PortfolioMetrics) {
    let _ = writeln!(out, "portfolio_loan_count: {}", m.loan_count);
    let _ = writeln!(out, "portfolio_total_exposure_usd: {:.2}", m.total_exposure);
    let _ = writeln!(out, "portfolio_avg_pd: {:.4}", m.avg_pd);
    let _ = writeln!(out, "portfolio_avg_lgd: {:.4}", m.avg_lgd);
    let _ = writeln!(out, "portfolio_expected_loss_usd: {:.2}", m.total_expected_loss);
    let _ = writeln!(out, "portfolio_charge_off_rate: {:.4}", m.charge_off_rate);
}

fn write_segment(out: &mut String, m: &SegmentMetrics) {
    let key = m.segment.id();
    let _ = writeln!(out, "{key}_loan_count: {}", m.loan_count);
    let _ = writeln!(out, "{key}_total_exposure_usd: {:.2}", m.total_exposure);
    let _ = writeln!(out, "{key}_avg_pd: {:.4}", m.avg_pd);
    let _ = writeln!(out, "{key}_avg_lgd: {:.4}", m.avg_lgd);
    let _ = writeln!(out, "{key}_expected_loss_usd: {:.2}", m.total_expected_loss);
    let _ = writeln!(out, "{key}_charge_off_rate: {:.4}", m.charge_off_rate);
    let _ = writeln!(out, "{key}_exposure_share_pct: {:.2}", m.exposure_share_pct);
}

fn write_geography(out: &mut String, g: &GeographicSummary) {
    let _ = writeln!(out, "geographic_hhi: {:.1}", g.hhi);
    let _ = writeln!(out, "geographic_top3_share_pct: {:.2}", g.top3_share_pct);
    let _ = writeln!(out, "geographic_state_count: {}", g.state_count);
}

/// The deterministic local narrative used whenever the external call
/// is unavailable. Callers surface `ai_generated = false` so the UI
/// can show its mock-data indicator.
pub fn fallback_narrative(report: &ReportData) -> String {
    let (portfolio, geography, focus) = match report {
        ReportData::Portfolio {
            portfolio, geography, ..
        } => (portfolio, geography, None),
        ReportData::Segment {
            portfolio,
            geography,
            segment,
        } => (portfolio, geography, Some(segment)),
    };

    let mut text = format!(
        "Portfolio commentary (locally generated). The portfolio holds {} loans with \
total exposure of ${:.0}. Weighted by each loan's latest quarterly snapshot, average \
probability of default stands at {:.2}% with loss given default at {:.1}%, implying \
expected credit losses of ${:.0}. The realized charge-off rate is {:.2}%. Geographic \
concentration is {} (HHI {:.0}), with the three largest states holding {:.1}% of \
exposure across {} states.",
        portfolio.loan_count,
        portfolio.total_exposure,
        portfolio.avg_pd * 100.0,
        portfolio.avg_lgd * 100.0,
        portfolio.total_expected_loss,
        portfolio.charge_off_rate * 100.0,
        if geography.hhi > 1800.0 { "elevated" } else { "moderate" },
        geography.hhi,
        geography.top3_share_pct,
        geography.state_count,
    );

    if let Some(segment) = focus {
        let _ = write!(
            text,
            " Within {}, {} loans carry ${:.0} of exposure ({:.1}% of the portfolio) at \
an average PD of {:.2}% and LGD of {:.1}%, for expected losses of ${:.0}.",
            segment.label,
            segment.loan_count,
            segment.total_exposure,
            segment.exposure_share_pct,
            segment.avg_pd * 100.0,
            segment.avg_lgd * 100.0,
            segment.total_expected_loss,
        );
    }
    text
}
