//! Map a certainty factor to a display percentage and confidence label.

use serde::Serialize;
use std::fmt;

/// Prefix applied to the label of a negative certainty factor.
pub const NEGATIVE_PREFIX: &str = "Negative - ";

/// Confidence band for the magnitude of a CF, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    FairlyHigh,
    FairlyLow,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    /// Band for a percentage in [0, 100]. Boundaries are inclusive on the low end.
    pub fn from_percent(percent: f64) -> Self {
        match percent {
            p if p >= 90.0 => ConfidenceLevel::VeryHigh,
            p if p >= 80.0 => ConfidenceLevel::High,
            p if p >= 60.0 => ConfidenceLevel::FairlyHigh,
            p if p >= 40.0 => ConfidenceLevel::FairlyLow,
            p if p >= 20.0 => ConfidenceLevel::Low,
            _ => ConfidenceLevel::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryHigh   => "Very High",
            ConfidenceLevel::High       => "High",
            ConfidenceLevel::FairlyHigh => "Fairly High",
            ConfidenceLevel::FairlyLow  => "Fairly Low",
            ConfidenceLevel::Low        => "Low",
            ConfidenceLevel::VeryLow    => "Very Low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display form of a certainty factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CfLabel {
    /// |cf| × 100, rounded to 2 decimals.
    pub percent: f64,
    pub level: ConfidenceLevel,
    pub negative: bool,
}

impl CfLabel {
    /// Full label text, e.g. `"High"` or `"Negative - Fairly Low"`.
    pub fn text(&self) -> String {
        if self.negative {
            format!("{}{}", NEGATIVE_PREFIX, self.level)
        } else {
            self.level.to_string()
        }
    }
}

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Classify a certainty factor. Non-finite input is treated as 0.
pub fn classify(cf: f64) -> CfLabel {
    let cf = if cf.is_finite() { cf } else { 0.0 };
    let percent = (cf.abs() * 10_000.0).round() / 100.0;
    CfLabel {
        percent,
        level: ConfidenceLevel::from_percent(percent),
        negative: cf < 0.0,
    }
}

/// `(percent, label)` for a certainty factor.
pub fn cf_to_percent_and_label(cf: f64) -> (f64, String) {
    let label = classify(cf);
    (label.percent, label.text())
}
