//! Risk indicator.
//!
//! Bands, lower bound inclusive:
//!
//! | score        | level  | color  |
//! |--------------|--------|--------|
//! | `>= 0.7`     | high   | red    |
//! | `[0.4, 0.7)` | medium | orange |
//! | `< 0.4`      | low    | green  |
//!
//! A score that is not a number renders as unknown (grey).

use std::fmt;

pub const HIGH_THRESHOLD: f64 = 0.7;
pub const MEDIUM_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            RiskLevel::Unknown
        } else if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::High => "red",
            RiskLevel::Medium => "orange",
            RiskLevel::Low => "green",
            RiskLevel::Unknown => "grey",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A score plus everything needed to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskCard {
    pub score: f64,
}

impl RiskCard {
    pub fn new(score: f64) -> Self {
        Self { score }
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }

    /// Score as displayed, two decimals.
    pub fn score_text(&self) -> String {
        if self.score.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.2}", self.score)
        }
    }

    pub fn style(&self) -> String {
        format!("background-color: {}", self.level().color())
    }

    /// One-line terminal rendering, colored with ANSI escapes when `ansi` is set.
    pub fn render(&self, ansi: bool) -> String {
        let level = self.level();
        let line = format!("risk score {} [{}]", self.score_text(), level.label().to_uppercase());
        if !ansi {
            return line;
        }
        let code = match level {
            RiskLevel::High => "31",
            RiskLevel::Medium => "33",
            RiskLevel::Low => "32",
            RiskLevel::Unknown => "90",
        };
        format!("\x1b[{code}m{line}\x1b[0m")
    }
}
