//! Line-item record types produced by the bill scanner

use serde::{Deserialize, Serialize};

/// One billed charge recovered from a bill's itemized section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Opaque period key stamped by the caller (usually `YYYY_MM`)
    pub period: String,
    /// Charge name as printed, after leader-dot and whitespace cleanup
    pub label: String,
    /// Charge amount; the source text always carries two decimals
    pub amount: f64,
}

impl LineItem {
    pub fn new(period: impl Into<String>, label: impl Into<String>, amount: f64) -> Self {
        Self {
            period: period.into(),
            label: label.into(),
            amount,
        }
    }
}

/// Whether a charge recurs every month with a stable name or varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeKind {
    Fixed,
    Variable,
}

impl ChargeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeKind::Fixed => "fixed",
            ChargeKind::Variable => "variable",
        }
    }
}
