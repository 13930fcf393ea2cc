//! condo-ledger: record store, label normalization rules, and period-over-period comparison

pub mod compare;
pub mod config;
pub mod error;
pub mod label_rules;
pub mod store;

pub use compare::{
    ItemDelta, MonthlyTotal, PeriodComparison, Slice, TotalsDelta, compare_periods, composition,
    latest_two_periods, monthly_totals,
};
pub use config::{LabelRuleEntry, LedgerConfig};
pub use error::LedgerError;
pub use label_rules::{ChargeClassifier, LabelAction, LabelMatcher, LabelRule, LabelRules};
pub use store::{read_records, retain_plausible, write_records};
