//! Period-over-period comparison of line items.
//!
//! Fixed charges are compared on their canonical label with an outer join
//! (a charge missing in one month counts as 0). Variable charges are only
//! compared when the installment-stripped label shows up in both months;
//! the rest are reported as new.

use condo_core::{ChargeKind, LineItem, sort_periods};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::LedgerConfig;
use crate::label_rules::{ChargeClassifier, LabelRules};

/// Percent reported for a fixed charge that was 0 last period
pub const NEW_ITEM_PERCENT: f64 = 999.99;

pub const OTHERS_LABEL: &str = "Outros";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDelta {
    pub label: String,
    pub previous: f64,
    pub current: f64,
    pub difference: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsDelta {
    pub previous: f64,
    pub current: f64,
    pub difference: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub current_period: String,
    pub previous_period: String,
    pub fixed: Vec<ItemDelta>,
    pub variable: Vec<ItemDelta>,
    pub new_variable: Vec<LineItem>,
    pub totals: TotalsDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub period: String,
    pub total: f64,
    /// Change against the preceding period; `None` for the first period or after a zero total
    pub change_pct: Option<f64>,
}

/// One slice of a period's composition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub amount: f64,
    pub share_pct: f64,
}

/// The two most recent distinct periods as `(current, previous)`
pub fn latest_two_periods(items: &[LineItem]) -> Option<(String, String)> {
    let periods = sort_periods(items.iter().map(|i| i.period.as_str()));
    match periods.as_slice() {
        [.., previous, current] => Some((current.clone(), previous.clone())),
        _ => None,
    }
}

fn period_total(items: &[LineItem], period: &str) -> f64 {
    items
        .iter()
        .filter(|i| i.period == period)
        .map(|i| i.amount)
        .sum()
}

fn percent_of(difference: f64, base: f64) -> f64 {
    if base != 0.0 { difference / base * 100.0 } else { 0.0 }
}

/// Sum amounts per canonical label for one period and kind
fn grouped(
    items: &[LineItem],
    period: &str,
    kind: ChargeKind,
    classifier: &ChargeClassifier,
    rules: &LabelRules,
) -> BTreeMap<String, f64> {
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    for item in items.iter().filter(|i| i.period == period) {
        if classifier.classify(&item.label) != kind {
            continue;
        }
        *out.entry(rules.normalize(&item.label)).or_insert(0.0) += item.amount;
    }
    out
}

fn sort_by_difference(deltas: &mut [ItemDelta]) {
    deltas.sort_by(|a, b| {
        b.difference
            .total_cmp(&a.difference)
            .then_with(|| a.label.cmp(&b.label))
    });
}

/// Compare `current` against `previous` across all `items`.
pub fn compare_periods(
    items: &[LineItem],
    current: &str,
    previous: &str,
    cfg: &LedgerConfig,
    rules: &LabelRules,
) -> PeriodComparison {
    let classifier = ChargeClassifier::from_config(cfg);

    let fixed_cur = grouped(items, current, ChargeKind::Fixed, &classifier, rules);
    let fixed_prev = grouped(items, previous, ChargeKind::Fixed, &classifier, rules);
    let labels: BTreeSet<&String> = fixed_cur.keys().chain(fixed_prev.keys()).collect();

    let mut fixed: Vec<ItemDelta> = labels
        .into_iter()
        .map(|label| {
            let cur = fixed_cur.get(label).copied().unwrap_or(0.0);
            let prev = fixed_prev.get(label).copied().unwrap_or(0.0);
            let difference = cur - prev;
            let percent = if prev != 0.0 {
                difference / prev * 100.0
            } else if cur > 0.0 {
                NEW_ITEM_PERCENT
            } else {
                0.0
            };
            ItemDelta {
                label: label.clone(),
                previous: prev,
                current: cur,
                difference,
                percent,
            }
        })
        .collect();
    sort_by_difference(&mut fixed);

    let var_cur = grouped(items, current, ChargeKind::Variable, &classifier, rules);
    let var_prev = grouped(items, previous, ChargeKind::Variable, &classifier, rules);

    let mut variable: Vec<ItemDelta> = var_cur
        .iter()
        .filter_map(|(label, &cur)| {
            let prev = *var_prev.get(label)?;
            let difference = cur - prev;
            Some(ItemDelta {
                label: label.clone(),
                previous: prev,
                current: cur,
                difference,
                percent: percent_of(difference, prev),
            })
        })
        .collect();
    sort_by_difference(&mut variable);

    let new_variable: Vec<LineItem> = items
        .iter()
        .filter(|i| i.period == current)
        .filter(|i| classifier.classify(&i.label) == ChargeKind::Variable)
        .filter(|i| !var_prev.contains_key(&rules.normalize(&i.label)))
        .cloned()
        .collect();

    let total_cur = period_total(items, current);
    let total_prev = period_total(items, previous);
    let totals = TotalsDelta {
        previous: total_prev,
        current: total_cur,
        difference: total_cur - total_prev,
        percent: percent_of(total_cur - total_prev, total_prev),
    };

    PeriodComparison {
        current_period: current.to_string(),
        previous_period: previous.to_string(),
        fixed,
        variable,
        new_variable,
        totals,
    }
}

/// Per-period totals in period order, with percent change
pub fn monthly_totals(items: &[LineItem]) -> Vec<MonthlyTotal> {
    let mut out: Vec<MonthlyTotal> = Vec::new();
    for period in sort_periods(items.iter().map(|i| i.period.as_str())) {
        let total = period_total(items, &period);
        let change_pct = match out.last() {
            Some(prev) if prev.total != 0.0 => Some((total - prev.total) / prev.total * 100.0),
            _ => None,
        };
        out.push(MonthlyTotal {
            period,
            total,
            change_pct,
        });
    }
    out
}

/// Break one period into slices, folding items under `threshold_pct` of
/// the total into a single "Outros" slice.
pub fn composition(items: &[LineItem], period: &str, threshold_pct: f64) -> Vec<Slice> {
    let total = period_total(items, period);
    if total == 0.0 {
        return Vec::new();
    }

    let mut slices = Vec::new();
    let mut others = 0.0;
    let mut folded = 0usize;

    for item in items.iter().filter(|i| i.period == period) {
        let share_pct = item.amount / total * 100.0;
        if share_pct >= threshold_pct {
            slices.push(Slice {
                label: item.label.clone(),
                amount: item.amount,
                share_pct,
            });
        } else {
            others += item.amount;
            folded += 1;
        }
    }

    if folded > 0 {
        slices.push(Slice {
            label: OTHERS_LABEL.to_string(),
            amount: others,
            share_pct: others / total * 100.0,
        });
    }
    slices
}
