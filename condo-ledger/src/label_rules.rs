//! Deterministic label rules mapping printed charge names to the canonical
//! label used as the join key across periods.
//!
//! Bills print the same charge slightly differently month to month
//! ("Consumo Agua 12m3" vs "Consumo Água 9m3", "Pintura 1/3" vs "Pintura 2/3").
//! Rules are tried in order; the first matching rule rewrites the label.

use condo_core::ChargeKind;
use regex::Regex;

use crate::config::{LabelRuleEntry, LedgerConfig};
use crate::error::LedgerError;

#[derive(Debug, Clone)]
pub enum LabelMatcher {
    /// Label contains any of these substrings
    Contains(Vec<String>),
    Pattern(Regex),
}

impl LabelMatcher {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            LabelMatcher::Contains(needles) => needles.iter().any(|n| label.contains(n.as_str())),
            LabelMatcher::Pattern(re) => re.is_match(label),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LabelAction {
    /// Replace the whole label
    Canonical(String),
    /// Delete every match of the pattern, then trim
    Strip(Regex),
}

#[derive(Debug, Clone)]
pub struct LabelRule {
    pub matcher: LabelMatcher,
    pub action: LabelAction,
}

impl LabelRule {
    pub fn canonical(needles: &[&str], label: &str) -> Self {
        Self {
            matcher: LabelMatcher::Contains(needles.iter().map(|s| s.to_string()).collect()),
            action: LabelAction::Canonical(label.to_string()),
        }
    }

    /// Strip `pattern` from any label it matches
    pub fn strip(pattern: &str) -> Result<Self, LedgerError> {
        let re = Regex::new(pattern)?;
        Ok(Self {
            matcher: LabelMatcher::Pattern(re.clone()),
            action: LabelAction::Strip(re),
        })
    }

    /// Build a rule from its config form
    pub fn from_entry(entry: &LabelRuleEntry) -> Result<Self, LedgerError> {
        match (&entry.canonical, &entry.strip) {
            (Some(_), Some(_)) => Err(LedgerError::Rule(
                "set either canonical or strip, not both".to_string(),
            )),
            (None, None) => Err(LedgerError::Rule("missing canonical or strip".to_string())),
            (Some(canonical), None) => {
                if entry.contains.is_empty() {
                    return Err(LedgerError::Rule(format!(
                        "canonical rule {canonical:?} needs a non-empty contains list"
                    )));
                }
                Ok(Self {
                    matcher: LabelMatcher::Contains(entry.contains.clone()),
                    action: LabelAction::Canonical(canonical.clone()),
                })
            }
            (None, Some(pattern)) => {
                let mut rule = Self::strip(pattern)?;
                if !entry.contains.is_empty() {
                    rule.matcher = LabelMatcher::Contains(entry.contains.clone());
                }
                Ok(rule)
            }
        }
    }

    pub fn apply(&self, label: &str) -> Option<String> {
        if !self.matcher.matches(label) {
            return None;
        }
        Some(match &self.action {
            LabelAction::Canonical(canonical) => canonical.clone(),
            LabelAction::Strip(re) => re.replace_all(label, "").trim().to_string(),
        })
    }
}

/// Ordered rule table
#[derive(Debug, Clone)]
pub struct LabelRules {
    rules: Vec<LabelRule>,
}

/// Trailing installment counter such as "2/2" or "04/06"
pub const INSTALLMENT_SUFFIX: &str = r"\s*\d+/\d+\s*$";

impl Default for LabelRules {
    fn default() -> Self {
        let installment = LabelRule::strip(INSTALLMENT_SUFFIX).expect("valid installment pattern");
        Self::new(vec![
            LabelRule::canonical(&["Consumo Agua", "Consumo Água"], "Consumo Água"),
            installment,
        ])
    }
}

impl LabelRules {
    pub fn new(rules: Vec<LabelRule>) -> Self {
        Self { rules }
    }

    /// Configured rules first, then the built-in defaults
    pub fn with_overrides(entries: &[LabelRuleEntry]) -> Result<Self, LedgerError> {
        let mut rules = Self::new(
            entries
                .iter()
                .map(LabelRule::from_entry)
                .collect::<Result<Vec<_>, _>>()?,
        );
        for rule in Self::default().rules {
            rules.push(rule);
        }
        Ok(rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn push(&mut self, rule: LabelRule) {
        self.rules.push(rule);
    }

    /// Canonical label for `label`; unchanged when no rule matches.
    pub fn normalize(&self, label: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(label))
            .unwrap_or_else(|| label.to_string())
    }
}

/// Splits charges into fixed (recurring, stable name) and variable
#[derive(Debug, Clone, Default)]
pub struct ChargeClassifier {
    fixed_items: Vec<String>,
    fixed_markers: Vec<String>,
}

impl ChargeClassifier {
    pub fn new(fixed_items: Vec<String>, fixed_markers: Vec<String>) -> Self {
        Self {
            fixed_items,
            fixed_markers,
        }
    }

    pub fn from_config(cfg: &LedgerConfig) -> Self {
        Self::new(cfg.fixed_items.clone(), cfg.fixed_markers.clone())
    }

    /// Classify a label as printed (before normalization)
    pub fn classify(&self, label: &str) -> ChargeKind {
        if self.fixed_items.iter().any(|f| f == label)
            || self.fixed_markers.iter().any(|m| label.contains(m.as_str()))
        {
            ChargeKind::Fixed
        } else {
            ChargeKind::Variable
        }
    }
}
