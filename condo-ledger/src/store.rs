//! CSV persistence for extracted line items.
//!
//! Columns: period,label,amount

use condo_core::LineItem;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::LedgerError;

/// Labels made only of digits, spaces, slashes and currency marks
static JUNK_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s/R$]+$").expect("valid junk regex"));

pub fn write_records(path: impl AsRef<Path>, items: &[LineItem]) -> Result<(), LedgerError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for item in items {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<LineItem>, LedgerError> {
    let mut rdr = csv::Reader::from_path(path.as_ref())?;
    let mut items = Vec::new();
    for result in rdr.deserialize() {
        let item: LineItem = result?;
        items.push(item);
    }
    Ok(items)
}

/// Drop records that survived scanning but are obviously not charges.
pub fn retain_plausible(items: Vec<LineItem>, max_label_len: usize) -> Vec<LineItem> {
    items
        .into_iter()
        .filter(|item| {
            let keep = item.label.chars().count() < max_label_len
                && !JUNK_LABEL_RE.is_match(&item.label);
            if !keep {
                tracing::debug!(label = %item.label, period = %item.period, "dropping implausible record");
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_accents_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dados_condominio.csv");
        let items = vec![
            LineItem::new("2026_01", "Energia Elétrica", 123.45),
            LineItem::new("2026_01", "Limpeza Jardim /Calçada", 80.0),
        ];
        write_records(&path, &items).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("period,label,amount\n"));

        assert_eq!(read_records(&path).unwrap(), items);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_records(dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_retain_plausible() {
        let items = vec![
            LineItem::new("p", "Elevador", 10.0),
            LineItem::new("p", "R$ 12/2025", 10.0),
            LineItem::new("p", "x".repeat(100), 10.0),
            LineItem::new("p", "x".repeat(99), 10.0),
        ];
        let kept = retain_plausible(items, 100);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].label, "Elevador");
        assert_eq!(kept[1].label.len(), 99);
    }
}
