//! Condominium bill "Detalhamento da Fatura" parser (text)
//!
//! Expected extracted-text section:
//!   Detalhamento da Fatura
//!   Taxa Fundo de Reserva ............ 85,00
//!   Energia Elétrica ................. 123,45
//!   Consumo Agua 12m3                  67,89
//!   SICOOB - Banco Cooperativo ...
//!
//! Lines are only considered between the header and the first terminator
//! (issuer footer, do-not-reply notice, address block, long CNPJ line, or
//! unit reference). Everything else in the dump is ignored.

use condo_core::LineItem;
use regex::Regex;
use std::sync::LazyLock;

use crate::rules::ScanRules;
use crate::types::{ScanReport, ScanState, SkipReason, SkippedLine, TextLine};

/// Label, then either a leader-dot run or plain whitespace, then `1234,56`
/// (optionally `1.234,56`) at end of line.
static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<label>.+?)",
        r"(?P<leader>\s*\.+\s*|\s+)",
        r"(?P<amount>\d{1,3}(?:\.\d{3})+,\d{2}|\d+,\d{2})$"
    ))
    .expect("valid item regex")
});

/// Page numbers, unit codes and dates that slipped through as labels
static NUMERIC_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s/]+[A-Z]*[\d\s/]*$").expect("valid numeric regex"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-ZÀ-ÿ]{3,}").expect("valid word regex"));

const MIN_LABEL_CHARS: usize = 3;
const MAX_LABEL_CHARS: usize = 50;

/// Remove leader dots and collapse whitespace. Idempotent.
pub fn clean_label(raw: &str) -> String {
    raw.replace('.', "").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_amount(s: &str) -> f64 {
    s.replace('.', "")
        .replace(',', ".")
        .parse()
        .expect("item pattern only captures <digits>,<2 digits> amounts")
}

fn check_label(label: &str) -> Result<(), SkipReason> {
    let len = label.chars().count();
    if NUMERIC_LABEL_RE.is_match(label) {
        return Err(SkipReason::NumericLabel);
    }
    if len > MAX_LABEL_CHARS {
        return Err(SkipReason::LabelTooLong);
    }
    if len < MIN_LABEL_CHARS {
        return Err(SkipReason::LabelTooShort);
    }
    if !WORD_RE.is_match(label) {
        return Err(SkipReason::NoWord);
    }
    Ok(())
}

/// Line-by-line scanner for the itemized-charges block of a bill
#[derive(Debug, Clone, Default)]
pub struct BillScanner {
    rules: ScanRules,
}

impl BillScanner {
    pub fn new(rules: ScanRules) -> Self {
        Self { rules }
    }

    /// Parse extracted bill text into line items stamped with `period`.
    ///
    /// Text without a detail-section header yields no items.
    pub fn scan(&self, text: &str, period: &str) -> Vec<LineItem> {
        self.scan_report(text, period).items
    }

    /// Same as [`scan`](Self::scan), also recording why each in-section line was dropped.
    pub fn scan_report(&self, text: &str, period: &str) -> ScanReport {
        let mut state = ScanState::OutsideDetail;
        let mut report = ScanReport::default();

        for (position, raw) in text.lines().enumerate() {
            let line = TextLine { position, raw };
            let trimmed = line.raw.trim();

            if self.rules.opens_section(trimmed) {
                if state == ScanState::OutsideDetail {
                    report.sections_opened += 1;
                    if report.sections_opened > 1 {
                        tracing::debug!(
                            position,
                            period,
                            "detail section reopened after a terminator"
                        );
                    }
                }
                state = ScanState::InDetail;
                continue;
            }

            if state == ScanState::OutsideDetail {
                continue;
            }

            if self.rules.closes_section(trimmed) {
                tracing::trace!(position, line = trimmed, "detail section closed");
                state = ScanState::OutsideDetail;
                continue;
            }

            match self.scan_line(trimmed, period) {
                Ok(item) => report.items.push(item),
                Err(reason) => {
                    tracing::trace!(position, line = trimmed, ?reason, "line skipped");
                    report.skipped.push(SkippedLine {
                        position: line.position,
                        line: trimmed.to_string(),
                        reason,
                    });
                }
            }
        }

        report
    }

    /// Filter pipeline for one trimmed line inside the detail block
    fn scan_line(&self, line: &str, period: &str) -> Result<LineItem, SkipReason> {
        if line.is_empty() {
            return Err(SkipReason::Blank);
        }
        if line.starts_with("---") || line.starts_with("===") {
            return Err(SkipReason::HorizontalRule);
        }
        if let Some(word) = self.rules.stop_word(line) {
            return Err(SkipReason::StopWord(word.to_string()));
        }

        let caps = ITEM_RE.captures(line).ok_or(SkipReason::NoAmount)?;
        let label = clean_label(caps["label"].trim());
        check_label(&label)?;

        Ok(LineItem::new(period, label, parse_amount(&caps["amount"])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<LineItem> {
        BillScanner::default().scan(text, "2026_01")
    }

    #[test]
    fn test_parse_basic_detail_block() {
        let text = r#"
Condomínio Residencial das Flores
Vencimento: 10/01/2026
Detalhamento da Fatura
Taxa Fundo de Reserva ............ 85,00
Energia Elétrica ................. 123,45
Limpeza e Conservação              410,00
---------------------------------------
SICOOB - Banco Cooperativo do Brasil
"#;

        let items = scan(text);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].label, "Taxa Fundo de Reserva");
        assert_eq!(items[0].amount, 85.00);
        assert_eq!(items[1].label, "Energia Elétrica");
        assert_eq!(items[1].amount, 123.45);
        assert_eq!(items[2].label, "Limpeza e Conservação");
        assert_eq!(items[2].amount, 410.00);
        assert!(items.iter().all(|i| i.period == "2026_01"));
    }

    #[test]
    fn test_no_header_yields_nothing() {
        let text = "Energia Elétrica ..... 123,45\nElevador ..... 10,00\n";
        assert!(scan(text).is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_lines_before_header_ignored() {
        let text = "Elevador ..... 10,00\nDetalhamento da Fatura\nPortaria ..... 900,00\n";
        let items = scan(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Portaria");
    }

    #[test]
    fn test_header_line_itself_not_scanned() {
        let items = scan("Detalhamento da Fatura ..... 99,99\nElevador ..... 10,00");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Elevador");
    }

    #[test]
    fn test_unit_reference_closes_section_by_default() {
        let text = "Detalhamento da Fatura\n\
                    Energia Elétrica ..... 123,45\n\
                    Referente à Unidade 12B\n\
                    Consumo Agua 2/2 ..... 67,89\n\
                    SICOOB pagamento\n\
                    Elevador ..... 10,00\n";
        let items = scan(text);
        assert_eq!(items, vec![LineItem::new("2026_01", "Energia Elétrica", 123.45)]);
    }

    #[test]
    fn test_unit_reference_as_metadata_keeps_section_open() {
        let rules = ScanRules {
            unit_marker_closes_section: false,
            ..ScanRules::default()
        };
        let text = "Detalhamento da Fatura\n\
                    Energia Elétrica ..... 123,45\n\
                    Referente à Unidade 12B\n\
                    Consumo Agua 2/2 ..... 67,89\n\
                    SICOOB pagamento\n\
                    Elevador ..... 10,00\n";
        let items = BillScanner::new(rules).scan(text, "2026_01");
        assert_eq!(
            items,
            vec![
                LineItem::new("2026_01", "Energia Elétrica", 123.45),
                LineItem::new("2026_01", "Consumo Agua 2/2", 67.89),
            ]
        );
    }

    #[test]
    fn test_terminators_close_section() {
        for terminator in [
            "SICOOB",
            "Não Receber após o vencimento",
            "Endereço: Av. Brasil, 1000",
            "Condomínio Residencial das Flores - CNPJ 12.345.678/0001-90",
        ] {
            let text = format!(
                "Detalhamento da Fatura\nElevador ..... 10,00\n{terminator}\nPortaria ..... 900,00"
            );
            let items = scan(&text);
            assert_eq!(items.len(), 1, "terminator {terminator:?} did not close");
            assert_eq!(items[0].label, "Elevador");
        }
    }

    #[test]
    fn test_short_cnpj_line_is_only_a_stop_word() {
        let text = "Detalhamento da Fatura\nCNPJ 12.345.678/0001-90\nElevador ..... 10,00";
        let items = scan(text);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_section_can_reopen() {
        let text = "Detalhamento da Fatura\n\
                    Elevador ..... 10,00\n\
                    SICOOB\n\
                    Portaria ..... 900,00\n\
                    Detalhamento da Fatura\n\
                    Jardinagem ..... 150,00\n";
        let report = BillScanner::default().scan_report(text, "2026_01");
        let labels: Vec<_> = report.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Elevador", "Jardinagem"]);
        assert_eq!(report.sections_opened, 2);
    }

    #[test]
    fn test_address_line_rejected_everywhere() {
        let text = "Rua das Flores, 123 ..... 00,00\n\
                    Detalhamento da Fatura\n\
                    Rua das Flores, 123 ..... 00,00\n";
        let report = BillScanner::default().scan_report(text, "2026_01");
        assert!(report.items.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].position, 2);
        assert_eq!(report.skipped[0].reason, SkipReason::StopWord("Rua".to_string()));
    }

    #[test]
    fn test_stop_words_skip_metadata_rows() {
        let text = "Detalhamento da Fatura\n\
                    Total a pagar ..... 1500,00\n\
                    Vencimento 10/01/2026 ..... 0,00\n\
                    Detalhe: rateio 10,00\n\
                    Elevador ..... 10,00\n";
        let items = scan(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Elevador");
    }

    #[test]
    fn test_blank_and_rule_lines_skipped() {
        let text = "Detalhamento da Fatura\n\n   \n-----\n=====\nElevador ..... 10,00";
        let report = BillScanner::default().scan_report(text, "p");
        assert_eq!(report.items.len(), 1);
        let reasons: Vec<_> = report.skipped.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::Blank,
                SkipReason::Blank,
                SkipReason::HorizontalRule,
                SkipReason::HorizontalRule,
            ]
        );
    }

    #[test]
    fn test_whitespace_separated_amount() {
        let items = scan("Detalhamento da Fatura\n  Seguro   Predial      42,10  ");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Seguro Predial");
        assert_eq!(items[0].amount, 42.10);
    }

    #[test]
    fn test_lines_without_amount_skipped() {
        let report =
            BillScanner::default().scan_report("Detalhamento da Fatura\nElevador 10,0\nPortaria", "p");
        assert!(report.items.is_empty());
        assert!(report.skipped.iter().all(|s| s.reason == SkipReason::NoAmount));
    }

    #[test]
    fn test_thousands_separator() {
        let items = scan(
            "Detalhamento da Fatura\nFundo de Obras ..... 1.234,56\nPintura Fachada 12.345,00",
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "Fundo de Obras");
        assert_eq!(items[0].amount, 1234.56);
        assert_eq!(items[1].label, "Pintura Fachada");
        assert_eq!(items[1].amount, 12345.00);
    }

    #[test]
    fn test_numeric_labels_rejected() {
        let report = BillScanner::default()
            .scan_report("Detalhamento da Fatura\n12/2025 ..... 10,00\n101 B 300,00", "p");
        assert!(report.items.is_empty());
        assert!(report.skipped.iter().all(|s| s.reason == SkipReason::NumericLabel));
    }

    #[test]
    fn test_label_length_boundaries() {
        let scanner = BillScanner::default();
        let three = scanner.scan("Detalhamento da Fatura\nGas ..... 10,00", "p");
        assert_eq!(three.len(), 1);
        assert_eq!(three[0].label, "Gas");

        let two = scanner.scan_report("Detalhamento da Fatura\nGs ..... 10,00", "p");
        assert!(two.items.is_empty());
        assert_eq!(two.skipped[0].reason, SkipReason::LabelTooShort);

        let fifty = "A".repeat(50);
        let items = scanner.scan(&format!("Detalhamento da Fatura\n{fifty} ..... 10,00"), "p");
        assert_eq!(items.len(), 1);

        let fifty_one = "A".repeat(51);
        let report =
            scanner.scan_report(&format!("Detalhamento da Fatura\n{fifty_one} ..... 10,00"), "p");
        assert!(report.items.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::LabelTooLong);
    }

    #[test]
    fn test_label_needs_a_word() {
        let report = BillScanner::default()
            .scan_report("Detalhamento da Fatura\nab-cd ..... 10,00", "p");
        assert!(report.items.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::NoWord);
    }

    #[test]
    fn test_accented_word_accepted() {
        let items = scan("Detalhamento da Fatura\nGás ..... 31,50");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Gás");
    }

    #[test]
    fn test_clean_label_idempotent() {
        let once = clean_label("Adm.  Síndico ...  Mensal");
        assert_eq!(once, "Adm Síndico Mensal");
        assert_eq!(clean_label(&once), once);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let text = "Detalhamento da Fatura\nElevador ..... 10,00\nPortaria 900,00\n";
        let scanner = BillScanner::default();
        assert_eq!(scanner.scan(text, "2026_01"), scanner.scan(text, "2026_01"));
    }
}
