//! Literal markers driving the detail-section scanner.
//!
//! Defaults are the strings printed on the condominium's bills (issued via
//! SICOOB boletos). Matching is case-sensitive substring matching.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRules {
    /// Header line opening the itemized block
    pub section_marker: String,
    /// Metadata rows interleaved inside the block
    pub stop_words: Vec<String>,
    /// Bank/issuer footer
    pub issuer_markers: Vec<String>,
    pub no_reply_markers: Vec<String>,
    /// Checked with `starts_with`
    pub address_prefixes: Vec<String>,
    pub tax_id_marker: String,
    /// A tax-ID line only closes the block when longer than this (in chars)
    pub tax_id_min_len: usize,
    pub unit_markers: Vec<String>,
    /// When false, unit lines are left to the stop-word filter and the block stays open
    pub unit_marker_closes_section: bool,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            section_marker: "Detalhamento da Fatura".to_string(),
            stop_words: strings(&[
                "Referente",
                "Unidade",
                "Rua",
                "CEP",
                "CNPJ",
                "Vencimento",
                "Total",
                "Boleto",
                "Detalhe:",
            ]),
            issuer_markers: strings(&["SICOOB"]),
            no_reply_markers: strings(&["Não Receber"]),
            address_prefixes: strings(&["Endereço:"]),
            tax_id_marker: "CNPJ".to_string(),
            tax_id_min_len: 50,
            unit_markers: strings(&["Referente à Unidade"]),
            unit_marker_closes_section: true,
        }
    }
}

impl ScanRules {
    pub fn opens_section(&self, line: &str) -> bool {
        line.contains(self.section_marker.as_str())
    }

    /// True when `line` ends the itemized block
    pub fn closes_section(&self, line: &str) -> bool {
        contains_any(line, &self.issuer_markers)
            || contains_any(line, &self.no_reply_markers)
            || self.address_prefixes.iter().any(|p| line.starts_with(p.as_str()))
            || (line.contains(self.tax_id_marker.as_str())
                && line.chars().count() > self.tax_id_min_len)
            || (self.unit_marker_closes_section && contains_any(line, &self.unit_markers))
    }

    /// First stop-word contained in `line`
    pub fn stop_word<'a>(&'a self, line: &str) -> Option<&'a str> {
        self.stop_words
            .iter()
            .map(String::as_str)
            .find(|w| line.contains(w))
    }
}

fn contains_any(line: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| line.contains(n.as_str()))
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}
