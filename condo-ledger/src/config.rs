use serde::{Deserialize, Serialize};

/// Knobs for the aggregation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Charges billed every month under a stable name
    pub fixed_items: Vec<String>,
    /// Substrings that also mark a charge as fixed (water consumption is
    /// printed with the metered volume appended)
    pub fixed_markers: Vec<String>,
    /// Share of the month's total (in %) under which items are folded into "Outros"
    pub others_threshold_pct: f64,
    /// Records with labels this long or longer are dropped by the plausibility filter
    pub max_label_len: usize,
    /// Extra label rules tried before the built-in ones
    pub label_rules: Vec<LabelRuleEntry>,
}

/// A label rule as written in `[[ledger.label_rules]]`.
///
/// Exactly one of `canonical` and `strip` is set. `canonical` needs
/// `contains`; `strip` alone matches wherever its pattern does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRuleEntry {
    pub contains: Vec<String>,
    pub canonical: Option<String>,
    pub strip: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fixed_items: [
                "Taxa Fundo de Reserva",
                "Energia Elétrica",
                "Elevador",
                "Taxa de Cobrança CREA",
                "Limpeza e Conservação",
                "Limpeza Jardim /Calçada",
                "Limpeza Jardim",
                "Administração/Síndico",
                "Tarifa Bancária",
                "Taxa Básica Corsan",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            fixed_markers: vec!["Consumo Agua".to_string(), "Consumo Água".to_string()],
            others_threshold_pct: 3.0,
            max_label_len: 100,
            label_rules: Vec::new(),
        }
    }
}
