//! Plain-text rendering of scan and comparison results

use condo_core::{LineItem, display_period};
use condo_ingest::ScanReport;
use condo_ledger::{ChargeClassifier, ItemDelta, MonthlyTotal, PeriodComparison, Slice};

fn money(x: f64) -> String {
    format!("R$ {:.2}", x)
}

pub fn print_items(items: &[LineItem], classifier: &ChargeClassifier) {
    for item in items {
        println!(
            "{} | {:<50} | {:<8} | {:>12}",
            display_period(&item.period),
            item.label,
            classifier.classify(&item.label).as_str(),
            money(item.amount)
        );
    }
    println!("\n{} items", items.len());
}

pub fn print_diagnostics(report: &ScanReport) {
    println!("\nSections opened: {}", report.sections_opened);
    if report.sections_opened > 1 {
        println!("warning: detail section reopened; trailing text may have been scanned twice");
    }
    println!("Skipped lines: {}", report.skipped.len());
    for s in &report.skipped {
        println!("  #{:<4} {:?}: {}", s.position, s.reason, s.line);
    }
}

fn print_deltas(deltas: &[ItemDelta], previous: &str, current: &str) {
    println!(
        "{:<40} {:>14} {:>14} {:>14} {:>9}",
        "Item",
        display_period(previous),
        display_period(current),
        "Diferença",
        "Variação"
    );
    for d in deltas {
        println!(
            "{:<40} {:>14} {:>14} {:>14} {:>8.2}%",
            d.label,
            money(d.previous),
            money(d.current),
            money(d.difference),
            d.percent
        );
    }
}

pub fn print_comparison(cmp: &PeriodComparison, slices: &[Slice]) {
    let (prev, cur) = (&cmp.previous_period, &cmp.current_period);
    println!("# {} vs {}\n", display_period(cur), display_period(prev));

    println!(
        "Total atual: {} | Total anterior: {} | Variação: {} ({:.2}%)\n",
        money(cmp.totals.current),
        money(cmp.totals.previous),
        money(cmp.totals.difference),
        cmp.totals.percent
    );

    println!("## Itens fixos\n");
    print_deltas(&cmp.fixed, prev, cur);

    println!("\n## Itens variáveis (também no mês anterior)\n");
    if cmp.variable.is_empty() {
        println!("(nenhum)");
    } else {
        print_deltas(&cmp.variable, prev, cur);
    }

    println!("\n## Itens variáveis novos\n");
    if cmp.new_variable.is_empty() {
        println!("(nenhum)");
    }
    for item in &cmp.new_variable {
        println!("{:<40} {:>14}", item.label, money(item.amount));
    }

    println!("\n## Composição de {}\n", display_period(cur));
    for s in slices {
        println!("{:<40} {:>14} {:>7.2}%", s.label, money(s.amount), s.share_pct);
    }
}

pub fn print_totals(totals: &[MonthlyTotal]) {
    for t in totals {
        let change = t
            .change_pct
            .map(|c| format!("{:+.2}%", c))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<8} {:>14} {:>9}", display_period(&t.period), money(t.total), change);
    }
}
