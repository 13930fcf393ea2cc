use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use condo_core::LineItem;
use condo_ingest::{BillScanner, BillSource, DirectorySource, extract_text, process_bill};
use condo_ledger::{
    ChargeClassifier, LabelRules, compare_periods, composition, latest_two_periods, monthly_totals, read_records,
    retain_plausible, write_records,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "condo",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CONDO_BUILD_SHA"), ")"),
    about = "Condominium bill line-item extraction and month-over-month comparison"
)]
struct Cli {
    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract line items from one bill PDF
    Scan {
        #[arg(long)]
        pdf: PathBuf,

        /// Period key stamped on every item (e.g. 2026_01)
        #[arg(long)]
        period: String,

        #[arg(long)]
        json: bool,

        /// Also list rejected lines inside the detail section
        #[arg(long)]
        diagnostics: bool,
    },

    /// Scan already-extracted bill text (useful when tuning scan rules)
    ScanText {
        #[arg(long)]
        text: PathBuf,

        #[arg(long)]
        period: String,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        diagnostics: bool,
    },

    /// Scan every downloaded bill and write the record store
    Sync {
        /// Directory of bill PDFs (default: [source].pdf_dir)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output CSV (default: ./dados_condominio.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Compare two periods from the record store
    Compare {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Defaults to the most recent period
        #[arg(long)]
        current: Option<String>,

        /// Defaults to the period before the most recent one
        #[arg(long)]
        previous: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Monthly totals with percent change
    Totals {
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.condo/config.toml with defaults
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "condo=info,condo_ingest=info,condo_ledger=info"
    } else {
        "condo=warn,condo_ingest=warn,condo_ledger=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Scan {
            pdf,
            period,
            json,
            diagnostics,
        } => {
            let cfg = config::load_config()?;
            let bytes = std::fs::read(&pdf).with_context(|| format!("read {}", pdf.display()))?;
            let text =
                extract_text(&bytes).with_context(|| format!("extracting {}", pdf.display()))?;
            let classifier = ChargeClassifier::from_config(&cfg.ledger);
            let scanner = BillScanner::new(cfg.scan);
            scan_and_print(&scanner, &classifier, &text, &period, json, diagnostics)?;
        }

        Command::ScanText {
            text,
            period,
            json,
            diagnostics,
        } => {
            let cfg = config::load_config()?;
            let body = std::fs::read_to_string(&text)
                .with_context(|| format!("read {}", text.display()))?;
            let classifier = ChargeClassifier::from_config(&cfg.ledger);
            let scanner = BillScanner::new(cfg.scan);
            scan_and_print(&scanner, &classifier, &body, &period, json, diagnostics)?;
        }

        Command::Sync { dir, out } => {
            let cfg = config::load_config()?;
            let source = DirectorySource::new(dir.unwrap_or(cfg.source.pdf_dir));
            let out = out.unwrap_or_else(state::default_records_csv);
            let scanner = BillScanner::new(cfg.scan);

            let docs = source.documents()?;
            if docs.is_empty() {
                bail!(
                    "no PDF files in {} (pass --dir <path>)",
                    source.dir().display()
                );
            }

            let mut all: Vec<LineItem> = Vec::new();
            for doc in &docs {
                let items = process_bill(&doc.bytes, &doc.period, &scanner)
                    .with_context(|| format!("processing {}", doc.name))?;
                println!("{} - {}: {} items", doc.period, doc.name, items.len());
                all.extend(items);
            }

            let all = retain_plausible(all, cfg.ledger.max_label_len);
            write_records(&out, &all).with_context(|| format!("write {}", out.display()))?;
            println!("\n{} records saved to {}", all.len(), out.display());
        }

        Command::Compare {
            csv,
            current,
            previous,
            json,
        } => {
            let cfg = config::load_config()?;
            let items = load_records(csv)?;

            let (current, previous) = match (current, previous) {
                (Some(c), Some(p)) => (c, p),
                (c, p) => {
                    let Some((latest, before)) = latest_two_periods(&items) else {
                        bail!("need at least two periods in the record store");
                    };
                    (c.unwrap_or(latest), p.unwrap_or(before))
                }
            };

            let rules = LabelRules::with_overrides(&cfg.ledger.label_rules)
                .context("invalid [[ledger.label_rules]] entry")?;
            let cmp = compare_periods(&items, &current, &previous, &cfg.ledger, &rules);
            let slices = composition(&items, &current, cfg.ledger.others_threshold_pct);

            if json {
                let out = serde_json::json!({ "comparison": cmp, "composition": slices });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                report::print_comparison(&cmp, &slices);
            }
        }

        Command::Totals { csv, json } => {
            let items = load_records(csv)?;
            let totals = monthly_totals(&items);
            if json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                report::print_totals(&totals);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}\n", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn load_records(csv: Option<PathBuf>) -> Result<Vec<LineItem>> {
    let path = csv.unwrap_or_else(state::default_records_csv);
    if !path.exists() {
        bail!(
            "record store not found: {} (run `condo sync` or pass --csv <path>)",
            path.display()
        );
    }
    read_records(&path).with_context(|| format!("parsing {}", path.display()))
}

fn scan_and_print(
    scanner: &BillScanner,
    classifier: &ChargeClassifier,
    text: &str,
    period: &str,
    json: bool,
    diagnostics: bool,
) -> Result<()> {
    let scan = scanner.scan_report(text, period);
    if json {
        let out = if diagnostics {
            serde_json::to_value(&scan)?
        } else {
            serde_json::to_value(&scan.items)?
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    report::print_items(&scan.items, classifier);
    if diagnostics {
        report::print_diagnostics(&scan);
    }
    Ok(())
}
