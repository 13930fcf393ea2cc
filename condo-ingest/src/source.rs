//! Where bill PDFs come from.
//!
//! Mail retrieval lives outside this workspace; the downloader drops
//! attachments as `<YYYY_MM>_Boleto.pdf`, which `DirectorySource` reads back.
//! Files saved by hand without that prefix get the period of their
//! modification time.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use condo_core::period_from_date;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PERIOD_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<period>\d{4}_\d{2})").expect("valid period regex"));

/// One bill ready for extraction
#[derive(Debug, Clone, PartialEq)]
pub struct BillDocument {
    pub period: String,
    pub name: String,
    pub bytes: Vec<u8>,
}

pub trait BillSource {
    /// All available documents, ordered by period then name
    fn documents(&self) -> Result<Vec<BillDocument>>;
}

/// A directory of bill PDFs, usually named `YYYY_MM*.pdf`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// `2026_01_Boleto.pdf` -> `2026_01`
pub fn period_from_file_name(name: &str) -> Option<String> {
    PERIOD_PREFIX_RE
        .captures(name)
        .map(|caps| caps["period"].to_string())
}

impl BillSource for DirectorySource {
    fn documents(&self) -> Result<Vec<BillDocument>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("read dir {}", self.dir.display()))?;

        let mut docs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || !is_pdf(&path) {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let period = match period_from_file_name(&name) {
                Some(period) => period,
                None => {
                    let modified = fs::metadata(&path)
                        .and_then(|m| m.modified())
                        .with_context(|| format!("mtime of {}", path.display()))?;
                    let period = period_from_date(DateTime::<Local>::from(modified).date_naive());
                    tracing::warn!(
                        file = %path.display(),
                        period,
                        "no YYYY_MM prefix, using modification time"
                    );
                    period
                }
            };

            let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            docs.push(BillDocument { period, name, bytes });
        }

        docs.sort_by(|a, b| (&a.period, &a.name).cmp(&(&b.period, &b.name)));
        Ok(docs)
    }
}
