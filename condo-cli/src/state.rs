use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn condo_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".condo"))
}

pub fn ensure_condo_home() -> Result<PathBuf> {
    let dir = condo_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Record store used when `--csv`/`--out` is not given
pub fn default_records_csv() -> PathBuf {
    PathBuf::from("dados_condominio.csv")
}
