use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info};

use super::model::{Curve, CurveSet};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Discover and load every CSV spectrum under `dir`.
///
/// Files are collected recursively and loaded in case-insensitive basename
/// order. Zero discovered files is an error, as is any file that yields no
/// numeric rows under either delimiter.
pub fn load_directory(dir: &Path) -> Result<CurveSet> {
    let files = discover_csv_files(dir)?;
    info!("found {} CSV file(s) under {}", files.len(), dir.display());

    let mut curves = Vec::with_capacity(files.len());
    for path in &files {
        let curve = load_curve(path)
            .with_context(|| format!("loading {}", path.display()))?;
        debug!("{}: {} rows kept", curve.name, curve.len());
        curves.push(curve);
    }
    Ok(CurveSet::from_curves(curves))
}

/// Parse one CSV file into a [`Curve`].
///
/// The comma delimiter is tried first; if it yields no valid rows (for
/// instance because the file is semicolon-separated and everything landed in
/// one column) the file is re-parsed with a semicolon. Cells use
/// decimal-comma or decimal-point interchangeably; rows with any
/// non-numeric cell are dropped.
pub fn load_curve(path: &Path) -> Result<Curve> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let mut rows = parse_rows(&text, b',');
    if rows.is_empty() {
        rows = parse_rows(&text, b';');
    }
    if rows.is_empty() {
        bail!("no numeric rows under ',' or ';' delimiter");
    }

    Ok(Curve::from_rows(basename(path), rows))
}

/// Collect `*.csv` files under `dir` recursively, sorted by lowercase
/// basename. Zero matches is an error.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, &mut files)
        .with_context(|| format!("scanning {}", dir.display()))?;

    if files.is_empty() {
        bail!("No CSV files found under: {}", dir.display());
    }
    files.sort_by_key(|p| basename(p).to_lowercase());
    Ok(files)
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse the first two columns of every record as `(wavenumber,
/// transmittance)`, keeping only fully numeric rows.
fn parse_rows(text: &str, delimiter: u8) -> Vec<(f64, f64)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records().flatten() {
        let wavenumber = record.get(0).and_then(coerce_cell);
        let transmittance = record.get(1).and_then(coerce_cell);
        if let (Some(wn), Some(tr)) = (wavenumber, transmittance) {
            rows.push((wn, tr));
        }
    }
    rows
}

/// Normalise decimal-comma to decimal-point, then parse. Non-finite values
/// count as missing.
fn coerce_cell(cell: &str) -> Option<f64> {
    cell.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            files.push(path);
        }
    }
    Ok(())
}
