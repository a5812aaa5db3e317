//! File loaders for offline snapshots: JSON dumps of the webhook payload and
//! CSV exports from the CRM.

use crate::cleaner;
use crate::models::{Deal, RawDealRecord};
use crate::webhook::extract_records;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::{debug, info, warn};

/// Dispatch on file extension.
pub fn load_file(path: &Path) -> Result<Vec<Deal>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        Some("csv") => load_csv(path),
        _ => bail!("Unsupported file type {:?} (expected .json or .csv)", path),
    }
}

/// A JSON snapshot goes through the same shape normalization as the webhook
/// response, so `{"data": [...]}` dumps load unchanged.
pub fn load_json(path: &Path) -> Result<Vec<Deal>> {
    debug!("Loading JSON snapshot from {:?}", path);

    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {:?}", path))?;
    let payload = serde_json::from_str(&body)
        .with_context(|| format!("{:?} is not valid JSON", path))?;
    let records = extract_records(payload)
        .with_context(|| format!("Unexpected payload shape in {:?}", path))?;

    let deals = cleaner::raw_to_deals(&records);
    info!("{:?}: {} deals loaded", path, deals.len());
    Ok(deals)
}

/// Parse a CRM CSV export. Headers may be the Spanish originals or the
/// camelCase English names; unreadable rows are skipped, not fatal.
pub fn load_csv(path: &Path) -> Result<Vec<Deal>> {
    debug!("Loading CSV export from {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Could not open {:?}", path))?;

    let mut raws: Vec<RawDealRecord> = Vec::new();
    for (i, result) in reader.deserialize::<RawDealRecord>().enumerate() {
        match result {
            Ok(raw) => raws.push(raw),
            Err(e) => warn!("Row {} in {:?}: {}", i + 1, path, e),
        }
    }

    let deals = cleaner::raw_to_deals(&raws);
    info!("{:?}: {} deals loaded", path, deals.len());
    Ok(deals)
}
