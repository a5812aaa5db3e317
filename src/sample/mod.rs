//! Built-in sample pipeline, used when no webhook or file source is given.
//! It rides the normal ingest path so demos exercise the same code as
//! production data.

use crate::cleaner;
use crate::models::Deal;
use crate::webhook::extract_records;
use anyhow::{Context, Result};

const SAMPLE_JSON: &str = include_str!("../../data/sample_deals.json");

pub fn deals() -> Result<Vec<Deal>> {
    let payload = serde_json::from_str(SAMPLE_JSON).context("Embedded sample is not valid JSON")?;
    let records = extract_records(payload).context("Embedded sample has a bad shape")?;
    Ok(cleaner::raw_to_deals(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, DateRange};

    #[test]
    fn sample_loads_cleanly() {
        let deals = deals().unwrap();
        assert_eq!(deals.len(), 10);
        assert!(deals.iter().all(|d| d.creation_date().is_some()));
    }

    #[test]
    fn sample_produces_plausible_dashboard() {
        let deals = deals().unwrap();
        let stats = engine::aggregate::stats(&deals, &DateRange::new(None, None));
        assert_eq!(stats.total_deals, 10);
        assert_eq!(stats.won, 1);
        assert_eq!(stats.lost, 1);
        assert_eq!(stats.contact, 8);
        assert_eq!(stats.conversion_rate, 10.0);
    }
}
