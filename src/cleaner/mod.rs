//! Validation/mapping step between untyped source rows and typed [`Deal`]s.
//!
//! Nothing here rejects a record: fields that fail to parse become `None` and
//! the record degrades through the engine's fallback buckets instead.

use crate::models::{Deal, RawDealRecord};
use chrono::NaiveDate;

/// Parse dates: ISO, "Feb 20, 2024" (spreadsheet exports), or day-first forms.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%b %d, %Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d %b %Y") {
        return Some(d);
    }

    None
}

/// Re-emit a date field as an ISO `YYYY-MM-DD` string, or `None` when blank
/// or unparseable. The engine relies on this: lexicographic order on the
/// normalised strings is chronological order.
fn clean_date(s: Option<&str>) -> Option<String> {
    parse_date(s?.trim()).map(|d| d.format("%Y-%m-%d").to_string())
}

fn clean_text(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Total mapping from a raw source row to a typed deal.
pub fn raw_to_deal(raw: &RawDealRecord) -> Deal {
    Deal {
        contact_date: clean_date(raw.contact_date.as_deref()),
        deal_date: clean_date(raw.deal_date.as_deref()),
        advisor_name: clean_text(raw.advisor_name.as_deref()),
        deal_name: raw.deal_name.as_deref().unwrap_or_default().trim().to_string(),
        status: clean_text(raw.status.as_deref()),
        program: clean_text(raw.program.as_deref()),
        close_date: clean_date(raw.close_date.as_deref()),
    }
}

/// Map a whole batch. Order is preserved — the unfiltered table view shows
/// records in source order.
pub fn raw_to_deals(rows: &[RawDealRecord]) -> Vec<Deal> {
    rows.iter().map(raw_to_deal).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(parse_date("2024-02-20"), Some(expected));
        assert_eq!(parse_date("Feb 20, 2024"), Some(expected));
        assert_eq!(parse_date("20/02/2024"), Some(expected));
        assert_eq!(parse_date("20 Feb 2024"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn malformed_fields_degrade_to_none() {
        let raw = RawDealRecord {
            contact_date: Some("soon".into()),
            deal_date: Some("2025-11-19".into()),
            advisor_name: Some("   ".into()),
            deal_name: None,
            status: Some(" Contacto ".into()),
            program: None,
            close_date: None,
        };
        let deal = raw_to_deal(&raw);
        assert_eq!(deal.contact_date, None);
        assert_eq!(deal.deal_date.as_deref(), Some("2025-11-19"));
        assert_eq!(deal.advisor_name, None);
        assert_eq!(deal.deal_name, "");
        assert_eq!(deal.status.as_deref(), Some("Contacto"));
    }

    #[test]
    fn non_iso_dates_are_normalised_to_iso() {
        let raw = RawDealRecord {
            close_date: Some("Jun 1, 2025".into()),
            ..Default::default()
        };
        assert_eq!(raw_to_deal(&raw).close_date.as_deref(), Some("2025-06-01"));
    }
}
