use serde::{Deserialize, Serialize};

// ── Deal ──────────────────────────────────────────────────────────────────────

/// A single sales pipeline record, tracked from first contact through closure.
///
/// All date fields are ISO `YYYY-MM-DD` strings (the cleaner guarantees this),
/// so lexicographic comparison equals chronological comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Deal {
    pub contact_date: Option<String>,
    pub deal_date: Option<String>,
    pub advisor_name: Option<String>,
    pub deal_name: String,
    pub status: Option<String>,
    pub program: Option<String>,
    pub close_date: Option<String>,
}

impl Deal {
    /// Effective creation date: the deal date, falling back to the contact
    /// date. `None` when neither is present — such a record can never enter a
    /// dated bucket but stays in the raw list.
    pub fn creation_date(&self) -> Option<&str> {
        non_blank(self.deal_date.as_deref()).or_else(|| non_blank(self.contact_date.as_deref()))
    }

    /// Closure date, if any. Only meaningful together with a Won/Lost status;
    /// callers check the normalized status themselves.
    pub fn closing_date(&self) -> Option<&str> {
        non_blank(self.close_date.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

// ── Raw webhook/CSV row ───────────────────────────────────────────────────────

/// Untyped record as it arrives from the webhook or a CSV export. The source
/// CRM emits Spanish column headers; newer exports use camelCase English ones.
/// Everything is optional — the cleaner decides what survives.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDealRecord {
    #[serde(default, alias = "Fecha de Contacto", alias = "contactDate")]
    pub contact_date: Option<String>,

    #[serde(default, alias = "Fecha de Trato", alias = "dealDate")]
    pub deal_date: Option<String>,

    #[serde(default, alias = "Asesora Comercial", alias = "advisorName")]
    pub advisor_name: Option<String>,

    #[serde(default, alias = "Nombre de Trato", alias = "dealName")]
    pub deal_name: Option<String>,

    #[serde(default, alias = "Estado", alias = "status")]
    pub status: Option<String>,

    #[serde(default, alias = "Programa Académico", alias = "program")]
    pub program: Option<String>,

    #[serde(default, alias = "Fecha de Cierre", alias = "closeDate")]
    pub close_date: Option<String>,
}

// ── Derived views ─────────────────────────────────────────────────────────────

/// Global KPI block for the selected period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AggregatedStats {
    /// Deals whose creation date falls in the period.
    pub total_deals: usize,
    /// Deals closed Won inside the period, regardless of creation date.
    pub won: usize,
    /// Deals closed Lost inside the period, regardless of creation date.
    pub lost: usize,
    /// Created in the period and still open (neither Won nor Lost).
    pub contact: usize,
    /// Residual: created in the period but closed outside it. Clamped at 0.
    pub other: usize,
    /// won / total_deals * 100. Can exceed 100 when old deals close in-period.
    pub conversion_rate: f64,
    pub loss_rate: f64,
}

/// One day on the activity chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelinePoint {
    pub date: String,
    pub created: usize,
    pub won: usize,
}

/// Per-salesperson breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorMetric {
    pub name: String,
    pub total: usize,
    pub won: usize,
    pub lost: usize,
    pub conversion_rate: f64,
    pub loss_rate: f64,
}

/// Per-program breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramMetric {
    pub name: String,
    pub count: usize,
    pub won: usize,
    pub conversion_rate: f64,
}

/// All five views over one snapshot, computed in a single call.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DashboardData {
    pub stats: AggregatedStats,
    pub timeline: Vec<TimelinePoint>,
    pub advisors: Vec<AdvisorMetric>,
    pub programs: Vec<ProgramMetric>,
    pub deals: Vec<Deal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_date_prefers_deal_date() {
        let deal = Deal {
            contact_date: Some("2025-01-01".into()),
            deal_date: Some("2025-02-02".into()),
            ..Default::default()
        };
        assert_eq!(deal.creation_date(), Some("2025-02-02"));
    }

    #[test]
    fn creation_date_falls_back_to_contact() {
        let deal = Deal {
            contact_date: Some("2025-01-01".into()),
            deal_date: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(deal.creation_date(), Some("2025-01-01"));

        let dateless = Deal::default();
        assert_eq!(dateless.creation_date(), None);
    }

    #[test]
    fn raw_record_accepts_spanish_headers() {
        let json = r#"{
            "Fecha de Contacto": "2025-11-19",
            "Fecha de Trato": "2025-11-19",
            "Asesora Comercial": "Luz Karime",
            "Nombre de Trato": "Mabel",
            "Estado": "Contacto",
            "Programa Académico": "PROGRAMA DE MAQUILLAJE",
            "Fecha de Cierre": null
        }"#;
        let raw: RawDealRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.advisor_name.as_deref(), Some("Luz Karime"));
        assert_eq!(raw.status.as_deref(), Some("Contacto"));
        assert!(raw.close_date.is_none());
    }

    #[test]
    fn raw_record_accepts_camel_case() {
        let json = r#"{"dealName": "Acme", "status": "won", "closeDate": "2025-06-01"}"#;
        let raw: RawDealRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.deal_name.as_deref(), Some("Acme"));
        assert_eq!(raw.close_date.as_deref(), Some("2025-06-01"));
    }
}
