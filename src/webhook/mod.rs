//! Ingestion boundary: everything that can fail lives here, so the engine
//! never sees malformed input.

pub mod http_client;

use crate::cleaner;
use crate::config::WebhookConfig;
use crate::models::{Deal, RawDealRecord};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use self::http_client::HttpClient;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid webhook URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("webhook responded with HTTP {status}")]
    Http { status: reqwest::StatusCode },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported payload shape: expected a list, or an object with a `data` or `items` list")]
    UnsupportedShape,

    #[error("webhook returned no records")]
    EmptyPayload,

    #[error("no request attempts were made")]
    NoAttempts,
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable deal source abstraction. The webhook is the production source;
/// file loaders and the embedded sample bypass it.
#[async_trait]
pub trait DealSource: Send + Sync {
    async fn fetch_deals(&self) -> Result<Vec<Deal>, IngestError>;
}

// ── Webhook source ────────────────────────────────────────────────────────────

pub struct WebhookSource {
    client: HttpClient,
    url: Url,
}

impl WebhookSource {
    pub fn new(config: &WebhookConfig, url: &str) -> Result<Self, IngestError> {
        let url = Url::parse(url).map_err(|source| IngestError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            client: HttpClient::new(config)?,
            url,
        })
    }
}

#[async_trait]
impl DealSource for WebhookSource {
    async fn fetch_deals(&self) -> Result<Vec<Deal>, IngestError> {
        let payload = self.client.get_json(self.url.as_str()).await?;
        let records = extract_records(payload)?;
        info!("Webhook returned {} records", records.len());
        Ok(cleaner::raw_to_deals(&records))
    }
}

// ── Payload shape normalization ───────────────────────────────────────────────

/// Accept the payload shapes seen in the wild: a bare list, an object with a
/// `data` or `items` list, or a single object wrapped into a one-element
/// list. Anything else is an ingestion error. List elements that are not
/// objects are skipped with a warning, never fatal.
pub fn extract_records(payload: Value) -> Result<Vec<RawDealRecord>, IngestError> {
    let items: Vec<Value> = match payload {
        Value::Array(items) => items,
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("data") {
                items.clone()
            } else if let Some(Value::Array(items)) = map.get("items") {
                items.clone()
            } else {
                vec![Value::Object(map)]
            }
        }
        _ => return Err(IngestError::UnsupportedShape),
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawDealRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping record {}: {}", i, e),
        }
    }

    if records.is_empty() {
        return Err(IngestError::EmptyPayload);
    }
    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_a_bare_list() {
        let records = extract_records(json!([{"Estado": "Contacto"}])).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status.as_deref(), Some("Contacto"));
    }

    #[test]
    fn accepts_data_and_items_wrappers() {
        let data = extract_records(json!({"data": [{"status": "won"}, {"status": "lost"}]}));
        assert_eq!(data.unwrap().len(), 2);

        let items = extract_records(json!({"items": [{"status": "won"}]}));
        assert_eq!(items.unwrap().len(), 1);
    }

    #[test]
    fn wraps_a_single_object() {
        let records = extract_records(json!({"Nombre de Trato": "Mabel"})).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].deal_name.as_deref(), Some("Mabel"));
    }

    #[test]
    fn rejects_scalars() {
        assert!(matches!(
            extract_records(json!("not a list")),
            Err(IngestError::UnsupportedShape)
        ));
        assert!(matches!(
            extract_records(json!(42)),
            Err(IngestError::UnsupportedShape)
        ));
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(matches!(
            extract_records(json!([])),
            Err(IngestError::EmptyPayload)
        ));
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let records = extract_records(json!([{"status": "won"}, "junk", 7])).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn invalid_url_is_rejected_up_front() {
        let config = WebhookConfig::default();
        assert!(matches!(
            WebhookSource::new(&config, "not a url"),
            Err(IngestError::InvalidUrl { .. })
        ));
    }
}
