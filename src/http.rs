//! HTTP client for the Movebank public JSON API.
//!
//! This module fetches public study metadata and tracking events and
//! converts them into [`RawRecord`]s:
//! - Study listing filtered to public, non-test studies
//! - Per-study event fetching with a per-individual event cap
//! - Automatic retry with exponential backoff on transport errors
//!
//! The caller decides what to do on failure; the intended contract is to
//! substitute [`crate::demo_records`] on any `FetchError` so the pipeline
//! itself never sees a fetch failure.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{MigrationMapError, RawRecord, Result};

const BASE_URL: &str = "https://www.movebank.org/movebank/service/public/json";

const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;

/// Studies examined per run, and the point where fetching stops early.
const MAX_STUDIES: usize = 10;
const TARGET_SUCCESSFUL_STUDIES: usize = 5;

/// Per-study and overall record caps, matching the map's rendering budget.
const MAX_EVENTS_PER_INDIVIDUAL: u32 = 20;
const EVENT_LIMIT: u32 = 100;
const MAX_TOTAL_RECORDS: usize = 300;

/// Known public study IDs used when the study listing comes back empty.
const FALLBACK_STUDY_IDS: [i64; 3] = [2_911_040, 173_641_633, 76_367_850];

/// A study from the Movebank listing endpoint.
#[derive(Debug, Clone, Deserialize)]
struct Study {
    id: Option<i64>,
    name: Option<String>,
    principal_investigator_name: Option<String>,
    #[serde(default)]
    is_test: bool,
    #[serde(default)]
    has_quota: bool,
}

impl Study {
    /// Free-text label fed to the classifier: study name plus principal
    /// investigator (whose name sometimes carries the only species hint),
    /// falling back to a bare study-ID label.
    fn label(&self, study_id: i64) -> String {
        match (&self.name, &self.principal_investigator_name) {
            (Some(name), Some(pi)) => format!("{} {}", name, pi),
            (Some(name), None) => name.clone(),
            (None, Some(pi)) => format!("Study {} {}", study_id, pi),
            (None, None) => format!("Study {}", study_id),
        }
    }
}

/// A tracking event. Movebank is loose with types (numbers sometimes
/// arrive as strings), so coordinates and timestamps come in as raw JSON.
#[derive(Debug, Clone, Deserialize)]
struct Event {
    location_lat: Option<Value>,
    location_long: Option<Value>,
    timestamp: Option<Value>,
    individual_local_identifier: Option<String>,
}

/// Client for the Movebank public JSON API.
pub struct MovebankClient {
    client: Client,
    base_url: String,
}

impl MovebankClient {
    /// Create a client against the public Movebank endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Create a client against an alternate endpoint (for tests).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MigrationMapError::FetchError {
                message: format!("failed to create HTTP client: {}", e),
                status_code: None,
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch tracking records from public studies.
    ///
    /// Walks up to [`MAX_STUDIES`] public studies, fetching events from
    /// each, and stops once [`TARGET_SUCCESSFUL_STUDIES`] studies produced
    /// usable records or [`MAX_TOTAL_RECORDS`] records are collected.
    /// Individual study failures are logged and skipped; only a complete
    /// failure to reach the API surfaces as `FetchError`.
    pub async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        let studies = self.fetch_studies().await?;

        let studies = if studies.is_empty() {
            info!("[Movebank] No studies listed, falling back to known study IDs");
            FALLBACK_STUDY_IDS
                .iter()
                .map(|&id| Study {
                    id: Some(id),
                    name: None,
                    principal_investigator_name: None,
                    is_test: false,
                    has_quota: false,
                })
                .collect()
        } else {
            studies
        };

        let mut all_records = Vec::new();
        let mut successful_studies = 0;

        for study in studies.iter().take(MAX_STUDIES) {
            let Some(study_id) = study.id else {
                continue;
            };

            // Known-ID fallbacks arrive without metadata; look them up so
            // their records can still classify from the study name.
            let mut study = study.clone();
            if study.name.is_none() {
                match self.fetch_study_info(study_id).await {
                    Ok(Some(info)) => {
                        study.name = info.name;
                        study.principal_investigator_name = info.principal_investigator_name;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        debug!("[Movebank] No metadata for study {}: {}", study_id, e);
                    }
                }
            }
            let study_label = study.label(study_id);

            match self.fetch_study_events(study_id).await {
                Ok(events) => {
                    let before = all_records.len();
                    convert_events(&events, &study_label, &mut all_records);
                    let added = all_records.len() - before;

                    if added > 0 {
                        successful_studies += 1;
                        info!(
                            "[Movebank] Got {} points from study {} ('{}')",
                            added, study_id, study_label
                        );
                    }
                }
                Err(e) => {
                    warn!("[Movebank] Error with study {}: {}", study_id, e);
                    continue;
                }
            }

            if successful_studies >= TARGET_SUCCESSFUL_STUDIES
                || all_records.len() >= MAX_TOTAL_RECORDS
            {
                break;
            }
        }

        all_records.truncate(MAX_TOTAL_RECORDS);
        info!(
            "[Movebank] Collected {} records from {} studies",
            all_records.len(),
            successful_studies
        );

        Ok(all_records)
    }

    /// Fetch the public study listing (non-test, no-quota studies only).
    async fn fetch_studies(&self) -> Result<Vec<Study>> {
        let studies: Vec<Study> = self
            .get_json(&[("entity_type", "study".to_string())])
            .await?;

        Ok(studies
            .into_iter()
            .filter(|s| !s.is_test && !s.has_quota)
            .take(20)
            .collect())
    }

    /// Fetch metadata for a single study. Movebank answers this endpoint
    /// with either a one-element list or a bare object.
    async fn fetch_study_info(&self, study_id: i64) -> Result<Option<Study>> {
        let value: Value = self
            .get_json(&[
                ("entity_type", "study".to_string()),
                ("study_id", study_id.to_string()),
            ])
            .await?;

        Ok(study_from_value(value))
    }

    async fn fetch_study_events(&self, study_id: i64) -> Result<Vec<Event>> {
        self.get_json(&[
            ("entity_type", "event".to_string()),
            ("study_id", study_id.to_string()),
            (
                "max_events_per_individual",
                MAX_EVENTS_PER_INDIVIDUAL.to_string(),
            ),
            ("limit", EVENT_LIMIT.to_string()),
        ])
        .await
    }

    /// GET the base URL with query params, retrying transport errors with
    /// exponential backoff.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<T> {
        let mut retries = 0;

        loop {
            let response = self.client.get(&self.base_url).query(params).send().await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        return Err(MigrationMapError::FetchError {
                            message: format!("HTTP {}", status),
                            status_code: Some(status.as_u16()),
                        });
                    }

                    return resp.json::<T>().await.map_err(|e| {
                        MigrationMapError::FetchError {
                            message: format!("parse error: {}", e),
                            status_code: None,
                        }
                    });
                }
                Err(e) => {
                    retries += 1;
                    if retries > MAX_RETRIES {
                        return Err(MigrationMapError::FetchError {
                            message: format!("request error: {}", e),
                            status_code: None,
                        });
                    }

                    let backoff = Duration::from_millis(500 * (1 << retries));
                    warn!(
                        "[Movebank] Request error: {}, retry {} after {:?}",
                        e, retries, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Convert raw events into records, skipping anything unusable.
fn convert_events(events: &[Event], study_label: &str, out: &mut Vec<RawRecord>) {
    for event in events {
        let (Some(lat), Some(lng)) = (
            event.location_lat.as_ref().and_then(value_to_f64),
            event.location_long.as_ref().and_then(value_to_f64),
        ) else {
            debug!("[Movebank] Event without coordinates skipped");
            continue;
        };

        let Some(timestamp) = event.timestamp.as_ref().and_then(parse_event_timestamp) else {
            debug!("[Movebank] Event without usable timestamp skipped");
            continue;
        };

        let individual_id = event
            .individual_local_identifier
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("animal_{}", out.len()));

        let mut record = RawRecord::new(lat, lng, timestamp, &individual_id);
        record.study_label = study_label.to_string();
        out.push(record);
    }
}

/// Unwrap a study-info response: a one-element list or a bare object.
fn study_from_value(value: Value) -> Option<Study> {
    let object = match value {
        Value::Array(items) => items.into_iter().next()?,
        other => other,
    };
    serde_json::from_value(object).ok()
}

/// Coerce a JSON number or numeric string to f64.
fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a Movebank timestamp: epoch milliseconds (number or numeric
/// string) or an ISO-8601 / "YYYY-MM-DD HH:MM:SS" string.
fn parse_event_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(millis) = s.parse::<i64>() {
                return DateTime::from_timestamp_millis(millis);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}
