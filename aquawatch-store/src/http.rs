//! HTTP Client for the Hosted Table Store
//!
//! ## Overview
//!
//! The store exposes a PostgREST-style query surface: each logical
//! table is a path under `/rest/v1/`, and ordering and limits travel
//! as query parameters. Every query this crate issues has the same
//! shape - newest N rows of one table:
//!
//! ```text
//! GET {base}/rest/v1/{table}?select=*&order=timestamp.desc&limit={n}
//! apikey: {key}
//! Authorization: Bearer {key}
//! ```
//!
//! ## Wire Format
//!
//! Rows arrive as a JSON array. Numeric fields may be `null` when an
//! ingestion gap left a hole; those decode to NaN and flow onward so
//! the plausibility gate upstream rejects and logs them as invalid
//! readings rather than silently dropping the row here. Timestamps are
//! ISO-8601 strings; the store emits them with and without a zone
//! suffix depending on the column type, so parsing tries RFC 3339
//! first and falls back to naive-UTC forms.

use std::time::Duration;

use serde::Deserialize;

use aquawatch_core::time::Timestamp;
use aquawatch_core::{SecurityEvent, SensorReading};

use crate::{StoreError, StoreResult, TableStore};

/// Store client configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the hosted store
    pub base_url: String,
    /// API key, sent as both `apikey` and bearer token
    pub api_key: Option<String>,
    /// Logical table holding sensor readings
    pub readings_table: String,
    /// Logical table holding security events
    pub security_table: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl StoreConfig {
    /// Create a configuration for a store base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            readings_table: "sensor_readings".into(),
            security_table: "security_events".into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("AquaWatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Read the URL and key from the environment
    ///
    /// `AQUAWATCH_STORE_URL` is required, `AQUAWATCH_STORE_KEY`
    /// optional (a store in anonymous mode needs none).
    pub fn from_env() -> StoreResult<Self> {
        let base_url = std::env::var("AQUAWATCH_STORE_URL")
            .map_err(|_| StoreError::Config("AQUAWATCH_STORE_URL is not set".into()))?;
        let mut config = Self::new(base_url);
        if let Ok(key) = std::env::var("AQUAWATCH_STORE_KEY") {
            config.api_key = Some(key);
        }
        Ok(config)
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the readings table name
    pub fn readings_table(mut self, table: impl Into<String>) -> Self {
        self.readings_table = table.into();
        self
    }

    /// Set the security-events table name
    pub fn security_table(mut self, table: impl Into<String>) -> Self {
        self.security_table = table.into();
        self
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Table-store client over the lightweight ureq agent
pub struct HttpStore {
    config: StoreConfig,
    agent: ureq::Agent,
}

impl HttpStore {
    /// Create a store client, validating the configuration
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(StoreError::Config(
                "base URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent })
    }

    /// Issue the one query shape the dashboard needs: newest `limit`
    /// rows of `table`, timestamp descending
    fn query_latest(&self, table: &str, limit: usize) -> StoreResult<String> {
        let url = format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        );

        let mut request = self
            .agent
            .get(&url)
            .query("select", "*")
            .query("order", "timestamp.desc")
            .query("limit", &limit.to_string())
            .set("Accept", "application/json");

        if let Some(key) = &self.config.api_key {
            request = request
                .set("apikey", key)
                .set("Authorization", &format!("Bearer {key}"));
        }

        match request.call() {
            Ok(response) => response
                .into_string()
                .map_err(|e| StoreError::Request(e.to_string())),
            Err(ureq::Error::Status(status, response)) => Err(StoreError::Server {
                status,
                message: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(StoreError::Request(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl TableStore for HttpStore {
    async fn latest_readings(&self, limit: usize) -> StoreResult<Vec<SensorReading>> {
        let body = self.query_latest(&self.config.readings_table, limit)?;
        let rows: Vec<ReadingRow> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;

        log::debug!("fetched {} reading rows", rows.len());
        rows.into_iter().map(ReadingRow::into_domain).collect()
    }

    async fn latest_security_events(&self, limit: usize) -> StoreResult<Vec<SecurityEvent>> {
        let body = self.query_latest(&self.config.security_table, limit)?;
        let rows: Vec<SecurityRow> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;

        log::debug!("fetched {} security rows", rows.len());
        rows.into_iter().map(SecurityRow::into_domain).collect()
    }
}

/// Sensor reading as the store serializes it
#[derive(Debug, Deserialize)]
struct ReadingRow {
    temperature: Option<f32>,
    turbidity: Option<f32>,
    ph: Option<f32>,
    timestamp: String,
}

impl ReadingRow {
    /// Convert to the domain type
    ///
    /// Missing numeric fields become NaN on purpose: the plausibility
    /// gate upstream owns the invalid-reading policy, and a hole in
    /// one row must not fail the whole query.
    fn into_domain(self) -> StoreResult<SensorReading> {
        Ok(SensorReading {
            temperature: self.temperature.unwrap_or(f32::NAN),
            turbidity: self.turbidity.unwrap_or(f32::NAN),
            ph: self.ph.unwrap_or(f32::NAN),
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

/// Security event as the store serializes it
#[derive(Debug, Deserialize)]
struct SecurityRow {
    status: bool,
    timestamp: String,
}

impl SecurityRow {
    fn into_domain(self) -> StoreResult<SecurityEvent> {
        Ok(SecurityEvent {
            alert: self.status,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

/// Parse a store timestamp into epoch milliseconds
///
/// `timestamptz` columns serialize as RFC 3339; plain `timestamp`
/// columns omit the zone and are taken as UTC.
fn parse_timestamp(raw: &str) -> StoreResult<Timestamp> {
    use chrono::{DateTime, NaiveDateTime};

    let millis = if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        parsed.timestamp_millis()
    } else {
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|e| StoreError::Decode(format!("bad timestamp {raw:?}: {e}")))?;
        naive.and_utc().timestamp_millis()
    };

    Timestamp::try_from(millis)
        .map_err(|_| StoreError::Decode(format!("timestamp {raw:?} is before the epoch")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = StoreConfig::new("https://project.supabase.co")
            .api_key("key")
            .readings_table("lakefishcage")
            .timeout_secs(10);

        assert_eq!(config.base_url, "https://project.supabase.co");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.readings_table, "lakefishcage");
        assert_eq!(config.security_table, "security_events");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn url_validation() {
        assert!(HttpStore::new(StoreConfig::new("not-a-url")).is_err());
        assert!(HttpStore::new(StoreConfig::new("https://valid.url")).is_ok());
    }

    #[test]
    fn timestamp_parsing_accepts_store_forms() {
        // timestamptz with zone
        assert_eq!(
            parse_timestamp("1970-01-01T00:00:01Z").unwrap(),
            1_000
        );
        assert_eq!(
            parse_timestamp("1970-01-01T03:00:01+03:00").unwrap(),
            1_000
        );

        // naive forms, taken as UTC
        assert_eq!(parse_timestamp("1970-01-01T00:00:01").unwrap(), 1_000);
        assert_eq!(parse_timestamp("1970-01-01 00:00:01.500").unwrap(), 1_500);
    }

    #[test]
    fn bad_timestamp_is_decode_error() {
        assert!(matches!(
            parse_timestamp("yesterday-ish"),
            Err(StoreError::Decode(_))
        ));
        assert!(matches!(
            parse_timestamp("1969-12-31T23:59:59Z"),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn null_fields_become_nan_not_errors() {
        let body = r#"[{"temperature":null,"turbidity":10.0,"ph":7.2,"timestamp":"1970-01-01T00:00:01Z"}]"#;
        let rows: Vec<ReadingRow> = serde_json::from_str(body).unwrap();
        let reading = rows.into_iter().next().unwrap().into_domain().unwrap();

        assert!(reading.temperature.is_nan());
        assert_eq!(reading.turbidity, 10.0);
    }

    #[test]
    fn security_row_maps_status_to_alert() {
        let row = SecurityRow {
            status: true,
            timestamp: "1970-01-01T00:00:01Z".into(),
        };
        let event = row.into_domain().unwrap();
        assert!(event.alert);
        assert!(!event.is_safe());
    }
}
