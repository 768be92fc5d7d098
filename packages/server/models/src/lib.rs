#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the wildfire API server.
//!
//! Every data-bearing endpoint answers with an envelope: `success: true`
//! plus its payload, or [`ApiError`] (`success: false` plus a message).

use serde::{Deserialize, Serialize};
use wildfire_api_fire_models::FireRecord;

/// Sample size used when `limit` is missing or unusable.
pub const DEFAULT_SAMPLE_LIMIT: u32 = 3000;

/// Query parameters for `GET /api/wildfires`.
///
/// Built from the raw query pairs rather than deserialized, so a repeated
/// or malformed `limit` never rejects the request; see
/// [`WildfireQueryParams::limit`].
#[derive(Debug, Clone, Default)]
pub struct WildfireQueryParams {
    /// Requested sample size, as sent.
    pub limit: Option<String>,
}

impl WildfireQueryParams {
    /// Collects parameters from decoded query pairs.
    ///
    /// When a key is repeated the first occurrence wins.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let limit = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "limit").then_some(value));

        Self { limit }
    }

    /// Resolves the requested sample size.
    ///
    /// Anything other than a positive integer that fits in a `u32`
    /// (missing, `"abc"`, `"0"`, `"-5"`, `"2.5"`) resolves to
    /// [`DEFAULT_SAMPLE_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SAMPLE_LIMIT)
    }
}

/// Body of a successful `GET /api/wildfires`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiWildfires {
    /// Always `true`.
    pub success: bool,
    /// Number of records in `data`.
    pub count: usize,
    /// Sampled fires.
    pub data: Vec<FireRecord>,
}

impl From<Vec<FireRecord>> for ApiWildfires {
    fn from(data: Vec<FireRecord>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Body of a successful `GET /api/years`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiYears {
    /// Always `true`.
    pub success: bool,
    /// Distinct discovery years, ascending.
    pub years: Vec<i64>,
}

impl From<Vec<i64>> for ApiYears {
    fn from(years: Vec<i64>) -> Self {
        Self {
            success: true,
            years,
        }
    }
}

/// Body of a failed data request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `false`.
    pub success: bool,
    /// Human-readable failure description.
    pub error: String,
}

impl ApiError {
    /// Creates an error envelope with the given message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Always `"healthy"` while the process is serving.
    pub status: String,
    /// Whether the store file is present on disk.
    pub database_exists: bool,
}

impl ApiHealth {
    /// Health report for the given store presence.
    #[must_use]
    pub fn healthy(database_exists: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            database_exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>) -> WildfireQueryParams {
        WildfireQueryParams {
            limit: limit.map(ToString::to_string),
        }
    }

    #[test]
    fn limit_defaults_when_missing() {
        assert_eq!(params(None).limit(), DEFAULT_SAMPLE_LIMIT);
    }

    #[test]
    fn limit_parses_positive_integers() {
        assert_eq!(params(Some("10")).limit(), 10);
        assert_eq!(params(Some(" 25 ")).limit(), 25);
    }

    #[test]
    fn limit_defaults_on_garbage() {
        for raw in ["abc", "", "0", "-5", "2.5", "99999999999"] {
            assert_eq!(params(Some(raw)).limit(), DEFAULT_SAMPLE_LIMIT, "{raw}");
        }
    }

    #[test]
    fn first_limit_wins() {
        let pairs = vec![
            ("other".to_string(), "1".to_string()),
            ("limit".to_string(), "5".to_string()),
            ("limit".to_string(), "abc".to_string()),
        ];

        let params = WildfireQueryParams::from_pairs(pairs);
        assert_eq!(params.limit.as_deref(), Some("5"));
        assert_eq!(params.limit(), 5);
    }

    #[test]
    fn no_limit_pair_uses_default() {
        let params = WildfireQueryParams::from_pairs(vec![("x".to_string(), "y".to_string())]);
        assert_eq!(params.limit, None);
        assert_eq!(params.limit(), DEFAULT_SAMPLE_LIMIT);
    }

    #[test]
    fn envelopes_serialize_expected_shape() {
        let years = serde_json::to_value(ApiYears::from(vec![1992, 1993])).unwrap();
        assert_eq!(
            years,
            serde_json::json!({ "success": true, "years": [1992, 1993] })
        );

        let wildfires = serde_json::to_value(ApiWildfires::from(Vec::new())).unwrap();
        assert_eq!(
            wildfires,
            serde_json::json!({ "success": true, "count": 0, "data": [] })
        );

        let error = serde_json::to_value(ApiError::new("boom")).unwrap();
        assert_eq!(
            error,
            serde_json::json!({ "success": false, "error": "boom" })
        );

        let health = serde_json::to_value(ApiHealth::healthy(false)).unwrap();
        assert_eq!(
            health,
            serde_json::json!({ "status": "healthy", "database_exists": false })
        );
    }
}
