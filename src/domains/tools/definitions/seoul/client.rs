//! Shared HTTP plumbing for the Seoul Open Data Plaza API.
//!
//! Every dataset on the portal answers `GET {base}/{key}/json/{Dataset}/...`
//! with a body shaped like:
//!
//! ```json
//! { "Dataset": { "list_total_count": 1, "RESULT": { "CODE": "INFO-000", "MESSAGE": "..." }, "row": [] } }
//! ```
//!
//! [`SeoulApiClient::fetch_dataset`] performs the request and the checks
//! common to all datasets, in this order: HTTP status, dataset key, result
//! code.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::core::config::SeoulApiConfig;
use crate::core::{Error, Result};
use crate::domains::tools::ToolError;

/// Result code the portal reports for a successful query.
pub const SUCCESS_CODE: &str = "INFO-000";

/// Default first row requested when `startIndex` is omitted.
pub fn default_start_index() -> u64 {
    1
}

/// Default last row requested when `endIndex` is omitted.
pub fn default_end_index() -> u64 {
    10
}

/// Render a tool argument as the literal text substituted into a request path.
///
/// A missing or `null` value takes `default`. Strings pass through unchanged,
/// integral numbers print without a fractional part (`10.0` becomes `10`),
/// and any other value prints as JSON.
pub fn path_segment(value: Option<Value>, default: impl FnOnce() -> String) -> String {
    match value {
        None | Some(Value::Null) => default(),
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => {
            if let Some(n) = number.as_i64() {
                n.to_string()
            } else if let Some(n) = number.as_u64() {
                n.to_string()
            } else if let Some(n) = number.as_f64() {
                n.to_string()
            } else {
                number.to_string()
            }
        }
        Some(other) => other.to_string(),
    }
}

/// Client for the Seoul Open Data Plaza, shared by all Seoul tools.
///
/// Cloning is cheap: the underlying connection pool is reference counted.
#[derive(Clone)]
pub struct SeoulApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for SeoulApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeoulApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SeoulApiClient {
    /// Build a client from configuration.
    pub fn new(config: &SeoulApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| {
            Error::config(format!("invalid Seoul API base URL '{}': {}", base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Expand a path template into a full request URL.
    ///
    /// `{authKey}` is replaced by the configured access key and each
    /// `(placeholder, value)` pair is substituted literally.
    pub fn build_url(&self, template: &str, substitutions: &[(&str, &str)]) -> String {
        let path = substitutions.iter().fold(
            template.replace("{authKey}", &self.api_key),
            |path, &(placeholder, value)| path.replace(placeholder, value),
        );
        format!("{}{}", self.base_url, path)
    }

    /// GET `url` and return the validated `dataset` subtree.
    pub async fn fetch_dataset(
        &self,
        url: &str,
        dataset: &str,
    ) -> std::result::Result<Value, ToolError> {
        let response = self.http.get(url).send().await.map_err(|e| {
            let err = ToolError::from(e);
            error!("Request to {} failed: {}", dataset, err);
            err
        })?;

        let status = response.status();
        debug!("Received {} response: {}", dataset, status);
        if !status.is_success() {
            warn!("{} answered with HTTP {}", dataset, status);
            return Err(ToolError::Http {
                status: status.as_u16(),
            });
        }

        let mut payload: Value = response.json().await?;
        let data = payload
            .as_object_mut()
            .and_then(|body| body.remove(dataset))
            .ok_or_else(|| ToolError::format(dataset))?;

        let result = data
            .get("RESULT")
            .ok_or_else(|| ToolError::format(format!("{}.RESULT", dataset)))?;
        let code = result.get("CODE").and_then(Value::as_str).unwrap_or_default();
        if code != SUCCESS_CODE {
            let message = result
                .get("MESSAGE")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(ToolError::api(code, message));
        }

        let rows = data.get("row").and_then(|row| row.as_array()).map_or(0, Vec::len);
        let total = data
            .get("list_total_count")
            .map(ToString::to_string)
            .unwrap_or_default();
        debug!("{} returned {} of {} rows", dataset, rows, total);

        Ok(data)
    }
}
