use crate::error::ClientError;
use amberdata_core::{ClientConfig, QueryParams, API_KEY_HEADER, REQUEST_TIMEOUT};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

/// Issues authenticated GET requests and decodes the JSON body.
///
/// Holds only immutable state, so one dispatcher can be cloned and shared
/// freely across tasks. No retries and no status-code branching: whatever JSON
/// the service returns is handed back untouched.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RequestDispatcher {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Url::parse(config.base_url())
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url(), e)))?;

        let mut api_key =
            HeaderValue::from_str(config.api_key()).map_err(|_| ClientError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(API_KEY_HEADER, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build `<base>/<path>?<k1=v1&k2=v2...>` with parameters in insertion
    /// order. Keys and values are form-urlencoded.
    pub fn build_url(&self, path: &str, params: &QueryParams) -> Result<Url, ClientError> {
        let raw = format!(
            "{}/{}",
            self.config.base_url(),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    /// One GET round trip. Non-2xx responses are still decoded and returned.
    pub async fn get(&self, path: &str, params: &QueryParams) -> Result<Value, ClientError> {
        let url = self.build_url(path, params)?;
        debug!(path = %path, params = params.len(), "Dispatching request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            debug!(
                path = %path,
                status = status.as_u16(),
                "Service returned a non-success status"
            );
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(base_url: &str) -> RequestDispatcher {
        RequestDispatcher::new(ClientConfig::new("test-key").with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_build_url_preserves_order() {
        let d = dispatcher("https://api.amberdata.com");
        let params = QueryParams::new()
            .with("exchange", "deribit")
            .with("currency", "BTC")
            .with("timeFormat", "iso");
        let url = d
            .build_url("markets/derivatives/analytics/level-1-quotes", &params)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.amberdata.com/markets/derivatives/analytics/level-1-quotes\
             ?exchange=deribit&currency=BTC&timeFormat=iso"
        );
    }

    #[test]
    fn test_build_url_encodes_values() {
        let d = dispatcher("https://api.amberdata.com");
        let params = QueryParams::new()
            .with("startDate", "2024-04-01T00:00:00")
            .with("note", "a&b c");
        let url = d.build_url("some/path", &params).unwrap();
        assert_eq!(
            url.query(),
            Some("startDate=2024-04-01T00%3A00%3A00&note=a%26b+c")
        );

        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(decoded[0], ("startDate".into(), "2024-04-01T00:00:00".into()));
        assert_eq!(decoded[1], ("note".into(), "a&b c".into()));
    }

    #[test]
    fn test_build_url_without_params() {
        let d = dispatcher("http://127.0.0.1:9000/");
        let url = d.build_url("/a/b", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/a/b");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = RequestDispatcher::new(ClientConfig::new("k").with_base_url("not a url"));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_api_key() {
        let result = RequestDispatcher::new(ClientConfig::new("bad\nkey"));
        assert!(matches!(result, Err(ClientError::InvalidApiKey)));
    }
}
