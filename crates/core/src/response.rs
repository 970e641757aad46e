use serde_json::Value;

/// Read-only view over a decoded response body.
///
/// The service wraps results as
/// `{"status": 200, "title": "OK", "description": "...", "payload": {"data": [...]}}`
/// and reports application errors in the same envelope with a 4xx status.
/// Nothing here validates the shape; every accessor returns `None` when the
/// field is missing.
#[derive(Debug, Clone, Copy)]
pub struct ApiResponse<'a> {
    body: &'a Value,
}

impl<'a> ApiResponse<'a> {
    pub fn new(body: &'a Value) -> Self {
        Self { body }
    }

    pub fn status(&self) -> Option<u16> {
        self.body
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    pub fn title(&self) -> Option<&'a str> {
        self.body.get("title").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.body.get("description").and_then(Value::as_str)
    }

    pub fn payload(&self) -> Option<&'a Value> {
        self.body.get("payload")
    }

    /// `true` when the envelope reports a 4xx/5xx status or an `error` flag.
    pub fn is_error(&self) -> bool {
        if self.status().map(|s| s >= 400).unwrap_or(false) {
            return true;
        }
        self.body
            .get("error")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Result rows: `payload.data` when present, otherwise `payload` itself if
    /// it is an array.
    pub fn data(&self) -> Option<&'a [Value]> {
        let payload = self.payload()?;
        payload
            .get("data")
            .unwrap_or(payload)
            .as_array()
            .map(Vec::as_slice)
    }

    /// Number of result rows (zero when there is no data array).
    pub fn len(&self) -> usize {
        self.data().map(<[Value]>::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = json!({
            "status": 200,
            "title": "OK",
            "description": "Successful request",
            "payload": {
                "metadata": {"api-version": "2023-09-30"},
                "data": [
                    {"underlying": "BTC", "timestamp": 1711929600000u64},
                    {"underlying": "BTC", "timestamp": 1711933200000u64}
                ]
            }
        });
        let response = ApiResponse::new(&body);
        assert_eq!(response.status(), Some(200));
        assert_eq!(response.title(), Some("OK"));
        assert!(!response.is_error());
        assert_eq!(response.len(), 2);
        assert_eq!(response.data().unwrap()[0]["underlying"], "BTC");
    }

    #[test]
    fn test_error_envelope() {
        let body = json!({
            "status": 400,
            "title": "Bad Request",
            "description": "Invalid parameter: invalid"
        });
        let response = ApiResponse::new(&body);
        assert!(response.is_error());
        assert_eq!(response.description(), Some("Invalid parameter: invalid"));
        assert!(response.data().is_none());
        assert!(response.is_empty());
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let body = json!({"status": 200, "payload": {"data": []}});
        let response = ApiResponse::new(&body);
        assert!(!response.is_error());
        assert!(response.is_empty());
    }

    #[test]
    fn test_payload_array_without_data_key() {
        let body = json!({"status": 200, "payload": [1, 2, 3]});
        assert_eq!(ApiResponse::new(&body).len(), 3);
    }

    #[test]
    fn test_scalar_body() {
        let body = json!("unexpected");
        let response = ApiResponse::new(&body);
        assert_eq!(response.status(), None);
        assert!(!response.is_error());
        assert!(response.data().is_none());
    }
}
