use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

// ---------------------------------------------------------------------------
// Query Parameter Set
// ---------------------------------------------------------------------------

/// An ordered set of query parameters.
///
/// Parameters are sent in insertion order. Keys and values are not validated
/// locally; the remote service is the only validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter. Re-inserting an existing key replaces its value
    /// without moving it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Builder form of [`QueryParams::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Append every parameter of `extra` whose key is not already present.
    ///
    /// Keys already in `self` win: an extra that shadows one is dropped.
    pub fn merge(&mut self, extra: QueryParams) {
        for (key, value) in extra.pairs {
            if self.contains(&key) {
                warn!(key = %key, "Ignoring optional parameter that shadows a required one");
                continue;
            }
            self.pairs.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parameter names in wire order.
    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    // -- Documented optional parameters --

    pub fn exchange(self, exchange: &str) -> Self {
        self.with("exchange", exchange)
    }

    pub fn currency(self, currency: &str) -> Self {
        self.with("currency", currency)
    }

    pub fn instrument(self, instrument: &str) -> Self {
        self.with("instrument", instrument)
    }

    pub fn timestamp(self, timestamp: impl Into<DateParam>) -> Self {
        let value: DateParam = timestamp.into();
        self.with("timestamp", value)
    }

    pub fn start_date(self, start: impl Into<DateParam>) -> Self {
        let value: DateParam = start.into();
        self.with("startDate", value)
    }

    pub fn end_date(self, end: impl Into<DateParam>) -> Self {
        let value: DateParam = end.into();
        self.with("endDate", value)
    }

    pub fn time_format(self, format: TimeFormat) -> Self {
        self.with("timeFormat", format)
    }

    pub fn time_interval(self, interval: TimeInterval) -> Self {
        self.with("timeInterval", interval)
    }

    /// Aggregation window for futures/perpetuals statistics, e.g. `12h` or `7d`.
    pub fn time_frame(self, frame: &str) -> Self {
        self.with("timeFrame", frame)
    }

    pub fn put_call(self, put_call: PutCall) -> Self {
        self.with("putCall", put_call)
    }

    pub fn strike(self, strike: i64) -> Self {
        self.with("strike", strike)
    }

    pub fn is_atm(self, is_atm: bool) -> Self {
        self.with("isAtm", if is_atm { "TRUE" } else { "FALSE" })
    }

    pub fn days_to_expiration_start(self, days: u32) -> Self {
        self.with("daysToExpirationStart", days)
    }

    pub fn days_to_expiration_end(self, days: u32) -> Self {
        self.with("daysToExpirationEnd", days)
    }

    pub fn margin_type(self, margin_type: MarginType) -> Self {
        self.with("marginType", margin_type)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Date Parameters
// ---------------------------------------------------------------------------

/// A value for `timestamp`, `startDate` or `endDate`.
///
/// The service accepts Unix seconds, Unix milliseconds or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParam {
    Seconds(i64),
    Milliseconds(i64),
    Iso(String),
}

impl DateParam {
    pub fn seconds(secs: i64) -> Self {
        DateParam::Seconds(secs)
    }

    pub fn millis(ms: i64) -> Self {
        DateParam::Milliseconds(ms)
    }
}

impl fmt::Display for DateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateParam::Seconds(s) => write!(f, "{}", s),
            DateParam::Milliseconds(ms) => write!(f, "{}", ms),
            DateParam::Iso(s) => f.write_str(s),
        }
    }
}

impl From<DateTime<Utc>> for DateParam {
    fn from(dt: DateTime<Utc>) -> Self {
        DateParam::Iso(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

impl From<&str> for DateParam {
    fn from(s: &str) -> Self {
        DateParam::Iso(s.to_string())
    }
}

impl From<String> for DateParam {
    fn from(s: String) -> Self {
        DateParam::Iso(s)
    }
}

impl FromStr for DateParam {
    type Err = std::convert::Infallible;

    /// All-digit input of 13 or more characters is read as milliseconds,
    /// shorter all-digit input as seconds, anything else is passed through.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = s.parse::<i64>() {
                return Ok(if s.len() >= 13 {
                    DateParam::Milliseconds(n)
                } else {
                    DateParam::Seconds(n)
                });
            }
        }
        Ok(DateParam::Iso(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Enumerated Parameter Values
// ---------------------------------------------------------------------------

/// How timestamp fields are rendered in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// Epoch milliseconds (service default).
    #[default]
    Milliseconds,
    Ms,
    Iso,
    Iso8601,
    /// Human readable, e.g. `2024-04-01 00:00:00 000`.
    Hr,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::Milliseconds => "milliseconds",
            TimeFormat::Ms => "ms",
            TimeFormat::Iso => "iso",
            TimeFormat::Iso8601 => "iso8601",
            TimeFormat::Hr => "hr",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "milliseconds" => Ok(TimeFormat::Milliseconds),
            "ms" => Ok(TimeFormat::Ms),
            "iso" => Ok(TimeFormat::Iso),
            "iso8601" => Ok(TimeFormat::Iso8601),
            "hr" => Ok(TimeFormat::Hr),
            other => Err(format!(
                "unknown time format '{}' (expected milliseconds, ms, iso, iso8601 or hr)",
                other
            )),
        }
    }
}

/// Sampling interval for quotes and delta surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeInterval {
    Minute,
    Hour,
    Day,
}

impl TimeInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInterval::Minute => "minute",
            TimeInterval::Hour => "hour",
            TimeInterval::Day => "day",
        }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" => Ok(TimeInterval::Minute),
            "hour" => Ok(TimeInterval::Hour),
            "day" => Ok(TimeInterval::Day),
            other => Err(format!(
                "unknown time interval '{}' (expected minute, hour or day)",
                other
            )),
        }
    }
}

/// Collateral type of a futures/perpetuals contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginType {
    Coins,
    Stables,
}

impl MarginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginType::Coins => "coins",
            MarginType::Stables => "stables",
        }
    }
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PutCall {
    Call,
    Put,
}

impl fmt::Display for PutCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutCall::Call => f.write_str("C"),
            PutCall::Put => f.write_str("P"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_insertion_order_preserved() {
        let params = QueryParams::new()
            .with("exchange", "deribit")
            .with("currency", "BTC")
            .with("strike", 100000)
            .with("putCall", "C");
        assert_eq!(params.keys(), vec!["exchange", "currency", "strike", "putCall"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = QueryParams::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        assert_eq!(params.keys(), vec!["a", "b"]);
        assert_eq!(params.get("a"), Some("3"));
    }

    #[test]
    fn test_merge_does_not_override_required() {
        let mut params = QueryParams::new()
            .with("exchange", "deribit")
            .with("currency", "BTC");
        let extra = QueryParams::new()
            .with("currency", "ETH")
            .time_format(TimeFormat::Iso);
        params.merge(extra);

        assert_eq!(params.get("currency"), Some("BTC"));
        assert_eq!(params.keys(), vec!["exchange", "currency", "timeFormat"]);
    }

    #[test]
    fn test_typed_builders() {
        let params = QueryParams::new()
            .is_atm(true)
            .put_call(PutCall::Put)
            .time_interval(TimeInterval::Hour)
            .margin_type(MarginType::Stables)
            .days_to_expiration_start(7)
            .days_to_expiration_end(60);
        assert_eq!(params.get("isAtm"), Some("TRUE"));
        assert_eq!(params.get("putCall"), Some("P"));
        assert_eq!(params.get("timeInterval"), Some("hour"));
        assert_eq!(params.get("marginType"), Some("stables"));
        assert_eq!(params.get("daysToExpirationStart"), Some("7"));
        assert_eq!(params.get("daysToExpirationEnd"), Some("60"));
    }

    #[test]
    fn test_date_param_rendering() {
        let dt = Utc.with_ymd_and_hms(2024, 4, 3, 8, 14, 0).unwrap();
        assert_eq!(DateParam::from(dt).to_string(), "2024-04-03T08:14:00");
        assert_eq!(DateParam::seconds(1578531600).to_string(), "1578531600");
        assert_eq!(DateParam::millis(1578531600000).to_string(), "1578531600000");
    }

    #[test]
    fn test_date_param_from_str() {
        assert_eq!(
            "1578531600".parse::<DateParam>().unwrap(),
            DateParam::Seconds(1578531600)
        );
        assert_eq!(
            "1578531600000".parse::<DateParam>().unwrap(),
            DateParam::Milliseconds(1578531600000)
        );
        assert_eq!(
            "2024-04-01T00:00:00".parse::<DateParam>().unwrap(),
            DateParam::Iso("2024-04-01T00:00:00".to_string())
        );
    }

    #[test]
    fn test_time_format_strings() {
        for format in [
            TimeFormat::Milliseconds,
            TimeFormat::Ms,
            TimeFormat::Iso,
            TimeFormat::Iso8601,
            TimeFormat::Hr,
        ] {
            assert_eq!(format.as_str().parse::<TimeFormat>(), Ok(format));
        }
        assert_eq!(TimeFormat::default(), TimeFormat::Milliseconds);
        assert!("epoch".parse::<TimeFormat>().is_err());
    }

    #[test]
    fn test_from_iterator() {
        let params: QueryParams = vec![("asset", "BTC"), ("timeFrame", "12h")]
            .into_iter()
            .collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("timeFrame"), Some("12h"));
    }
}
