use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SheetsConfig;
use crate::error::SheetsError;
use crate::models::{ClassLevel, Student};
use crate::{parse, rank};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Successful values payload: a sequence of ragged row arrays. The field is
/// absent entirely when the range holds no data.
#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Read-only client for the spreadsheet values endpoint. Owns its config;
/// nothing here reads the environment.
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
    base_url: String,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(config: SheetsConfig, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            base_url,
        }
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    /// Fetch, parse, and rank the leaderboard for one class.
    ///
    /// Candidate ranges are tried in order until one returns a decodable
    /// 2xx payload; if every attempt fails the error carries the last
    /// attempt's detail. An empty sheet is an empty leaderboard for a class
    /// whose exam has not started, and an error otherwise.
    pub async fn fetch_class(&self, class: ClassLevel) -> Result<Vec<Student>, SheetsError> {
        let (api_key, sheet_id) = self.config.require(class)?;

        let ranges = candidate_ranges(class, self.config.range_override(class));
        let mut last_error = String::from("no ranges attempted");
        let mut rows = None;

        for range in &ranges {
            match self.request_range(sheet_id, api_key, range).await {
                Ok(values) => {
                    debug!(%class, %range, rows = values.len(), "range fetch succeeded");
                    rows = Some(values);
                    break;
                }
                Err(detail) => {
                    debug!(%class, %range, %detail, "range fetch failed");
                    last_error = detail;
                }
            }
        }

        let Some(rows) = rows else {
            return Err(SheetsError::AllRangesFailed {
                class,
                detail: last_error,
            });
        };

        if rows.is_empty() {
            if class.empty_means_not_started() {
                return Ok(Vec::new());
            }
            return Err(SheetsError::NoData { class });
        }

        let mut students = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            match parse::parse_row(row, index, class) {
                Some(student) => students.push(student),
                None => warn!(row = index + 1, %class, "skipping row without a student name"),
            }
        }

        Ok(rank::rank_students(students))
    }

    /// One GET against the values endpoint. Errors come back as strings so
    /// the caller can fold them into its own error shape.
    pub(crate) async fn request_range(
        &self,
        sheet_id: &str,
        api_key: &str,
        range: &str,
    ) -> Result<Vec<Vec<Value>>, String> {
        let url = format!("{}/{}/values/{}", self.base_url, sheet_id, range);

        let response = self
            .http
            .get(&url)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(|err| format!("range \"{range}\": {err}"))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error)
                .map(|detail| detail.message)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(format!("range \"{range}\": {status} - {message}"));
        }

        let payload: ValuesResponse = response
            .json()
            .await
            .map_err(|err| format!("range \"{range}\": invalid payload: {err}"))?;

        Ok(payload.values)
    }
}

/// Ordered range candidates: the configured override first, then the quoted
/// tab span, the unquoted tab syntax, the whole-column span, and finally a
/// bare range against the first sheet. Plain iteration, no backoff.
pub fn candidate_ranges(class: ClassLevel, override_range: Option<&str>) -> Vec<String> {
    let tab = class.sheet_tab();
    let mut ranges = Vec::new();

    if let Some(range) = override_range {
        ranges.push(range.to_string());
    }
    ranges.push(format!("'{tab}'!A2:G60"));
    ranges.push(format!("{tab}!A2:G60"));
    ranges.push(format!("'{tab}'!A:G"));
    ranges.push("A2:G60".to_string());

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trend;
    use serde_json::json;
    use wiremock::matchers::{method, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> SheetsConfig {
        SheetsConfig {
            api_key: Some("test-key".to_string()),
            plus_one_sheet_id: Some("sheet-one".to_string()),
            plus_two_sheet_id: Some("sheet-two".to_string()),
            plus_one_range: None,
            plus_two_range: None,
        }
    }

    fn client(server: &MockServer) -> SheetsClient {
        SheetsClient::with_base_url(test_config(), server.uri())
    }

    #[test]
    fn override_range_is_tried_first() {
        let ranges = candidate_ranges(ClassLevel::PlusOne, Some("'Plus One'!A2:G30"));
        assert_eq!(ranges[0], "'Plus One'!A2:G30");
        assert_eq!(ranges.len(), 5);
    }

    #[test]
    fn default_ranges_cover_fallback_syntaxes() {
        let ranges = candidate_ranges(ClassLevel::PlusTwo, None);
        assert_eq!(
            ranges,
            vec![
                "'Plus Two'!A2:G60",
                "Plus Two!A2:G60",
                "'Plus Two'!A:G",
                "A2:G60",
            ]
        );
    }

    #[tokio::test]
    async fn fetch_parses_and_ranks_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/sheet-one/values/.*$"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [
                    ["Alice", "10", "20"],
                    ["", "5", "5"],
                    ["Bob", "30", "30"],
                ]
            })))
            .mount(&server)
            .await;

        let students = client(&server)
            .fetch_class(ClassLevel::PlusOne)
            .await
            .unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "Bob");
        assert_eq!(students[0].rank, 1);
        assert_eq!(students[0].trend, Trend::Stable);
        assert_eq!(students[1].name, "Alice");
        assert_eq!(students[1].rank, 2);
        assert_eq!(students[1].total_score, 30.0);
    }

    #[tokio::test]
    async fn falls_back_to_later_range_on_failure() {
        let server = MockServer::start().await;
        // The configured override is rejected, the next candidate succeeds.
        Mock::given(method("GET"))
            .and(path_regex(r"^/sheet-one/values/Scores!A2:G20$"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Unable to parse range" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [["Alice", "10"]]
            })))
            .mount(&server)
            .await;

        let mut config = test_config();
        config.plus_one_range = Some("Scores!A2:G20".to_string());
        let client = SheetsClient::with_base_url(config, server.uri());

        let students = client.fetch_class(ClassLevel::PlusOne).await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Alice");
        assert!(server.received_requests().await.unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn aggregated_error_carries_last_attempt_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "message": "API key not valid" }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_class(ClassLevel::PlusOne)
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, SheetsError::AllRangesFailed { .. }));
        assert!(message.contains("API key not valid"), "got: {message}");
        // Last attempt is the bare first-sheet range.
        assert!(message.contains("A2:G60"), "got: {message}");
    }

    #[tokio::test]
    async fn empty_plus_two_sheet_is_an_empty_leaderboard() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let students = client(&server)
            .fetch_class(ClassLevel::PlusTwo)
            .await
            .unwrap();
        assert!(students.is_empty());
    }

    #[tokio::test]
    async fn empty_plus_one_sheet_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": [] })))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_class(ClassLevel::PlusOne)
            .await
            .unwrap_err();
        assert!(matches!(err, SheetsError::NoData { .. }));
    }

    #[tokio::test]
    async fn missing_config_fails_before_any_request() {
        let server = MockServer::start().await;
        let client = SheetsClient::with_base_url(SheetsConfig::default(), server.uri());

        let err = client.fetch_class(ClassLevel::PlusOne).await.unwrap_err();
        assert!(matches!(err, SheetsError::Config { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
