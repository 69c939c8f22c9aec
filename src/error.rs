use crate::models::ClassLevel;

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// Required configuration missing; raised before any network call.
    #[error("sheets configuration is incomplete: {} must be set", .missing.join(", "))]
    Config { missing: Vec<String> },

    /// Every candidate range failed; carries the last attempt's detail.
    #[error("failed to fetch {class} data from any range; last error: {detail}")]
    AllRangesFailed { class: ClassLevel, detail: String },

    /// A single-range request (detail reads) failed.
    #[error("request for range {range} failed: {detail}")]
    Request { range: String, detail: String },

    /// An empty sheet for a class whose exam is already underway.
    #[error("no score data found for {class}")]
    NoData { class: ClassLevel },
}
