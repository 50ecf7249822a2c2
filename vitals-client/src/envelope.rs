//! Page envelope returned by `GET /patients`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vitals_core::PatientRecord;

use crate::error::{ClientError, ClientResult};

/// One page of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope {
    /// Records on this page, in server order.
    #[serde(alias = "records")]
    pub data: Vec<PatientRecord>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Records across all pages, as declared by the server.
    #[serde(default)]
    pub total: Option<u64>,
    /// Whether another page follows. Absent means no further page.
    #[serde(default, alias = "hasMore")]
    pub has_next: bool,
    /// Page number echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Page size echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Page count, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl PageEnvelope {
    /// Parse a 2xx body, reporting structural problems against `page`.
    pub fn parse(body: &str, page: u32) -> ClientResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ClientError::malformed(page, format!("body is not JSON: {e}")))?;

        let Value::Object(map) = &value else {
            return Err(ClientError::malformed(page, "body is not a JSON object"));
        };
        if !map.contains_key("data") && !map.contains_key("records") {
            return Err(ClientError::malformed(page, "missing data"));
        }
        if !map.contains_key("pagination") {
            return Err(ClientError::malformed(page, "missing pagination"));
        }

        serde_json::from_value(value).map_err(|e| ClientError::malformed(page, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_page() {
        let body = json!({
            "data": [
                { "patient_id": "DEMO001", "age": 45 },
                { "patient_id": "DEMO002", "temperature": "TEMP_ERROR" }
            ],
            "pagination": {
                "page": 1, "limit": 10, "total": 47, "totalPages": 5,
                "hasNext": true, "hasPrevious": false
            },
            "metadata": { "timestamp": "2025-07-15T23:01:05.059Z" }
        })
        .to_string();

        let envelope = PageEnvelope::parse(&body, 1).unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[1].patient_id, "DEMO002");
        assert_eq!(envelope.pagination.total, Some(47));
        assert_eq!(envelope.pagination.total_pages, Some(5));
        assert!(envelope.pagination.has_next);
    }

    #[test]
    fn test_parse_aliases() {
        let body = json!({
            "records": [],
            "pagination": { "total": 0, "hasMore": false }
        })
        .to_string();

        let envelope = PageEnvelope::parse(&body, 1).unwrap();
        assert!(envelope.data.is_empty());
        assert!(!envelope.pagination.has_next);
    }

    #[test]
    fn test_missing_pagination() {
        let err = PageEnvelope::parse(r#"{"data": []}"#, 2).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("missing pagination"));
    }

    #[test]
    fn test_missing_records() {
        let err = PageEnvelope::parse(r#"{"pagination": {"hasNext": false}}"#, 1).unwrap_err();
        assert!(err.to_string().contains("missing data"));
    }

    #[test]
    fn test_not_json() {
        let err = PageEnvelope::parse("<html>oops</html>", 4).unwrap_err();
        assert!(matches!(err, ClientError::MalformedEnvelope { page: 4, .. }));
    }

    #[test]
    fn test_missing_has_next_ends_pagination() {
        let envelope = PageEnvelope::parse(r#"{"data": [], "pagination": {"total": 3}}"#, 1).unwrap();
        assert!(!envelope.pagination.has_next);
        assert_eq!(envelope.pagination.total, Some(3));
    }
}
