//! One full run: fetch every page, classify, report.

use tracing::info;
use vitals_client::{ClientResult, Collection, PatientClient};
use vitals_core::{ReportBuilder, ReportSummary, RiskReport};

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The finalized report.
    pub report: RiskReport,
    /// Per-list counts.
    pub summary: ReportSummary,
    /// Total declared by the server's first page.
    pub declared_total: Option<u64>,
    /// Pages fetched.
    pub pages_fetched: u32,
}

impl RunOutcome {
    /// `(declared, actual)` when the declared total disagrees with what was classified.
    pub fn count_mismatch(&self) -> Option<(u64, usize)> {
        let declared = self.declared_total?;
        let actual = self.summary.patients_assessed.unwrap_or_default();
        (declared != actual as u64).then_some((declared, actual))
    }
}

/// Classify everything a pagination run collected.
pub fn classify(collection: Collection) -> RunOutcome {
    let (report, summary) = ReportBuilder::new()
        .absorb(&collection.records)
        .finish_with_summary();

    RunOutcome {
        report,
        summary,
        declared_total: collection.declared_total,
        pages_fetched: collection.pages_fetched,
    }
}

/// Fetch all pages and classify them.
pub async fn run(client: &PatientClient) -> ClientResult<RunOutcome> {
    let collection = client.collect_all_records().await?;
    let outcome = classify(collection);
    info!(summary = %outcome.summary, "Classification complete");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use vitals_client::ClientConfig;
    use vitals_core::PatientRecord;
    use vitals_retries::mock::{RecordingSleeper, ScriptedTransport};

    #[test]
    fn test_classify_collection() {
        let collection = Collection {
            records: vec![
                PatientRecord::new("A").blood_pressure("142/91").temperature(100.1).age(67),
                PatientRecord::new("B").temperature(98.0),
            ],
            declared_total: Some(3),
            pages_fetched: 1,
        };

        let outcome = classify(collection);

        assert_eq!(outcome.report.high_risk_patients.len(), 1);
        assert_eq!(outcome.summary.patients_assessed, Some(2));
        assert_eq!(outcome.count_mismatch(), Some((3, 2)));
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_json(&json!({
                    "data": [
                        { "patient_id": "P1", "blood_pressure": "135/85", "temperature": 99.8, "age": 50 },
                        { "patient_id": "P2", "blood_pressure": "135/85", "temperature": 98.6, "age": 50 }
                    ],
                    "pagination": { "total": 3, "hasNext": true }
                }))
                .respond_json(&json!({
                    "data": [
                        { "patient_id": "P3", "blood_pressure": null, "temperature": "abc" }
                    ],
                    "pagination": { "total": 3, "hasNext": false }
                })),
        );
        let config = ClientConfig::with_api_key("k").base_url("http://api.test").unwrap();
        let client = PatientClient::with_transport(config, transport)
            .unwrap()
            .with_sleeper(Arc::new(RecordingSleeper::new()));

        let outcome = run(&client).await.unwrap();

        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.count_mismatch(), None);
        assert_eq!(
            serde_json::to_value(&outcome.report).unwrap(),
            json!({
                "high_risk_patients": ["P1"],
                "fever_patients": ["P1"],
                "data_quality_issues": ["P3"]
            })
        );
    }
}
