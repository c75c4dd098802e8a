use crate::aggregate::{ChemicalSummary, ReportScore};
use crate::error::MoleError;
use crate::evaluate::{field_label, EvaluatedSample};
use crate::model::{Metric, Status};
use serde::{Deserialize, Serialize};

/// Everything a renderer needs: evaluated rows in source order, per-chemical
/// summaries in name order, and the whole-report score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub samples: Vec<EvaluatedSample>,
    pub summaries: Vec<ChemicalSummary>,
    pub score: ReportScore,
    /// Required sample fields the source did not provide. When non-empty,
    /// every sample carries an UNKNOWN verdict.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_sample_columns: Vec<String>,
}

impl ComplianceReport {
    /// False when the sample table could not be scored at all.
    pub fn is_scoreable(&self) -> bool {
        self.missing_sample_columns.is_empty()
    }

    /// Human-readable names of the missing sample columns.
    pub fn missing_labels(&self) -> Vec<&str> {
        self.missing_sample_columns
            .iter()
            .map(|f| field_label(f))
            .collect()
    }

    /// Turn a schema gap into an error, for callers that treat it as fatal
    /// after the report has been shown.
    pub fn require_scoreable(&self) -> Result<(), MoleError> {
        if self.is_scoreable() {
            return Ok(());
        }
        Err(MoleError::MissingSampleColumns {
            missing: self.missing_labels().iter().map(|l| l.to_string()).collect(),
        })
    }

    pub fn count(&self, status: Status) -> usize {
        self.samples.iter().filter(|s| s.status == status).count()
    }
}

/// Header row of the evaluated sample table.
pub fn table_header() -> Vec<String> {
    let mut header = vec!["SAMPLE ID".to_string(), "CHEMICAL".to_string()];
    header.extend(Metric::ALL.iter().map(|m| m.column_title().to_string()));
    header.push("STATUS".into());
    header.push("COMMENT".into());
    header
}

/// One output row per sample: canonical columns, then status and comment.
/// Missing values are empty strings.
pub fn table_row(sample: &EvaluatedSample) -> Vec<String> {
    let s = &sample.sample;
    let mut row = vec![
        s.sample_id.clone().unwrap_or_default(),
        s.chemical.clone().unwrap_or_default(),
    ];
    row.extend(
        s.measurements
            .iter()
            .map(|(_, v)| v.map(|d| d.to_string()).unwrap_or_default()),
    );
    row.push(sample.status.to_string());
    row.push(sample.comment.clone());
    row
}
