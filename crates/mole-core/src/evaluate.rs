use crate::model::{Bounds, Metric, Sample, Status, CHEMICAL};
use crate::ranges::RangeTable;
use crate::schema::ResolvedTable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COMPLIANT_COMMENT: &str = "Within acceptable ranges.";
pub const UNKNOWN_CHEMICAL_COMMENT: &str = "No compliance data found.";

/// A metric that failed its range check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub metric: Metric,
    /// Observed value; `None` when the cell was missing or not numeric.
    pub value: Option<Decimal>,
    pub bounds: Bounds,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} not within acceptable range: {}.",
            self.metric.label(),
            self.bounds
        )
    }
}

/// Verdict for one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: Status,
    pub comment: String,
    pub violations: Vec<Violation>,
}

impl Evaluation {
    fn verdict(status: Status, comment: impl Into<String>) -> Self {
        Evaluation {
            status,
            comment: comment.into(),
            violations: Vec::new(),
        }
    }

    /// Verdict given to every row of a table lacking required columns.
    pub fn missing_columns(fields: &[String]) -> Self {
        let labels: Vec<&str> = fields.iter().map(|f| field_label(f)).collect();
        Evaluation::verdict(
            Status::Unknown,
            format!("Missing source columns: {}.", labels.join(", ")),
        )
    }
}

/// A sample together with its verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedSample {
    #[serde(flatten)]
    pub sample: Sample,
    pub status: Status,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl EvaluatedSample {
    pub fn new(sample: Sample, evaluation: Evaluation) -> Self {
        EvaluatedSample {
            sample,
            status: evaluation.status,
            comment: evaluation.comment,
            violations: evaluation.violations,
        }
    }
}

/// Evaluate one sample against the reference bounds of its chemical.
///
/// Every metric is checked in fixed order. A missing value counts as a
/// violation, so incomplete data never passes as compliant.
pub fn evaluate_sample(sample: &Sample, ranges: &RangeTable) -> Evaluation {
    let Some(entry) = sample.chemical_name().and_then(|c| ranges.get(c)) else {
        return Evaluation::verdict(Status::UnknownChemical, UNKNOWN_CHEMICAL_COMMENT);
    };

    let violations: Vec<Violation> = Metric::ALL
        .iter()
        .filter_map(|&metric| {
            let bounds = entry.bounds(metric);
            let value = *sample.measurements.get(metric);
            match value {
                Some(v) if bounds.contains(v) => None,
                _ => Some(Violation {
                    metric,
                    value,
                    bounds,
                }),
            }
        })
        .collect();

    if violations.is_empty() {
        return Evaluation::verdict(Status::Compliant, COMPLIANT_COMMENT);
    }

    let comment = violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    Evaluation {
        status: Status::NonCompliant,
        comment,
        violations,
    }
}

/// Evaluate plain samples, in order.
pub fn evaluate_samples(samples: &[Sample], ranges: &RangeTable) -> Vec<EvaluatedSample> {
    samples
        .iter()
        .map(|s| EvaluatedSample::new(s.clone(), evaluate_sample(s, ranges)))
        .collect()
}

/// Required sample fields (chemical and the five metrics) that the source
/// table did not provide.
pub fn missing_required_columns(resolved: &ResolvedTable) -> Vec<String> {
    std::iter::once(CHEMICAL)
        .chain(Metric::ALL.iter().map(|m| m.field()))
        .filter(|f| resolved.is_missing(f))
        .map(str::to_string)
        .collect()
}

/// Evaluate every row of a resolved sample table.
///
/// When required columns are absent the check is made once for the whole
/// table and every row gets the same `UNKNOWN` verdict.
pub fn evaluate_table(resolved: &ResolvedTable, ranges: &RangeTable) -> Vec<EvaluatedSample> {
    let samples = resolved.to_samples();
    let missing = missing_required_columns(resolved);

    if !missing.is_empty() {
        log::warn!(
            "sample table lacks required column(s) {}; all {} row(s) marked {}",
            missing.join(", "),
            samples.len(),
            Status::Unknown
        );
        let verdict = Evaluation::missing_columns(&missing);
        return samples
            .into_iter()
            .map(|s| EvaluatedSample::new(s, verdict.clone()))
            .collect();
    }

    evaluate_samples(&samples, ranges)
}

/// Human-readable name for a canonical sample field.
pub fn field_label(field: &str) -> &str {
    if field == CHEMICAL {
        return "Chemical";
    }
    if field == crate::model::SAMPLE_ID {
        return "Sample ID";
    }
    Metric::ALL
        .iter()
        .find(|m| m.field() == field)
        .map(|m| m.label())
        .unwrap_or(field)
}
