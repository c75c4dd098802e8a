use crate::evaluate::EvaluatedSample;
use crate::model::{PerMetric, Status};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ratios strictly below this are HIGH priority.
pub const HIGH_PRIORITY_BELOW: Decimal = Decimal::from_parts(45, 0, 0, false, 2);
/// Ratios strictly above this are LOW priority.
pub const LOW_PRIORITY_ABOVE: Decimal = Decimal::from_parts(55, 0, 0, false, 2);

const MEAN_DP: u32 = 6;

/// Remediation priority for a chemical, from its compliance ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// ratio < 0.45 is HIGH, ratio > 0.55 is LOW, anything in between
    /// (both ends included) is MEDIUM.
    pub fn from_ratio(ratio: Decimal) -> Priority {
        if ratio < HIGH_PRIORITY_BELOW {
            Priority::High
        } else if ratio > LOW_PRIORITY_ABOVE {
            Priority::Low
        } else {
            Priority::Medium
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

/// Descriptive statistics of the values observed for one metric.
///
/// These describe the submitted batch, not the configured acceptable range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricStats {
    /// Number of non-missing values.
    pub observed: usize,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub mean: Option<Decimal>,
}

impl MetricStats {
    /// The mean is `None` when the running sum leaves the `Decimal` range.
    pub fn from_values(values: impl IntoIterator<Item = Decimal>) -> Self {
        let mut stats = MetricStats::default();
        let mut sum = Some(Decimal::ZERO);
        for v in values {
            stats.observed += 1;
            sum = sum.and_then(|s| s.checked_add(v));
            stats.min = Some(stats.min.map_or(v, |m| m.min(v)));
            stats.max = Some(stats.max.map_or(v, |m| m.max(v)));
        }
        if stats.observed > 0 {
            match sum {
                Some(sum) => {
                    stats.mean = Some((sum / Decimal::from(stats.observed)).round_dp(MEAN_DP))
                }
                None => log::warn!(
                    "sum of {} observed value(s) overflows; mean left empty",
                    stats.observed
                ),
            }
        }
        stats
    }
}

/// Compliance roll-up for one chemical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemicalSummary {
    pub chemical: String,
    pub total: usize,
    pub compliant: usize,
    /// Every sample that is not COMPLIANT, including UNKNOWN verdicts.
    pub non_compliant: usize,
    /// compliant / total, 0 when there are no samples.
    pub ratio: Decimal,
    pub priority: Priority,
    pub stats: PerMetric<MetricStats>,
}

impl ChemicalSummary {
    pub fn from_samples(chemical: &str, samples: &[&EvaluatedSample]) -> Self {
        let total = samples.len();
        let compliant = samples
            .iter()
            .filter(|s| s.status == Status::Compliant)
            .count();
        let ratio = if total == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(compliant) / Decimal::from(total)
        };
        let stats = PerMetric::from_fn(|m| {
            MetricStats::from_values(samples.iter().filter_map(|s| *s.sample.measurements.get(m)))
        });

        ChemicalSummary {
            chemical: chemical.to_string(),
            total,
            compliant,
            non_compliant: total - compliant,
            ratio,
            priority: Priority::from_ratio(ratio),
            stats,
        }
    }
}

/// Whole-report score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportScore {
    /// Sum over chemicals of ratio × total / 100. Not divided by the overall
    /// sample count, so it grows with batch size.
    pub raw: Decimal,
    /// Sample-weighted mean ratio: Σ(ratio × total) / Σ total.
    pub normalized: Decimal,
}

impl ReportScore {
    pub fn from_summaries(summaries: &[ChemicalSummary]) -> Self {
        // ratio × total is the compliant count; summing counts keeps both
        // figures exact where summing ratios would not be.
        let compliant: usize = summaries.iter().map(|s| s.compliant).sum();
        let total: usize = summaries.iter().map(|s| s.total).sum();
        let raw = Decimal::from(compliant) / Decimal::ONE_HUNDRED;
        let normalized = if total == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(compliant) / Decimal::from(total)
        };
        ReportScore { raw, normalized }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    /// One summary per distinct chemical, sorted by name.
    pub summaries: Vec<ChemicalSummary>,
    pub score: ReportScore,
}

/// Group evaluated samples by exact chemical name and summarize each group.
///
/// Samples without a chemical name belong to no group.
pub fn aggregate(samples: &[EvaluatedSample]) -> Aggregation {
    let mut groups: BTreeMap<&str, Vec<&EvaluatedSample>> = BTreeMap::new();
    let mut unattributed = 0usize;

    for sample in samples {
        match sample.sample.chemical_name() {
            Some(chemical) => groups.entry(chemical).or_default().push(sample),
            None => unattributed += 1,
        }
    }

    if unattributed > 0 {
        log::debug!("{unattributed} sample(s) without a chemical name left out of summaries");
    }

    let summaries: Vec<ChemicalSummary> = groups
        .iter()
        .map(|(chemical, group)| ChemicalSummary::from_samples(chemical, group))
        .collect();
    let score = ReportScore::from_summaries(&summaries);

    Aggregation { summaries, score }
}
