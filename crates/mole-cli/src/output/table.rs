use mole_core::aggregate::ChemicalSummary;
use mole_core::evaluate::EvaluatedSample;
use mole_core::model::Status;
use mole_core::report::ComplianceReport;

pub fn print(report: &ComplianceReport, show_all: bool, verbose: bool) {
    if !report.is_scoreable() {
        println!(
            "  Sample table lacks: {}. Every row is {}.\n",
            report.missing_labels().join(", "),
            Status::Unknown
        );
    }

    print_samples(report, show_all, verbose);
    print_summaries(report, verbose);

    println!(
        "  Score: {} (normalized {})",
        report.score.raw, report.score.normalized
    );
}

fn print_samples(report: &ComplianceReport, show_all: bool, verbose: bool) {
    let to_show: Vec<(usize, &EvaluatedSample)> = report
        .samples
        .iter()
        .enumerate()
        .filter(|(_, s)| show_all || s.status != Status::Compliant)
        .collect();

    if to_show.is_empty() {
        println!("  All {} sample(s) compliant.\n", report.samples.len());
        return;
    }

    let heading = if show_all {
        "Samples:"
    } else {
        "Samples needing attention:"
    };
    println!("=== {heading} ===\n");

    let labels: Vec<String> = to_show.iter().map(|(i, s)| sample_label(*i, s)).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(10);

    for ((_, sample), label) in to_show.iter().zip(&labels) {
        println!(
            "  {:<width$}  {:<16}  {}",
            label,
            sample.status.as_str(),
            sample.comment,
            width = label_width
        );
        if verbose {
            for v in &sample.violations {
                let observed = v
                    .value
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "missing".to_string());
                println!("      {}: {} (allowed {})", v.metric.label(), observed, v.bounds);
            }
        }
    }
    println!();
}

/// "S-1 Acetone", falling back to the 1-based row number when a sample has
/// no id.
fn sample_label(index: usize, sample: &EvaluatedSample) -> String {
    let id = sample
        .sample
        .sample_id
        .clone()
        .unwrap_or_else(|| format!("#{}", index + 1));
    match sample.sample.chemical_name() {
        Some(chemical) => format!("{id} {chemical}"),
        None => id,
    }
}

fn print_summaries(report: &ComplianceReport, verbose: bool) {
    if report.summaries.is_empty() {
        println!("  No chemicals to summarize.\n");
        return;
    }

    println!("=== Chemicals ===\n");

    let name_width = report
        .summaries
        .iter()
        .map(|s| s.chemical.chars().count())
        .max()
        .unwrap_or(10)
        .max("Chemical".len());

    println!(
        "  {:<width$}  {:>7}  {:>9}  {:>7}  Priority",
        "Chemical",
        "Samples",
        "Compliant",
        "Ratio",
        width = name_width
    );
    for summary in &report.summaries {
        println!(
            "  {:<width$}  {:>7}  {:>9}  {:>7}  {}",
            summary.chemical,
            summary.total,
            summary.compliant,
            summary.ratio.round_dp(4).to_string(),
            summary.priority,
            width = name_width
        );
        if verbose {
            print_stats(summary);
        }
    }
    println!();
}

fn print_stats(summary: &ChemicalSummary) {
    for (metric, stats) in summary.stats.iter() {
        match (stats.min, stats.max, stats.mean) {
            (Some(min), Some(max), Some(mean)) => println!(
                "      {}: {} observed, min {}, max {}, mean {}",
                metric.label(),
                stats.observed,
                min,
                max,
                mean
            ),
            _ => println!("      {}: no values", metric.label()),
        }
    }
}
