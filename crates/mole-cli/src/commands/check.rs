use mole_core::error::MoleError;
use std::path::PathBuf;

use crate::commands::alias_config;
use crate::output;

pub struct CheckArgs {
    pub samples: PathBuf,
    pub ranges: PathBuf,
    pub aliases: Option<PathBuf>,
    pub output_format: String,
    pub out: Option<PathBuf>,
    pub show_all: bool,
    pub verbose: bool,
}

pub fn run(args: CheckArgs) -> Result<(), MoleError> {
    let config = alias_config(args.aliases.as_deref())?;
    let report = mole_core::check_files(&args.samples, &args.ranges, &config)?;

    match args.output_format.as_str() {
        "json" => output::json::print(&report)?,
        _ => output::table::print(&report, args.show_all, args.verbose),
    }

    if let Some(ref path) = args.out {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            output::json::write(&report, path)?;
        } else {
            output::csv::write(&report, path)?;
        }
        log::info!("wrote {} row(s) to {}", report.samples.len(), path.display());
    }

    // The report stays inspectable even when the sample schema is incomplete,
    // but the run still fails.
    report.require_scoreable()
}
