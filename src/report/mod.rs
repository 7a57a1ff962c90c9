//! Output sinks. Each one takes a finished [`AnalysisReport`] and knows
//! nothing about how it was produced.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::OutputConfig;
use crate::core::pipeline::AnalysisReport;
use crate::Result;

pub mod plot;
pub mod tables;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPaths {
    pub raw: PathBuf,
    pub cleaned: PathBuf,
    pub results: PathBuf,
    pub plot: PathBuf,
}

/// Writes the three CSV tables and the plot, in that order. The first failure
/// aborts; files already written are left in place.
pub fn write_reports(report: &AnalysisReport, output: &OutputConfig) -> Result<ReportPaths> {
    fs::create_dir_all(&output.directory)?;

    let paths = ReportPaths {
        raw: output.raw_path(),
        cleaned: output.cleaned_path(),
        results: output.results_path(),
        plot: output.plot_path(),
    };

    tables::write_raw_file(&paths.raw, &report.raw_ads)?;
    tables::write_cleaned_file(&paths.cleaned, &report.cleaned_ads)?;
    tables::write_results_file(&paths.results, &report.valuations)?;
    plot::write_svg_file(&paths.plot, report)?;

    Ok(paths)
}
