use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::models::{CleanedAd, CleanedAdRow, RawAd, RawAdRow, Valuation, ValuationRow};
use crate::Result;

pub const RAW_HEADERS: [&str; 3] = ["url", "price", "mileage"];
pub const CLEANED_HEADERS: [&str; 3] = ["url", "price", "mileage"];
pub const RESULTS_HEADERS: [&str; 5] = ["url", "price", "mileage", "under_over_valued", "potential_roi"];

/// Header row is written even when there are no records.
fn write_rows<W, R, I>(out: W, headers: &[&str], rows: I) -> Result<()>
where
    W: Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_raw<W: Write>(out: W, ads: &[RawAd]) -> Result<()> {
    write_rows(out, &RAW_HEADERS, ads.iter().map(RawAdRow::from))
}

pub fn write_cleaned<W: Write>(out: W, ads: &[CleanedAd]) -> Result<()> {
    write_rows(out, &CLEANED_HEADERS, ads.iter().map(CleanedAdRow::from))
}

pub fn write_results<W: Write>(out: W, valuations: &[Valuation]) -> Result<()> {
    write_rows(out, &RESULTS_HEADERS, valuations.iter().map(ValuationRow::from))
}

pub fn write_raw_file(path: &Path, ads: &[RawAd]) -> Result<()> {
    write_raw(File::create(path)?, ads)?;
    info!(path = %path.display(), rows = ads.len(), "Raw ads saved");
    Ok(())
}

pub fn write_cleaned_file(path: &Path, ads: &[CleanedAd]) -> Result<()> {
    write_cleaned(File::create(path)?, ads)?;
    info!(path = %path.display(), rows = ads.len(), "Cleaned ads saved");
    Ok(())
}

pub fn write_results_file(path: &Path, valuations: &[Valuation]) -> Result<()> {
    write_results(File::create(path)?, valuations)?;
    info!(path = %path.display(), rows = valuations.len(), "Valuation results saved");
    Ok(())
}
