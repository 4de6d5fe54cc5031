//! Reporting and history for footprint results.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculator::FootprintResult;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One row of the footprint history CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintRecord {
    pub timestamp: DateTime<Utc>,
    pub car_footprint: f64,
    pub motorcycle_footprint: f64,
    pub public_transport_footprint: f64,
    pub total_footprint: f64,
    pub earths_needed: u32,
}

impl FootprintRecord {
    pub fn from_result(result: &FootprintResult) -> Self {
        Self {
            timestamp: Utc::now(),
            car_footprint: result.car_footprint,
            motorcycle_footprint: result.motorcycle_footprint,
            public_transport_footprint: result.public_transport_footprint,
            total_footprint: result.total_footprint,
            earths_needed: result.earths_needed,
        }
    }
}

/// Logs a result as a short human-readable summary.
pub fn print_pretty(result: &FootprintResult) {
    info!(
        car = %format!("{:.2}", result.car_footprint),
        motorcycle = %format!("{:.2}", result.motorcycle_footprint),
        public_transport = %format!("{:.2}", result.public_transport_footprint),
        total = %format!("{:.2}", result.total_footprint),
        earths_needed = result.earths_needed,
        "Weekly footprint (kg CO2)"
    );
    debug!("{:#?}", result);
}

/// Logs a result as pretty-printed JSON.
pub fn print_json(result: &FootprintResult) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Appends a [`FootprintRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &FootprintRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Reads every record from a history CSV.
pub fn read_records(path: &str) -> Result<Vec<FootprintRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
