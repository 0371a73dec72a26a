//! Crash incident loading from the geocoded CSV export.
//!
//! Column names follow the upstream geocoding pipeline's output. Rows
//! without coordinates (geocoding failures) are skipped and counted, not
//! errors: the linker can only use located incidents.

use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use geo::Point;
use log::{info, warn};
use serde::Deserialize;

use crate::model::{Incident, Severity};
use crate::{Error, IncidentId};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawIncident {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Severity")]
    severity: String,
    #[serde(rename = "On Street")]
    on_street: String,
    #[serde(rename = "At Street")]
    at_street: String,
    #[serde(rename = "Light Cond")]
    light_condition: String,
    #[serde(rename = "Injured")]
    injured: Option<u32>,
    #[serde(rename = "Killed")]
    killed: Option<u32>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

pub fn load_incidents(path: &Path) -> Result<Vec<Incident>, Error> {
    info!("loading crash incidents from {}", path.display());
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut incidents = Vec::new();
    let mut skipped = 0usize;
    for (row, record) in reader.deserialize::<RawIncident>().enumerate() {
        let raw = record?;
        let (Some(latitude), Some(longitude)) = (raw.latitude, raw.longitude) else {
            skipped += 1;
            continue;
        };
        incidents.push(Incident {
            // Row order is stable in the export, so the row number is the id
            id: row as IncidentId + 1,
            location: Point::new(longitude, latitude),
            date: parse_date(&raw.date),
            time: parse_time(&raw.time),
            severity: Severity::parse(&raw.severity),
            on_street: non_empty(raw.on_street),
            at_street: non_empty(raw.at_street),
            light_condition: non_empty(raw.light_condition),
            injured: raw.injured.unwrap_or(0),
            killed: raw.killed.unwrap_or(0),
        });
    }

    if skipped > 0 {
        warn!("{skipped} incidents without coordinates skipped");
    }
    info!("loaded {} geocoded incidents", incidents.len());
    Ok(incidents)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw.trim(), format).ok())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
