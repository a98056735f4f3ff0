//! Per-station departure/arrival counts for every time slot.
//!
//! Two independent tables are built from this module, one per aggregation
//! partition (weekday, weekend); which one is active at render time is a
//! selection concern, not a table concern.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DataError;
use crate::time_slot::SLOTS_PER_DAY;

/// One bike-share dock location with its per-slot activity.
///
/// `start_counts[s]` is the number of trips departing this station during
/// slot `s`, `end_counts[s]` the number arriving. Both vectors always hold
/// exactly one entry per slot; the parser enforces this.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StationActivityRow {
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_counts: Vec<f64>,
    pub end_counts: Vec<f64>,
}

impl StationActivityRow {
    pub fn start_count(&self, slot: usize) -> f64 {
        self.start_counts[slot]
    }

    pub fn end_count(&self, slot: usize) -> f64 {
        self.end_counts[slot]
    }

    /// Largest single start-or-end count of this station across the whole
    /// day. The arc scale takes the maximum of this over all stations, so
    /// arc sizes stay comparable across selected slots.
    pub fn peak_count(&self) -> f64 {
        self.start_counts
            .iter()
            .chain(self.end_counts.iter())
            .fold(0.0_f64, |acc, &v| acc.max(v))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DataError::Load(format!("missing column {}", name)))
}

fn parse_float(field: &str, raw: &str) -> Result<f64, DataError> {
    raw.trim().parse::<f64>().map_err(|_| DataError::Parse {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Parse a per-station activity CSV into table rows.
///
/// The 96 slot-column positions (`start_slot_0..47`, `end_slot_0..47`) are
/// resolved from the header once, then every row indexes them numerically.
/// Counts are parsed to `f64` up front; they are only ever used numerically
/// downstream. Duplicate station ids are rejected.
pub fn parse_station_activity_csv(
    csv_object: &str,
) -> Result<Vec<StationActivityRow>, DataError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(csv_object.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| DataError::Load(e.to_string()))?
        .clone();
    let id_col = column_index(&headers, "station_id")?;
    let lat_col = column_index(&headers, "station_lat")?;
    let long_col = column_index(&headers, "station_long")?;

    let mut start_cols = Vec::with_capacity(SLOTS_PER_DAY);
    let mut end_cols = Vec::with_capacity(SLOTS_PER_DAY);
    for slot in 0..SLOTS_PER_DAY {
        start_cols.push(column_index(&headers, &format!("start_slot_{}", slot))?);
        end_cols.push(column_index(&headers, &format!("end_slot_{}", slot))?);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut stations: Vec<StationActivityRow> = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| DataError::Load(e.to_string()))?;

        let station_id = record.get(id_col).unwrap_or("").trim().to_string();
        if station_id.is_empty() {
            return Err(DataError::Load(format!(
                "row {} has an empty station_id",
                stations.len() + 1
            )));
        }
        if !seen.insert(station_id.clone()) {
            return Err(DataError::Load(format!(
                "duplicate station id {}",
                station_id
            )));
        }

        let latitude = parse_float("station_lat", record.get(lat_col).unwrap_or(""))?;
        let longitude = parse_float("station_long", record.get(long_col).unwrap_or(""))?;

        let mut start_counts = Vec::with_capacity(SLOTS_PER_DAY);
        for (slot, &col) in start_cols.iter().enumerate() {
            start_counts.push(parse_float(
                &format!("start_slot_{}", slot),
                record.get(col).unwrap_or(""),
            )?);
        }
        let mut end_counts = Vec::with_capacity(SLOTS_PER_DAY);
        for (slot, &col) in end_cols.iter().enumerate() {
            end_counts.push(parse_float(
                &format!("end_slot_{}", slot),
                record.get(col).unwrap_or(""),
            )?);
        }

        stations.push(StationActivityRow {
            station_id,
            latitude,
            longitude,
            start_counts,
            end_counts,
        });
    }

    log::info!("{} station rows parsed", stations.len());
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        let mut out = String::from("station_id,station_lat,station_long");
        for slot in 0..SLOTS_PER_DAY {
            out.push_str(&format!(",start_slot_{}", slot));
        }
        for slot in 0..SLOTS_PER_DAY {
            out.push_str(&format!(",end_slot_{}", slot));
        }
        out
    }

    fn station_row(id: &str, first_start: &str) -> String {
        let mut out = format!("{},34.0485,-118.2588,{}", id, first_start);
        for _ in 1..SLOTS_PER_DAY {
            out.push_str(",1");
        }
        for _ in 0..SLOTS_PER_DAY {
            out.push_str(",2");
        }
        out
    }

    #[test]
    fn test_round_trip_first_start_count() {
        let csv_data = format!("{}\n{}\n", header(), station_row("3005", "5.0"));
        let stations = parse_station_activity_csv(&csv_data).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].start_counts[0], 5.0);
        assert_eq!(stations[0].start_counts.len(), SLOTS_PER_DAY);
        assert_eq!(stations[0].end_counts.len(), SLOTS_PER_DAY);
        assert_eq!(stations[0].latitude, 34.0485);
        assert_eq!(stations[0].longitude, -118.2588);
    }

    #[test]
    fn test_peak_count_spans_both_flows() {
        let csv_data = format!("{}\n{}\n", header(), station_row("3005", "5.0"));
        let stations = parse_station_activity_csv(&csv_data).unwrap();
        // starts hold a 5.0, but every end count is 2.0 -- peak is the start
        assert_eq!(stations[0].peak_count(), 5.0);
        assert_eq!(stations[0].end_count(3), 2.0);
        assert_eq!(stations[0].start_count(3), 1.0);
    }

    #[test]
    fn test_duplicate_station_rejected() {
        let csv_data = format!(
            "{}\n{}\n{}\n",
            header(),
            station_row("3005", "1"),
            station_row("3005", "1")
        );
        let err = parse_station_activity_csv(&csv_data).unwrap_err();
        assert!(matches!(err, DataError::Load(_)));
    }

    #[test]
    fn test_non_numeric_count_rejected() {
        let csv_data = format!("{}\n{}\n", header(), station_row("3005", "n/a"));
        let err = parse_station_activity_csv(&csv_data).unwrap_err();
        assert_eq!(
            err,
            DataError::Parse {
                field: "start_slot_0".to_string(),
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_slot_column_rejected() {
        // drop the last end_slot column from the header and the row
        let full = format!("{}\n{}\n", header(), station_row("3005", "1"));
        let truncated: String = full
            .lines()
            .map(|line| {
                let cut = line.rfind(',').unwrap();
                format!("{}\n", &line[..cut])
            })
            .collect();
        let err = parse_station_activity_csv(&truncated).unwrap_err();
        assert_eq!(
            err,
            DataError::Load("missing column end_slot_47".to_string())
        );
    }
}
