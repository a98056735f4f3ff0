//! Mean trips per time slot: one row per slot, weekday and weekend means.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::period::PeriodMode;
use crate::time_slot::SLOTS_PER_DAY;

/// One bar of the trip-volume chart.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TripVolumeRow {
    /// Position in the 48-slot day; also the left-to-right drawing order.
    pub slot_index: usize,
    /// Start-of-slot label carried from the file, e.g. "13:30".
    pub slot_label: String,
    pub mean_weekday_trips: f64,
    pub mean_weekend_trips: f64,
}

impl TripVolumeRow {
    /// The mean for the selected aggregation partition.
    pub fn mean_trips(&self, mode: PeriodMode) -> f64 {
        match mode {
            PeriodMode::Weekday => self.mean_weekday_trips,
            PeriodMode::Weekend => self.mean_weekend_trips,
        }
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

/// Parse the pre-aggregated mean-trips CSV into bar-chart rows.
///
/// Columns are located by header name (`time_slot_label`,
/// `mean_weekday_trips`, `mean_weekend_trips`); extra columns such as a
/// leading `time_slot` are ignored. The file must contain exactly one row
/// per slot in slot order, otherwise the bars would silently desynchronize
/// from the time-slot index.
pub fn parse_trip_volume_csv(csv_object: &str) -> Result<Vec<TripVolumeRow>, DataError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(csv_object.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| DataError::Load(e.to_string()))?
        .clone();
    let label_col = column_index(&headers, "time_slot_label")?;
    let weekday_col = column_index(&headers, "mean_weekday_trips")?;
    let weekend_col = column_index(&headers, "mean_weekend_trips")?;

    let mut rows: Vec<TripVolumeRow> = Vec::with_capacity(SLOTS_PER_DAY);
    for record in rdr.records() {
        let record = record.map_err(|e| DataError::Load(e.to_string()))?;
        let slot_label = record.get(label_col).unwrap_or("").trim().to_string();
        let mean_weekday_trips =
            parse_float("mean_weekday_trips", record.get(weekday_col).unwrap_or(""))?;
        let mean_weekend_trips =
            parse_float("mean_weekend_trips", record.get(weekend_col).unwrap_or(""))?;
        rows.push(TripVolumeRow {
            slot_index: rows.len(),
            slot_label,
            mean_weekday_trips,
            mean_weekend_trips,
        });
    }

    if rows.len() != SLOTS_PER_DAY {
        return Err(DataError::Load(format!(
            "expected {} trip-volume rows, found {}",
            SLOTS_PER_DAY,
            rows.len()
        )));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_csv(rows: usize) -> String {
        let mut out = String::from(
            "time_slot,time_slot_label,mean_weekday_trips,mean_weekend_trips\n",
        );
        for slot in 0..rows {
            out.push_str(&format!("{},{},{}.50,{}.25\n", slot, "08:00", slot, slot));
        }
        out
    }

    #[test]
    fn test_parse_full_file() {
        let rows = parse_trip_volume_csv(&sample_csv(SLOTS_PER_DAY)).unwrap();
        assert_eq!(rows.len(), 48);
        assert_eq!(rows[0].slot_index, 0);
        assert_eq!(rows[0].mean_weekday_trips, 0.50);
        assert_eq!(rows[47].slot_index, 47);
        assert_eq!(rows[47].mean_weekend_trips, 47.25);
    }

    #[test]
    fn test_mean_trips_by_mode() {
        let rows = parse_trip_volume_csv(&sample_csv(SLOTS_PER_DAY)).unwrap();
        assert_eq!(rows[10].mean_trips(PeriodMode::Weekday), 10.50);
        assert_eq!(rows[10].mean_trips(PeriodMode::Weekend), 10.25);
    }

    #[test]
    fn test_short_file_rejected() {
        let err = parse_trip_volume_csv(&sample_csv(12)).unwrap_err();
        assert!(matches!(err, DataError::Load(_)));
    }

    #[test]
    fn test_non_numeric_mean_rejected() {
        let csv_data = "time_slot_label,mean_weekday_trips,mean_weekend_trips\n\
                        00:00,abc,1.0\n";
        let err = parse_trip_volume_csv(csv_data).unwrap_err();
        assert_eq!(
            err,
            DataError::Parse {
                field: "mean_weekday_trips".to_string(),
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv_data = "time_slot_label,mean_weekday_trips\n00:00,1.0\n";
        let err = parse_trip_volume_csv(csv_data).unwrap_err();
        assert!(matches!(err, DataError::Load(_)));
    }
}
