//! Aggregation of the raw trip export into the chart input files.
//!
//! The raw export is semicolon-delimited with one row per trip; start and
//! end events are classified independently by their own timestamps, since a
//! trip can cross a slot (or a weekday/weekend) boundary.

use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use csv::ReaderBuilder;
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

use mbs_core::period::PeriodMode;
use mbs_core::time_slot::{slot_start_label, SLOTS_PER_DAY, SLOTS_PER_HOUR, SLOT_DURATION};

/// Timestamp format of the raw export, e.g. "2017-03-19T14:18:00".
const TRIP_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const MEAN_TRIPS_FILE: &str = "bike-mean-trips-per-day-per-timeslot.csv";
pub const STATION_WEEKDAY_FILE: &str = "trips-per-station-per-time-slot-weekday.csv";
pub const STATION_WEEKEND_FILE: &str = "trips-per-station-per-time-slot-weekend.csv";

/// Slot index of a timestamp within its day.
fn time_slot_of(when: &NaiveDateTime) -> usize {
    (when.hour() as usize) * SLOTS_PER_HOUR + (when.minute() as usize) / SLOT_DURATION
}

/// Which aggregation partition a timestamp belongs to.
fn period_of(when: &NaiveDateTime) -> PeriodMode {
    match when.weekday() {
        Weekday::Sat | Weekday::Sun => PeriodMode::Weekend,
        _ => PeriodMode::Weekday,
    }
}

/// One usable row of the raw export. Coordinates stay raw strings: the
/// export mixes blanks, "0" and real values, and backfilling works on the
/// raw form.
struct TripRecord {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    start_station: String,
    start_lat: String,
    start_long: String,
    end_station: String,
    end_lat: String,
    end_long: String,
}

fn column_index(headers: &csv::StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow::anyhow!("missing column {:?} in trip export", name))
}

/// Read the raw export, skipping rows with a missing time or station id.
/// Returns the parsed trips plus the number of skipped rows.
fn read_trips<R: std::io::Read>(reader: R) -> anyhow::Result<(Vec<TripRecord>, usize)> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let start_time_col = column_index(&headers, "Start Time")?;
    let end_time_col = column_index(&headers, "End Time")?;
    let start_station_col = column_index(&headers, "Starting Station ID")?;
    let start_lat_col = column_index(&headers, "Starting Station Latitude")?;
    let start_long_col = column_index(&headers, "Starting Station Longitude")?;
    let end_station_col = column_index(&headers, "Ending Station ID")?;
    let end_lat_col = column_index(&headers, "Ending Station Latitude")?;
    let end_long_col = column_index(&headers, "Ending Station Longitude")?;

    let mut trips: Vec<TripRecord> = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let field = |col: usize| record.get(col).unwrap_or("").trim().to_string();

        let start_time_raw = field(start_time_col);
        let end_time_raw = field(end_time_col);
        let start_station = field(start_station_col);
        let end_station = field(end_station_col);
        if start_time_raw.is_empty()
            || end_time_raw.is_empty()
            || start_station.is_empty()
            || end_station.is_empty()
        {
            skipped += 1;
            continue;
        }

        let start_time = NaiveDateTime::parse_from_str(&start_time_raw, TRIP_TIME_FORMAT)
            .with_context(|| format!("bad Start Time {:?}", start_time_raw))?;
        let end_time = NaiveDateTime::parse_from_str(&end_time_raw, TRIP_TIME_FORMAT)
            .with_context(|| format!("bad End Time {:?}", end_time_raw))?;

        trips.push(TripRecord {
            start_time,
            end_time,
            start_station,
            start_lat: field(start_lat_col),
            start_long: field(start_long_col),
            end_station,
            end_lat: field(end_lat_col),
            end_long: field(end_long_col),
        });
    }

    info!("{} trips read, {} incomplete rows skipped", trips.len(), skipped);
    Ok((trips, skipped))
}

/// Per-slot trip-start counters split by partition, plus the observed
/// timestamp span used for per-day normalization.
struct StartCounters {
    weekday: Vec<f64>,
    weekend: Vec<f64>,
    oldest: NaiveDateTime,
    newest: NaiveDateTime,
}

fn start_counters(trips: &[TripRecord]) -> StartCounters {
    let mut counters = StartCounters {
        weekday: vec![0.0; SLOTS_PER_DAY],
        weekend: vec![0.0; SLOTS_PER_DAY],
        oldest: trips[0].start_time,
        newest: trips[0].end_time,
    };
    for trip in trips {
        let slot = time_slot_of(&trip.start_time);
        match period_of(&trip.start_time) {
            PeriodMode::Weekday => counters.weekday[slot] += 1.0,
            PeriodMode::Weekend => counters.weekend[slot] += 1.0,
        }
        counters.oldest = counters.oldest.min(trip.start_time);
        counters.newest = counters.newest.max(trip.end_time);
    }
    counters
}

/// Build `bike-mean-trips-per-day-per-timeslot.csv` from the raw export.
pub fn run_aggregate_trips(input: &str, out_dir: &str) -> anyhow::Result<()> {
    let file =
        std::fs::File::open(input).with_context(|| format!("cannot open {}", input))?;
    let (trips, _skipped) = read_trips(file)?;
    if trips.is_empty() {
        bail!("no usable trips in {}", input);
    }

    let counters = start_counters(&trips);
    let span_days = (counters.newest - counters.oldest).num_days() as f64;
    if span_days <= 0.0 {
        bail!("trip timestamps span less than one day; cannot normalize to per-day means");
    }
    let weekday_days = span_days * PeriodMode::Weekday.day_fraction();
    let weekend_days = span_days * PeriodMode::Weekend.day_fraction();
    info!(
        "normalizing over {} days ({} -> {})",
        span_days, counters.oldest, counters.newest
    );

    let out_path = Path::new(out_dir).join(MEAN_TRIPS_FILE);
    let mut wtr = csv::Writer::from_path(&out_path)
        .with_context(|| format!("cannot write {}", out_path.display()))?;
    wtr.write_record([
        "time_slot",
        "time_slot_label",
        "mean_weekday_trips",
        "mean_weekend_trips",
    ])?;
    for slot in 0..SLOTS_PER_DAY {
        wtr.write_record([
            slot.to_string(),
            slot_start_label(slot),
            format!("{:.2}", counters.weekday[slot] / weekday_days),
            format!("{:.2}", counters.weekend[slot] / weekend_days),
        ])?;
    }
    wtr.flush()?;

    info!("mean trips written to {}", out_path.display());
    Ok(())
}

/// Accumulated per-slot activity of one station.
struct StationSlots {
    latitude: String,
    longitude: String,
    starts: Vec<f64>,
    ends: Vec<f64>,
}

impl StationSlots {
    fn new(latitude: &str, longitude: &str) -> Self {
        StationSlots {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            starts: vec![0.0; SLOTS_PER_DAY],
            ends: vec![0.0; SLOTS_PER_DAY],
        }
    }
}

fn coord_missing(raw: &str) -> bool {
    raw.is_empty() || raw == "0"
}

/// Insert a station if unseen; backfill coordinates that were blank or zero
/// on the first sighting (the export has a bunch of invalid rows).
fn upsert_station(table: &mut BTreeMap<String, StationSlots>, id: &str, lat: &str, long: &str) {
    let entry = table
        .entry(id.to_string())
        .or_insert_with(|| StationSlots::new(lat, long));
    if coord_missing(&entry.latitude) && !coord_missing(lat) {
        entry.latitude = lat.to_string();
    }
    if coord_missing(&entry.longitude) && !coord_missing(long) {
        entry.longitude = long.to_string();
    }
}

fn write_station_csv(
    table: &BTreeMap<String, StationSlots>,
    path: &Path,
    exclude: &[String],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("cannot write {}", path.display()))?;

    let mut header: Vec<String> = vec![
        "station_id".to_string(),
        "station_lat".to_string(),
        "station_long".to_string(),
    ];
    header.extend((0..SLOTS_PER_DAY).map(|slot| format!("start_slot_{}", slot)));
    header.extend((0..SLOTS_PER_DAY).map(|slot| format!("end_slot_{}", slot)));
    wtr.write_record(&header)?;

    let mut written = 0usize;
    let mut dropped = 0usize;
    for (id, slots) in table {
        if coord_missing(&slots.latitude)
            || coord_missing(&slots.longitude)
            || exclude.contains(id)
        {
            dropped += 1;
            continue;
        }
        let mut record: Vec<String> =
            vec![id.clone(), slots.latitude.clone(), slots.longitude.clone()];
        record.extend(slots.starts.iter().map(|count| format!("{}", count)));
        record.extend(slots.ends.iter().map(|count| format!("{}", count)));
        wtr.write_record(&record)?;
        written += 1;
    }
    wtr.flush()?;

    info!(
        "{} stations written to {} ({} dropped)",
        written,
        path.display(),
        dropped
    );
    Ok(())
}

/// Build the weekday and weekend per-station per-slot CSVs from the raw
/// export.
pub fn run_aggregate_stations(
    input: &str,
    out_dir: &str,
    exclude: &[String],
) -> anyhow::Result<()> {
    let file =
        std::fs::File::open(input).with_context(|| format!("cannot open {}", input))?;
    let (trips, _skipped) = read_trips(file)?;
    if trips.is_empty() {
        bail!("no usable trips in {}", input);
    }

    let mut weekday: BTreeMap<String, StationSlots> = BTreeMap::new();
    let mut weekend: BTreeMap<String, StationSlots> = BTreeMap::new();

    for trip in &trips {
        // every station exists in both tables, so coordinate backfilling
        // sees all sightings regardless of partition
        for table in [&mut weekday, &mut weekend] {
            upsert_station(table, &trip.start_station, &trip.start_lat, &trip.start_long);
            upsert_station(table, &trip.end_station, &trip.end_lat, &trip.end_long);
        }

        let start_table = match period_of(&trip.start_time) {
            PeriodMode::Weekday => &mut weekday,
            PeriodMode::Weekend => &mut weekend,
        };
        if let Some(station) = start_table.get_mut(&trip.start_station) {
            station.starts[time_slot_of(&trip.start_time)] += 1.0;
        }

        let end_table = match period_of(&trip.end_time) {
            PeriodMode::Weekday => &mut weekday,
            PeriodMode::Weekend => &mut weekend,
        };
        if let Some(station) = end_table.get_mut(&trip.end_station) {
            station.ends[time_slot_of(&trip.end_time)] += 1.0;
        }
    }

    write_station_csv(&weekday, &Path::new(out_dir).join(STATION_WEEKDAY_FILE), exclude)?;
    write_station_csv(&weekend, &Path::new(out_dir).join(STATION_WEEKEND_FILE), exclude)?;
    Ok(())
}
