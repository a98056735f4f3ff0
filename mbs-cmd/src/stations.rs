//! Unique station extraction from the raw trip export.

use anyhow::Context;
use csv::ReaderBuilder;
use log::info;
use std::collections::BTreeMap;

/// Build the deduplicated station list (`station_id, station_lat,
/// station_long`), sorted by id. Rows with a blank id or blank/zero
/// coordinates are skipped; only the first sighting of a station counts.
pub fn run_filter_stations(input: &str, output: &str) -> anyhow::Result<()> {
    let file =
        std::fs::File::open(input).with_context(|| format!("cannot open {}", input))?;
    let (stations, skipped) = collect_stations(file)?;

    let mut wtr = csv::Writer::from_path(output)
        .with_context(|| format!("cannot write {}", output))?;
    wtr.write_record(["station_id", "station_lat", "station_long"])?;
    for (id, (lat, long)) in &stations {
        wtr.write_record([id, lat, long])?;
    }
    wtr.flush()?;

    info!(
        "{} stations found, {} incomplete rows skipped",
        stations.len(),
        skipped
    );
    Ok(())
}

fn collect_stations<R: std::io::Read>(
    reader: R,
) -> anyhow::Result<(BTreeMap<String, (String, String)>, usize)> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow::anyhow!("missing column {:?} in trip export", name))
    };
    let id_col = column("Starting Station ID")?;
    let lat_col = column("Starting Station Latitude")?;
    let long_col = column("Starting Station Longitude")?;

    let mut stations: BTreeMap<String, (String, String)> = BTreeMap::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let field = |col: usize| record.get(col).unwrap_or("").trim().to_string();
        let id = field(id_col);
        let lat = field(lat_col);
        let long = field(long_col);
        if id.is_empty() || lat.is_empty() || lat == "0" || long.is_empty() || long == "0" {
            skipped += 1;
            continue;
        }
        stations.entry(id).or_insert((lat, long));
    }
    Ok((stations, skipped))
}

#[cfg(test)]
mod tests {
    use super::collect_stations;

    const CSV_DATA: &str = "\
Trip ID;Start Time;Starting Station ID;Starting Station Latitude;Starting Station Longitude
1;2017-03-21T13:45:00;3014;34.0566;-118.2372
2;2017-03-21T14:05:00;3005;34.0485;-118.2588
3;2017-03-21T14:40:00;3005;34.0485;-118.2588
4;2017-03-21T15:00:00;;34.0;-118.0
5;2017-03-21T15:30:00;3099;0;-118.0
";

    #[test]
    fn test_collect_stations_dedupes_and_sorts() {
        let (stations, skipped) = collect_stations(CSV_DATA.as_bytes()).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(skipped, 2);
        let ids: Vec<&String> = stations.keys().collect();
        assert_eq!(ids, ["3005", "3014"]);
        assert_eq!(
            stations["3005"],
            ("34.0485".to_string(), "-118.2588".to_string())
        );
    }
}
