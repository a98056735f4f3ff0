//! Command implementations for the Metro Bike Share CLI.
//!
//! Turns the raw trip export into the pre-aggregated CSV files the chart
//! apps consume.

use clap::Subcommand;

pub mod aggregate;
pub mod stations;

#[derive(Subcommand)]
pub enum Command {
    /// Aggregate the raw trip export into mean trips per time slot
    AggregateTrips {
        /// Path to the raw semicolon-delimited trip export CSV
        #[arg(short, long)]
        input: String,

        /// Directory for bike-mean-trips-per-day-per-timeslot.csv
        #[arg(short, long)]
        out_dir: String,
    },

    /// Aggregate the raw trip export into per-station per-slot counts,
    /// split into weekday and weekend files
    AggregateStations {
        /// Path to the raw semicolon-delimited trip export CSV
        #[arg(short, long)]
        input: String,

        /// Directory for the weekday and weekend per-station CSVs
        #[arg(short, long)]
        out_dir: String,

        /// Station ids to drop from the output (e.g. docks far outside the
        /// service area)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Extract the unique station list with coordinates
    FilterStations {
        /// Path to the raw semicolon-delimited trip export CSV
        #[arg(short, long)]
        input: String,

        /// Output path for the station list CSV
        #[arg(short, long)]
        output: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::AggregateTrips { input, out_dir } => {
            aggregate::run_aggregate_trips(&input, &out_dir)
        }
        Command::AggregateStations {
            input,
            out_dir,
            exclude,
        } => aggregate::run_aggregate_stations(&input, &out_dir, &exclude),
        Command::FilterStations { input, output } => {
            stations::run_filter_stations(&input, &output)
        }
    }
}
