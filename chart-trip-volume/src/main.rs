//! Mean Metro Bike Share Trips per Time Slot
//!
//! Bar chart of the pre-aggregated mean trip counts: 48 bars, one per
//! 30-minute slot of the day, toggleable between weekday and weekend means.
//!
//! Data flow:
//! 1. `include_str!` embeds the 48-row aggregated CSV into the WASM binary.
//! 2. On mount: parse the CSV into trip-volume rows.
//! 3. On period toggle: rebuild the bar scale, emit per-bar pixel geometry
//!    and axis ticks, re-render via D3.js.

use dioxus::prelude::*;
use mbs_chart_ui::components::{
    ChartContainer, ChartHeader, ErrorDisplay, LoadingSpinner, PeriodToggle,
};
use mbs_chart_ui::js_bridge;
use mbs_chart_ui::state::AppState;
use mbs_core::trip_volume::{parse_trip_volume_csv, TripVolumeRow};
use mbs_data::scale;

// Embed the pre-aggregated mean-trips CSV (48 rows) at compile time.
const TRIP_VOLUME_CSV: &str =
    include_str!("../../fixtures/bike-mean-trips-per-day-per-timeslot.csv");

/// DOM id for the D3 chart container div.
const CHART_CONTAINER_ID: &str = "trip-volume-chart";

const MAX_BAR_HEIGHT: f64 = 400.0;
const BAR_WIDTH: f64 = 16.0;
const TIME_LABEL_HEIGHT: f64 = 40.0;
const AXIS_TICK_COUNT: usize = 5;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("trip-volume-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let mut rows: Signal<Vec<TripVolumeRow>> = use_signal(Vec::new);

    // ─── Effect 1: Parse the embedded CSV once on mount ───
    use_effect(move || {
        match parse_trip_volume_csv(TRIP_VOLUME_CSV) {
            Ok(parsed) => {
                log::info!("{} trip-volume rows parsed", parsed.len());
                rows.set(parsed);
                state.loading.set(false);
            }
            Err(e) => {
                log::error!("trip-volume load failed: {}", e);
                state
                    .error_msg
                    .set(Some(format!("Failed to load trip data: {}", e)));
                state.loading.set(false);
                return;
            }
        }

        // Initialize D3 chart scripts (one-time)
        js_bridge::init_charts();
    });

    // ─── Effect 2: Rebuild the scale and redraw on every selection change ───
    use_effect(move || {
        let loading = (state.loading)();
        let selection = (state.selection)();

        if loading || (state.error_msg)().is_some() {
            return;
        }

        // Clone out of the signal so the read borrow ends before any writes.
        let data: Vec<TripVolumeRow> = rows.read().clone();
        if data.is_empty() {
            return;
        }

        let mode = selection.period_mode();
        let scale_y = match scale::bar_height_scale(&data, mode, MAX_BAR_HEIGHT) {
            Ok(s) => s,
            Err(e) => {
                log::error!("bar scale failed: {}", e);
                return;
            }
        };

        let chart_width = BAR_WIDTH * data.len() as f64;
        let chart_height = MAX_BAR_HEIGHT + TIME_LABEL_HEIGHT;
        let labels: Vec<String> = state.slot_labels.read().clone();

        let bars: Vec<serde_json::Value> = data
            .iter()
            .map(|row| {
                let value = row.mean_trips(mode);
                let y = scale_y.map(value);
                serde_json::json!({
                    "label": labels.get(row.slot_index).cloned().unwrap_or_default(),
                    "startLabel": row.slot_label,
                    "value": value,
                    "y": y,
                    "height": MAX_BAR_HEIGHT - y,
                })
            })
            .collect();

        let ticks: Vec<serde_json::Value> = scale::axis_ticks(&scale_y, AXIS_TICK_COUNT)
            .into_iter()
            .map(|(value, y)| serde_json::json!({ "value": value, "y": y }))
            .collect();

        let data_json = serde_json::to_string(&bars).unwrap_or_default();
        let config_json = serde_json::json!({
            "chartWidth": chart_width,
            "chartHeight": chart_height,
            "barWidth": BAR_WIDTH,
            "ticks": ticks,
            "barColor": "#a0d53f",
            "barHoverColor": "#ccfb76",
        })
        .to_string();

        js_bridge::render_bar_chart(CHART_CONTAINER_ID, &data_json, &config_json);
    });

    // ─── Render ───
    rsx! {
        div {
            style: "max-width: 900px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                ChartHeader {
                    title: "Mean Metro Bike Share Trips per Time Slot".to_string(),
                    subtitle: "Average trips started per day in each 30-minute slot".to_string(),
                }

                PeriodToggle {}

                ChartContainer {
                    id: CHART_CONTAINER_ID.to_string(),
                    loading: *state.loading.read(),
                    min_height: 460,
                }

                p {
                    style: "font-size: 11px; color: #888; text-align: center; margin-top: 4px;",
                    "Los Angeles Metro Bike Share trip data, aggregated per 30-minute slot."
                }
            }
        }
    }
}
