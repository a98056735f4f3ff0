//! Metro Bike Share Station Activity Map
//!
//! Draws every station at its scaled map position with two half-circle
//! arcs: departures (right, green) and arrivals (left, red), sized for the
//! selected 30-minute time slot. A slider moves through the day and a
//! toggle switches between the weekday and weekend tables.
//!
//! Data flow:
//! 1. On mount: fetch and parse the weekday per-station CSV; the map draws
//!    from it as soon as the table is built. Only then is the weekend CSV
//!    fetched (sequential dependency, not a race).
//! 2. On toggle/slider change: rebuild the geo and arc scales for the
//!    selected table, emit per-station pixel geometry, re-render via D3.js.

use dioxus::prelude::*;
use mbs_chart_ui::components::{
    ChartContainer, ChartHeader, ErrorDisplay, LoadingSpinner, PeriodToggle, TimeSlotSlider,
};
use mbs_chart_ui::state::AppState;
use mbs_chart_ui::{js_bridge, loader};
use mbs_core::error::DataError;
use mbs_core::period::PeriodMode;
use mbs_core::station_activity::{parse_station_activity_csv, StationActivityRow};
use mbs_data::scale;

const WEEKDAY_CSV_URL: &str = "data/trips-per-station-per-time-slot-weekday.csv";
const WEEKEND_CSV_URL: &str = "data/trips-per-station-per-time-slot-weekend.csv";

/// DOM id for the D3 chart container div.
const CHART_CONTAINER_ID: &str = "station-map-chart";

const MAP_WIDTH: f64 = 950.0;
const MAP_HEIGHT: f64 = 1103.0;
/// Base circle radius; also used as the map edge padding so the largest
/// arcs of edge stations stay on screen.
const MIN_ARC_RADIUS: f64 = 15.0;
const MAX_ARC_RADIUS: f64 = 50.0;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("station-map-root"))
        .launch(App);
}

/// Fetch and parse one per-station table.
async fn load_table(url: &str) -> Result<Vec<StationActivityRow>, DataError> {
    let body = loader::fetch_csv(url).await?;
    parse_station_activity_csv(&body)
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let mut weekday_stations: Signal<Vec<StationActivityRow>> = use_signal(Vec::new);
    let mut weekend_stations: Signal<Vec<StationActivityRow>> = use_signal(Vec::new);

    // ─── Effect 1: Load both tables on mount, weekday strictly first ───
    use_effect(move || {
        js_bridge::init_charts();

        spawn(async move {
            match load_table(WEEKDAY_CSV_URL).await {
                Ok(stations) => {
                    log::info!("weekday table ready: {} stations", stations.len());
                    weekday_stations.set(stations);
                    state.loading.set(false);
                }
                Err(e) => {
                    log::error!("weekday load failed: {}", e);
                    state
                        .error_msg
                        .set(Some(format!("Failed to load weekday data: {}", e)));
                    state.loading.set(false);
                    return;
                }
            }

            // The weekend load starts only after the weekday table is built.
            match load_table(WEEKEND_CSV_URL).await {
                Ok(stations) => {
                    log::info!("weekend table ready: {} stations", stations.len());
                    weekend_stations.set(stations);
                }
                Err(e) => {
                    log::error!("weekend load failed: {}", e);
                    state
                        .error_msg
                        .set(Some(format!("Failed to load weekend data: {}", e)));
                }
            }
        });
    });

    // ─── Effect 2: Redraw whenever the selection or a table changes ───
    use_effect(move || {
        let loading = (state.loading)();
        let selection = (state.selection)();
        // read both tables so the effect re-runs when either arrives
        let weekday: Vec<StationActivityRow> = weekday_stations.read().clone();
        let weekend: Vec<StationActivityRow> = weekend_stations.read().clone();

        if loading || (state.error_msg)().is_some() {
            return;
        }

        let stations = match selection.period_mode() {
            PeriodMode::Weekday => weekday,
            PeriodMode::Weekend => weekend,
        };
        if stations.is_empty() {
            // weekend selected before its table finished loading
            js_bridge::destroy_chart(CHART_CONTAINER_ID);
            return;
        }

        let scales = (
            scale::longitude_scale(&stations, MAP_WIDTH, MIN_ARC_RADIUS),
            scale::latitude_scale(&stations, MAP_HEIGHT, MIN_ARC_RADIUS),
            scale::arc_radius_scale(&stations, MAX_ARC_RADIUS),
        );
        let (scale_x, scale_y, scale_arc) = match scales {
            (Ok(x), Ok(y), Ok(arc)) => (x, y, arc),
            _ => {
                log::error!("scale construction failed for a non-empty table");
                return;
            }
        };

        let slot = selection.time_slot();
        let geometry: Vec<serde_json::Value> = stations
            .iter()
            .map(|station| {
                let starts = station.start_count(slot);
                let ends = station.end_count(slot);
                serde_json::json!({
                    "id": station.station_id,
                    "x": scale_x.map(station.longitude),
                    "y": scale_y.map(station.latitude),
                    "startRadius": MIN_ARC_RADIUS + scale_arc.map(starts),
                    "endRadius": MIN_ARC_RADIUS + scale_arc.map(ends),
                    "starts": starts,
                    "ends": ends,
                })
            })
            .collect();

        let slot_label = state
            .slot_labels
            .read()
            .get(slot)
            .cloned()
            .unwrap_or_default();

        let data_json = serde_json::to_string(&geometry).unwrap_or_default();
        let config_json = serde_json::json!({
            "width": MAP_WIDTH,
            "height": MAP_HEIGHT,
            "minArc": MIN_ARC_RADIUS,
            "slotLabel": slot_label,
            "circleColor": "#a0d53f",
            "circleHoverColor": "#ccfb76",
        })
        .to_string();

        js_bridge::render_station_map(CHART_CONTAINER_ID, &data_json, &config_json);
    });

    // ─── Render ───
    rsx! {
        div {
            style: "max-width: 980px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                ChartHeader {
                    title: "Station Departures and Arrivals".to_string(),
                    subtitle: "Arc size encodes trips in the selected 30-minute slot; green = departures, red = arrivals".to_string(),
                }

                div {
                    style: "display: flex; flex-wrap: wrap; gap: 16px; align-items: center;",
                    PeriodToggle {}
                    TimeSlotSlider {}
                }

                ChartContainer {
                    id: CHART_CONTAINER_ID.to_string(),
                    loading: *state.loading.read(),
                    min_height: 1103,
                }
            }
        }
    }
}
