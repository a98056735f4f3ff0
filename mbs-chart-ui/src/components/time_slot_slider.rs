//! Time-slot slider for the station map.

use crate::state::AppState;
use dioxus::prelude::*;
use mbs_core::time_slot::SLOTS_PER_DAY;

/// Range input over the 48 slots with a live interval label.
///
/// The input is bounded to `0..=47`, so every value it can emit is a valid
/// slot index; the state machine still validates on the way in.
#[component]
pub fn TimeSlotSlider() -> Element {
    let mut state = use_context::<AppState>();
    let slot = (state.selection)().time_slot();
    let label = state
        .slot_labels
        .read()
        .get(slot)
        .cloned()
        .unwrap_or_default();
    let max_slot = SLOTS_PER_DAY - 1;

    let on_input = move |evt: Event<FormData>| {
        if let Ok(index) = evt.value().parse::<i64>() {
            state.select_time_slot(index);
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center;",
            label {
                style: "font-weight: bold;",
                "Time slot: "
            }
            input {
                r#type: "range",
                min: "0",
                max: "{max_slot}",
                value: "{slot}",
                style: "width: 300px;",
                oninput: on_input,
            }
            span {
                style: "font-variant-numeric: tabular-nums; min-width: 90px;",
                "{label}"
            }
        }
    }
}
