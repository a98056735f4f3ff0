//! Weekday/weekend toggle buttons.

use crate::state::AppState;
use dioxus::prelude::*;
use mbs_core::period::PeriodMode;

fn button_style(active: bool) -> String {
    let colors = if active {
        "background: #a0d53f; border: 1px solid #7da32f; font-weight: bold;"
    } else {
        "background: #f5f5f5; border: 1px solid #ccc;"
    };
    format!(
        "padding: 6px 14px; border-radius: 4px; cursor: pointer; {}",
        colors
    )
}

/// Two-button toggle between the aggregation partitions.
///
/// Clicking the already-active partition is a no-op: the state machine
/// reports no change, so no redraw fires.
#[component]
pub fn PeriodToggle() -> Element {
    let mut state = use_context::<AppState>();
    let current = (state.selection)().period_mode();

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 8px;",
            button {
                style: button_style(current == PeriodMode::Weekday),
                onclick: move |_| state.select_period(PeriodMode::Weekday),
                "Weekdays"
            }
            button {
                style: button_style(current == PeriodMode::Weekend),
                onclick: move |_| state.select_period(PeriodMode::Weekend),
                "Weekend"
            }
        }
    }
}
