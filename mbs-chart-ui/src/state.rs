//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the reactive signals both chart apps need into a
//! single struct provided via `use_context_provider`. Child components
//! retrieve it with `use_context::<AppState>()`.

use dioxus::prelude::*;
use mbs_core::period::PeriodMode;
use mbs_core::time_slot::TimeSlotIndex;
use mbs_data::selection::SelectionState;

/// Shared reactive state for the bike share chart apps.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Whether the app is still loading its first table
    pub loading: Signal<bool>,
    /// Error message if a pipeline failed
    pub error_msg: Signal<Option<String>>,
    /// Current toggle/slider selection. Written only through the transition
    /// helpers below; render effects subscribe to it.
    pub selection: Signal<SelectionState>,
    /// Interval labels for all 48 slots, built once at startup
    pub slot_labels: Signal<Vec<String>>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            selection: Signal::new(SelectionState::new()),
            slot_labels: Signal::new(TimeSlotIndex::build().labels()),
        }
    }

    /// Toggle between weekday and weekend aggregation.
    ///
    /// The selection signal is written only when the state machine reports
    /// a change, so each real transition triggers exactly one redraw and a
    /// repeated click triggers none.
    pub fn select_period(&mut self, mode: PeriodMode) {
        let mut selection = (self.selection)();
        if selection.select_period(mode) {
            self.selection.set(selection);
        }
    }

    /// Move the time-slot slider. Out-of-range indices are rejected by the
    /// state machine and logged; the bounded slider cannot produce them.
    pub fn select_time_slot(&mut self, index: i64) {
        let mut selection = (self.selection)();
        match selection.select_time_slot(index) {
            Ok(true) => self.selection.set(selection),
            Ok(false) => {}
            Err(e) => log::warn!("slot selection rejected: {}", e),
        }
    }
}
