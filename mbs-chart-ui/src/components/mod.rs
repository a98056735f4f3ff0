//! Reusable Dioxus RSX components for the bike share chart apps.

mod chart_container;
mod chart_header;
mod error_display;
mod loading_spinner;
mod period_toggle;
mod time_slot_slider;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use period_toggle::PeriodToggle;
pub use time_slot_slider::TimeSlotSlider;
