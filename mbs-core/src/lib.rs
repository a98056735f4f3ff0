pub mod error;
pub mod period;
pub mod station_activity;
pub mod time_slot;
pub mod trip_volume;
