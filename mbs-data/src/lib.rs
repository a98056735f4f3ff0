//! Data processing between the parsed trip tables and the render layer.
//!
//! This crate turns table extents into linear visual mappings and tracks
//! what the user currently has selected. Everything here is synchronous and
//! pure; the chart apps call into it on every redraw.

/// Linear domain-to-range mappings for bar heights, map positions, and arc
/// radii.
pub mod scale {
    use mbs_core::error::DataError;
    use mbs_core::period::PeriodMode;
    use mbs_core::station_activity::StationActivityRow;
    use mbs_core::trip_volume::TripVolumeRow;

    /// Bar-chart axis ticks sit on multiples of this many trips.
    pub const AXIS_TICK_INTERVAL: f64 = 5.0;

    /// A linear mapping from a value domain onto a visual range.
    ///
    /// Inputs outside the domain are clamped to it before interpolation, so
    /// the output always stays inside the range. A degenerate domain
    /// (`max == min`) maps every input to `range_min`.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct LinearScale {
        domain_min: f64,
        domain_max: f64,
        range_min: f64,
        range_max: f64,
    }

    impl LinearScale {
        pub fn new(domain_min: f64, domain_max: f64, range_min: f64, range_max: f64) -> Self {
            LinearScale {
                domain_min,
                domain_max,
                range_min,
                range_max,
            }
        }

        /// Build a scale whose domain is the extent of `values`.
        pub fn from_values(
            values: &[f64],
            range_min: f64,
            range_max: f64,
        ) -> Result<Self, DataError> {
            if values.is_empty() {
                return Err(DataError::EmptyInput);
            }
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for &v in values {
                min = min.min(v);
                max = max.max(v);
            }
            Ok(LinearScale::new(min, max, range_min, range_max))
        }

        /// Map a domain value into the range.
        pub fn map(&self, value: f64) -> f64 {
            if self.domain_max == self.domain_min {
                return self.range_min;
            }
            let v = value.max(self.domain_min).min(self.domain_max);
            self.range_min
                + (v - self.domain_min) / (self.domain_max - self.domain_min)
                    * (self.range_max - self.range_min)
        }

        pub fn domain_min(&self) -> f64 {
            self.domain_min
        }

        pub fn domain_max(&self) -> f64 {
            self.domain_max
        }

        pub fn range_min(&self) -> f64 {
            self.range_min
        }

        pub fn range_max(&self) -> f64 {
            self.range_max
        }
    }

    /// Round `value` up to the next multiple of `tick`.
    pub fn round_up_to_tick(value: f64, tick: f64) -> f64 {
        (value / tick).ceil() * tick
    }

    /// Vertical scale for the trip-volume bars.
    ///
    /// Domain is `(0, max rounded up to the tick interval)` so the top axis
    /// tick lands exactly on the tallest gridline; range is
    /// `(max_bar_height, 0)` because SVG y grows downward.
    pub fn bar_height_scale(
        rows: &[TripVolumeRow],
        mode: PeriodMode,
        max_bar_height: f64,
    ) -> Result<LinearScale, DataError> {
        if rows.is_empty() {
            return Err(DataError::EmptyInput);
        }
        let max = rows
            .iter()
            .map(|r| r.mean_trips(mode))
            .fold(f64::NEG_INFINITY, f64::max);
        let ceiling = round_up_to_tick(max, AXIS_TICK_INTERVAL);
        log::debug!("{} bar max {} -> axis ceiling {}", mode, max, ceiling);
        Ok(LinearScale::new(0.0, ceiling, max_bar_height, 0.0))
    }

    /// Tick values and their pixel positions for a bar scale, `count`
    /// intervals from 0 to the domain ceiling.
    pub fn axis_ticks(scale: &LinearScale, count: usize) -> Vec<(f64, f64)> {
        if count == 0 || scale.domain_max() == scale.domain_min() {
            return vec![(scale.domain_min(), scale.range_min())];
        }
        let step = (scale.domain_max() - scale.domain_min()) / count as f64;
        (0..=count)
            .map(|i| {
                let value = scale.domain_min() + step * i as f64;
                (value, scale.map(value))
            })
            .collect()
    }

    /// Horizontal map scale: longitude extent onto the padded map width.
    pub fn longitude_scale(
        stations: &[StationActivityRow],
        map_width: f64,
        padding: f64,
    ) -> Result<LinearScale, DataError> {
        let values: Vec<f64> = stations.iter().map(|s| s.longitude).collect();
        LinearScale::from_values(&values, padding, map_width - padding)
    }

    /// Vertical map scale: latitude extent onto the padded map height,
    /// inverted -- increasing latitude moves up the visual while range
    /// index 0 is top-of-screen.
    pub fn latitude_scale(
        stations: &[StationActivityRow],
        map_height: f64,
        padding: f64,
    ) -> Result<LinearScale, DataError> {
        let values: Vec<f64> = stations.iter().map(|s| s.latitude).collect();
        LinearScale::from_values(&values, map_height - padding, padding)
    }

    /// Trip-count-to-arc-radius scale.
    ///
    /// The domain ceiling is the largest single start-or-end count across
    /// every station and every slot, both flows together. A per-slot maximum
    /// would re-normalize the arcs on every slider move and make slots
    /// visually incomparable.
    pub fn arc_radius_scale(
        stations: &[StationActivityRow],
        max_radius: f64,
    ) -> Result<LinearScale, DataError> {
        if stations.is_empty() {
            return Err(DataError::EmptyInput);
        }
        let max_trips = stations
            .iter()
            .map(|s| s.peak_count())
            .fold(0.0_f64, f64::max);
        log::debug!("trip count max={}", max_trips);
        Ok(LinearScale::new(0.0, max_trips, 0.0, max_radius))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use mbs_core::time_slot::SLOTS_PER_DAY;

        fn volume_rows(weekday: &[f64]) -> Vec<TripVolumeRow> {
            weekday
                .iter()
                .enumerate()
                .map(|(slot_index, &mean)| TripVolumeRow {
                    slot_index,
                    slot_label: String::new(),
                    mean_weekday_trips: mean,
                    mean_weekend_trips: mean / 2.0,
                })
                .collect()
        }

        fn station(id: &str, lat: f64, long: f64, peak: f64) -> StationActivityRow {
            let mut start_counts = vec![1.0; SLOTS_PER_DAY];
            let end_counts = vec![2.0; SLOTS_PER_DAY];
            start_counts[30] = peak;
            StationActivityRow {
                station_id: id.to_string(),
                latitude: lat,
                longitude: long,
                start_counts,
                end_counts,
            }
        }

        #[test]
        fn test_from_values_extent() {
            let scale = LinearScale::from_values(&[10.0, 15.0, 12.0], 0.0, 100.0).unwrap();
            assert_eq!(scale.domain_min(), 10.0);
            assert_eq!(scale.domain_max(), 15.0);
            assert_eq!(scale.map(10.0), 0.0);
            assert_eq!(scale.map(15.0), 100.0);
            assert_eq!(scale.map(12.5), 50.0);
        }

        #[test]
        fn test_empty_input_rejected() {
            assert_eq!(
                LinearScale::from_values(&[], 0.0, 100.0).unwrap_err(),
                DataError::EmptyInput
            );
            assert_eq!(
                bar_height_scale(&[], PeriodMode::Weekday, 400.0).unwrap_err(),
                DataError::EmptyInput
            );
            assert_eq!(
                arc_radius_scale(&[], 50.0).unwrap_err(),
                DataError::EmptyInput
            );
        }

        #[test]
        fn test_idempotence() {
            let a = LinearScale::from_values(&[3.0, 9.0, 6.0], 0.0, 10.0).unwrap();
            let b = LinearScale::from_values(&[3.0, 9.0, 6.0], 0.0, 10.0).unwrap();
            assert_eq!(a, b);
            for v in [2.0, 3.0, 4.5, 9.0, 11.0] {
                assert_eq!(a.map(v), b.map(v));
            }
        }

        #[test]
        fn test_degenerate_domain_maps_to_range_min() {
            let scale = LinearScale::from_values(&[7.0, 7.0, 7.0], 0.0, 100.0).unwrap();
            assert_eq!(scale.map(7.0), 0.0);
            assert_eq!(scale.map(123.0), 0.0);
        }

        #[test]
        fn test_monotonic_when_range_ascending() {
            let scale = LinearScale::new(0.0, 10.0, 5.0, 105.0);
            let mut previous = f64::NEG_INFINITY;
            for i in 0..=40 {
                let mapped = scale.map(i as f64 * 0.25);
                assert!(mapped >= previous);
                previous = mapped;
            }
        }

        #[test]
        fn test_clamped_outside_domain() {
            let scale = LinearScale::new(0.0, 10.0, 0.0, 100.0);
            assert_eq!(scale.map(-5.0), scale.map(0.0));
            assert_eq!(scale.map(25.0), scale.map(10.0));
        }

        #[test]
        fn test_round_up_to_tick() {
            assert_eq!(round_up_to_tick(13.2, 5.0), 15.0);
            assert_eq!(round_up_to_tick(15.0, 5.0), 15.0);
            assert_eq!(round_up_to_tick(0.0, 5.0), 0.0);
        }

        #[test]
        fn test_bar_scale_rounds_and_inverts() {
            let rows = volume_rows(&[10.0, 15.0]);
            let scale = bar_height_scale(&rows, PeriodMode::Weekday, 400.0).unwrap();
            // 15 is already a multiple of 5, so the ceiling is the raw max
            assert_eq!(scale.domain_max(), 15.0);
            assert_eq!(scale.map(15.0), scale.range_max());
            assert_eq!(scale.map(0.0), 400.0);
        }

        #[test]
        fn test_axis_ticks() {
            let rows = volume_rows(&[10.0, 17.0]);
            let scale = bar_height_scale(&rows, PeriodMode::Weekday, 400.0).unwrap();
            let ticks = axis_ticks(&scale, 5);
            assert_eq!(ticks.len(), 6);
            assert_eq!(ticks[0], (0.0, 400.0));
            assert_eq!(ticks[5], (20.0, 0.0));
        }

        #[test]
        fn test_geo_scales() {
            let stations = vec![
                station("a", 34.03, -118.27, 3.0),
                station("b", 34.06, -118.23, 4.0),
            ];
            let x = longitude_scale(&stations, 950.0, 15.0).unwrap();
            assert_eq!(x.map(-118.27), 15.0);
            assert_eq!(x.map(-118.23), 935.0);

            let y = latitude_scale(&stations, 1103.0, 15.0).unwrap();
            // northernmost station sits at the top of the screen
            assert_eq!(y.map(34.06), 15.0);
            assert_eq!(y.map(34.03), 1088.0);
        }

        #[test]
        fn test_arc_scale_uses_global_peak() {
            let stations = vec![
                station("a", 34.0, -118.0, 3.0),
                station("b", 34.1, -118.1, 25.0),
            ];
            let arc = arc_radius_scale(&stations, 50.0).unwrap();
            assert_eq!(arc.domain_max(), 25.0);
            assert_eq!(arc.map(25.0), 50.0);
            assert_eq!(arc.map(12.5), 25.0);
        }

        #[test]
        fn test_arc_scale_considers_end_counts() {
            // every start count is 1, but one end count is larger
            let mut only_ends = station("a", 34.0, -118.0, 1.0);
            only_ends.end_counts[10] = 40.0;
            let arc = arc_radius_scale(&[only_ends], 50.0).unwrap();
            assert_eq!(arc.domain_max(), 40.0);
        }
    }
}

/// What the user currently has selected, and the only two ways to change it.
pub mod selection {
    use mbs_core::error::DataError;
    use mbs_core::period::PeriodMode;
    use mbs_core::time_slot::SLOTS_PER_DAY;

    /// Slot shown before the user first touches the slider (08:00-08:30).
    pub const DEFAULT_TIME_SLOT: usize = 16;

    /// Session-long selection state.
    ///
    /// Mutated only through [`select_period`](SelectionState::select_period)
    /// and [`select_time_slot`](SelectionState::select_time_slot); both
    /// report whether anything changed so the view layer triggers exactly
    /// one redraw per real transition and none for repeats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelectionState {
        period_mode: PeriodMode,
        time_slot: usize,
    }

    impl SelectionState {
        pub fn new() -> Self {
            SelectionState {
                period_mode: PeriodMode::Weekday,
                time_slot: DEFAULT_TIME_SLOT,
            }
        }

        pub fn period_mode(&self) -> PeriodMode {
            self.period_mode
        }

        pub fn time_slot(&self) -> usize {
            self.time_slot
        }

        /// Switch aggregation partition. Returns `true` when a redraw is
        /// needed, `false` for a repeated identical selection.
        #[must_use]
        pub fn select_period(&mut self, mode: PeriodMode) -> bool {
            if self.period_mode == mode {
                return false;
            }
            self.period_mode = mode;
            true
        }

        /// Move the time-slot slider. Indices outside `[0, 48)` are rejected
        /// synchronously so the view never reaches a transient inconsistent
        /// state; a bounded slider cannot produce them.
        #[must_use]
        pub fn select_time_slot(&mut self, index: i64) -> Result<bool, DataError> {
            if index < 0 || index >= SLOTS_PER_DAY as i64 {
                return Err(DataError::OutOfRange {
                    index,
                    limit: SLOTS_PER_DAY,
                });
            }
            let slot = index as usize;
            if self.time_slot == slot {
                return Ok(false);
            }
            self.time_slot = slot;
            Ok(true)
        }
    }

    impl Default for SelectionState {
        fn default() -> Self {
            SelectionState::new()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_default_selection() {
            let state = SelectionState::new();
            assert_eq!(state.period_mode(), PeriodMode::Weekday);
            assert_eq!(state.time_slot(), 16);
        }

        #[test]
        fn test_period_toggle_signals_once() {
            let mut state = SelectionState::new();
            assert!(state.select_period(PeriodMode::Weekend));
            assert!(!state.select_period(PeriodMode::Weekend));
            assert!(state.select_period(PeriodMode::Weekday));
        }

        #[test]
        fn test_time_slot_idempotent() {
            let mut state = SelectionState::new();
            assert_eq!(state.select_time_slot(20), Ok(true));
            assert_eq!(state.select_time_slot(20), Ok(false));
            assert_eq!(state.time_slot(), 20);
        }

        #[test]
        fn test_repeated_default_is_a_no_op() {
            let mut state = SelectionState::new();
            assert_eq!(state.select_time_slot(16), Ok(false));
        }

        #[test]
        fn test_boundaries() {
            let mut state = SelectionState::new();
            assert_eq!(state.select_time_slot(47), Ok(true));
            assert_eq!(
                state.select_time_slot(48),
                Err(DataError::OutOfRange {
                    index: 48,
                    limit: 48
                })
            );
            assert_eq!(
                state.select_time_slot(-1),
                Err(DataError::OutOfRange {
                    index: -1,
                    limit: 48
                })
            );
            // rejected transitions leave the state untouched
            assert_eq!(state.time_slot(), 47);
        }
    }
}
