use serde::{Deserialize, Serialize};
use std::fmt;

/// The two aggregation partitions of the dataset.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PeriodMode {
    Weekday,
    Weekend,
}

impl PeriodMode {
    /// Fraction of a week covered by this partition. The aggregation
    /// pipeline divides raw counters by `span_days * day_fraction()` to get
    /// per-day means.
    pub fn day_fraction(&self) -> f64 {
        match self {
            PeriodMode::Weekday => 5.0 / 7.0,
            PeriodMode::Weekend => 2.0 / 7.0,
        }
    }
}

impl fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodMode::Weekday => write!(f, "weekday"),
            PeriodMode::Weekend => write!(f, "weekend"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PeriodMode;

    #[test]
    fn test_day_fractions_cover_the_week() {
        let total = PeriodMode::Weekday.day_fraction() + PeriodMode::Weekend.day_fraction();
        assert!((total - 1.0).abs() < f64::EPSILON);
    }
}
