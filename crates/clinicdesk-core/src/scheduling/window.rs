//! The ±1 hour exclusion window around an appointment slot.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Minutes on either side of a slot that must be free of the doctor's other appointments.
pub const EXCLUSION_RADIUS_MINUTES: i64 = 60;

/// Closed interval `[requested - 1h, requested + 1h]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionWindow {
    pub requested: NaiveDateTime,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ExclusionWindow {
    /// Window centred on the requested slot, or `None` if a bound falls
    /// outside the representable calendar.
    pub fn around(requested: NaiveDateTime) -> Option<Self> {
        let radius = Duration::minutes(EXCLUSION_RADIUS_MINUTES);
        Some(Self {
            requested,
            start: requested.checked_sub_signed(radius)?,
            end: requested.checked_add_signed(radius)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_bounds() {
        let window = ExclusionWindow::around(ts("2024-01-10 10:00")).unwrap();
        assert_eq!(window.start, ts("2024-01-10 09:00"));
        assert_eq!(window.end, ts("2024-01-10 11:00"));
    }

    #[test]
    fn test_calendar_edges_have_no_window() {
        assert!(ExclusionWindow::around(NaiveDateTime::MAX).is_none());
        assert!(ExclusionWindow::around(NaiveDateTime::MIN).is_none());
    }
}
