//! Appointment models.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A booked appointment. Identity is (doctor VAT, timestamp).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub doctor_vat: String,
    pub client_vat: String,
    pub timestamp: NaiveDateTime,
    pub description: String,
}

/// Attendance state of an appointment, derived at read time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// A consultation was recorded
    Attended,
    /// Still in the future, no consultation yet
    Scheduled,
    /// In the past with no consultation
    #[serde(rename = "Not Attended")]
    NotAttended,
}

impl AppointmentStatus {
    /// Derive the status of an appointment relative to `now`.
    pub fn derive(timestamp: NaiveDateTime, has_consultation: bool, now: NaiveDateTime) -> Self {
        if has_consultation {
            AppointmentStatus::Attended
        } else if timestamp > now {
            AppointmentStatus::Scheduled
        } else {
            AppointmentStatus::NotAttended
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Attended => "Attended",
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::NotAttended => "Not Attended",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a client's appointment history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientAppointment {
    pub timestamp: NaiveDateTime,
    pub doctor_vat: String,
    pub doctor_name: String,
    pub description: String,
    pub status: AppointmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;
    use proptest::prelude::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_status_cases() {
        let now = ts("2024-06-01 12:00");
        assert_eq!(
            AppointmentStatus::derive(ts("2024-07-01 09:00"), false, now),
            AppointmentStatus::Scheduled
        );
        assert_eq!(
            AppointmentStatus::derive(ts("2024-05-01 09:00"), true, now),
            AppointmentStatus::Attended
        );
        assert_eq!(
            AppointmentStatus::derive(ts("2024-05-01 09:00"), false, now),
            AppointmentStatus::NotAttended
        );
    }

    #[test]
    fn test_status_serializes_with_display_names() {
        let json = serde_json::to_string(&AppointmentStatus::NotAttended).unwrap();
        assert_eq!(json, "\"Not Attended\"");
        assert_eq!(AppointmentStatus::Scheduled.to_string(), "Scheduled");
    }

    proptest! {
        #[test]
        fn prop_consultation_always_means_attended(offset_min in -100_000i64..100_000) {
            let now = ts("2024-06-01 12:00");
            let at = now + chrono::Duration::minutes(offset_min);
            prop_assert_eq!(AppointmentStatus::derive(at, true, now), AppointmentStatus::Attended);
        }

        #[test]
        fn prop_without_consultation_status_follows_time(offset_min in -100_000i64..100_000) {
            let now = ts("2024-06-01 12:00");
            let at = now + chrono::Duration::minutes(offset_min);
            let expected = if offset_min > 0 {
                AppointmentStatus::Scheduled
            } else {
                AppointmentStatus::NotAttended
            };
            prop_assert_eq!(AppointmentStatus::derive(at, false, now), expected);
        }
    }
}
