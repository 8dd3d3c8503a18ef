use chrono::{DateTime, Timelike, Utc};
use chrono_tz::US::Eastern;
use serde::{Deserialize, Serialize};
use std::fmt;

// Session windows as minute offsets from midnight ET.
const ASIA_WINDOW: (u32, u32) = (20 * 60, 0);
const LONDON_WINDOW: (u32, u32) = (2 * 60, 5 * 60);
const NY_WINDOW: (u32, u32) = (7 * 60, 12 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Asia,
    London,
    Ny,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Asia => write!(f, "asia"),
            Session::London => write!(f, "london"),
            Session::Ny => write!(f, "ny"),
        }
    }
}

impl Session {
    /// Classify a UTC timestamp into a trading session by its ET wall time.
    /// Returns `None` outside all three windows.
    pub fn from_timestamp(ts: DateTime<Utc>) -> Option<Session> {
        let et = ts.with_timezone(&Eastern);
        let minute_of_day = et.hour() * 60 + et.minute();

        for (session, (start, end)) in [
            (Session::Asia, ASIA_WINDOW),
            (Session::London, LONDON_WINDOW),
            (Session::Ny, NY_WINDOW),
        ] {
            let in_window = if start < end {
                minute_of_day >= start && minute_of_day < end
            } else {
                // Wraps midnight (Asia 20:00 - 00:00)
                minute_of_day >= start || minute_of_day < end
            };
            if in_window {
                return Some(session);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn london_window() {
        // 3am ET in January (EST = UTC-5) is 08:00 UTC
        assert_eq!(
            Session::from_timestamp(utc("2024-01-15T08:00:00Z")),
            Some(Session::London)
        );
    }

    #[test]
    fn ny_window() {
        // 9am ET = 14:00 UTC
        assert_eq!(
            Session::from_timestamp(utc("2024-01-15T14:00:00Z")),
            Some(Session::Ny)
        );
    }

    #[test]
    fn asia_window_wraps_midnight() {
        // 9pm ET = 02:00 UTC next day
        assert_eq!(
            Session::from_timestamp(utc("2024-01-16T02:00:00Z")),
            Some(Session::Asia)
        );
    }

    #[test]
    fn off_session_is_none() {
        // 2pm ET = 19:00 UTC
        assert_eq!(Session::from_timestamp(utc("2024-01-15T19:00:00Z")), None);
    }
}
