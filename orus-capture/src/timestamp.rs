//! Session timestamp formatting.

use chrono::{DateTime, FixedOffset, Utc};

/// Buenos Aires civil time: fixed UTC-3, no DST.
const UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Format of one session's grouping key.
///
/// The separators, zero padding and the literal `-GMT-03` suffix are
/// embedded verbatim in directory names and remote keys, so any change
/// here breaks downstream consumers.
const STAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-GMT-03";

/// Formats the current wall-clock time as a session timestamp.
pub fn session_stamp() -> String {
    stamp_at(Utc::now())
}

pub(crate) fn stamp_at(instant: DateTime<Utc>) -> String {
    let offset = FixedOffset::west_opt(UTC_OFFSET_SECS).unwrap();
    instant.with_timezone(&offset).format(STAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamp_format() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 17, 14, 30, 5).unwrap();
        assert_eq!(stamp_at(instant), "2025-01-17-11-30-05-GMT-03");
    }

    #[test]
    fn test_stamp_offset_has_no_dst() {
        // A mid-year instant gets the same -3h shift as a January one.
        let instant = Utc.with_ymd_and_hms(2025, 7, 1, 2, 0, 0).unwrap();
        assert_eq!(stamp_at(instant), "2025-06-30-23-00-00-GMT-03");
    }

    #[test]
    fn test_session_stamp_shape() {
        let stamp = session_stamp();
        assert!(stamp.ends_with("-GMT-03"));
        assert_eq!(stamp.len(), "2025-01-17-11-30-05-GMT-03".len());
    }
}
