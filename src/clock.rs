use time::{macros::format_description, OffsetDateTime};

/// Unix time in milliseconds; used as the id of user-created records.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// `hh:mm AM` wall-clock label shown next to chat messages.
pub fn clock_label(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour repr:12]:[minute] [period]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn labels_use_twelve_hour_clock() {
        assert_eq!(clock_label(datetime!(2025-03-01 09:05 UTC)), "09:05 AM");
        assert_eq!(clock_label(datetime!(2025-03-01 22:40 UTC)), "10:40 PM");
        assert_eq!(clock_label(datetime!(2025-03-01 00:00 UTC)), "12:00 AM");
    }

    #[test]
    fn millis_are_recent() {
        assert!(now_millis() > 1_700_000_000_000);
    }
}
