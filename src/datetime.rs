use chrono::{DateTime, Utc};

pub fn display_datetime(datetime: DateTime<Utc>) -> String {
    datetime
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Millisecond stamp used to keep downloaded file names unique.
pub fn file_stamp(datetime: DateTime<Utc>) -> i64 {
    datetime.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stamp_is_unix_millis() {
        let datetime = DateTime::from_timestamp(1_700_000_000, 123_000_000).unwrap();
        assert_eq!(file_stamp(datetime), 1_700_000_000_123);
    }
}
