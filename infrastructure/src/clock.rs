//! Wall-clock helpers
//!
//! The domain keeps timestamps as opaque strings so it stays clock-free;
//! this is where they get minted.

/// Current UTC time as an RFC3339 string with millisecond precision.
pub fn utc_now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_parses_back() {
        let stamp = utc_now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
