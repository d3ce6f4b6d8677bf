//! Display strings derived from held records. Pure; recomputed on every call.

use chrono::DateTime;

/// `"14 November 2023"` for 1_700_000_000. UTC, English month names.
/// Timestamps chrono cannot represent render as an empty string.
pub fn format_date(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%-d %B %Y").to_string())
        .unwrap_or_default()
}

pub fn format_likes(count: u64) -> String {
    format!("❤️ {count}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_uses_day_full_month_year() {
        assert_eq!(format_date(1_700_000_000), "14 November 2023");
    }

    #[test]
    fn date_day_is_not_zero_padded() {
        // 2021-03-05T00:00:00Z
        assert_eq!(format_date(1_614_902_400), "5 March 2021");
    }

    #[test]
    fn date_is_utc() {
        // 2023-12-31T23:59:59Z
        assert_eq!(format_date(1_704_067_199), "31 December 2023");
        assert_eq!(format_date(1_704_067_200), "1 January 2024");
    }

    #[test]
    fn epoch_and_negative_timestamps() {
        assert_eq!(format_date(0), "1 January 1970");
        assert_eq!(format_date(-86_400), "31 December 1969");
    }

    #[test]
    fn out_of_range_timestamp_is_empty() {
        assert_eq!(format_date(i64::MAX), "");
    }

    #[test]
    fn likes_have_no_separators() {
        assert_eq!(format_likes(0), "❤️ 0");
        assert_eq!(format_likes(42), "❤️ 42");
        assert_eq!(format_likes(1_234_567), "❤️ 1234567");
    }
}
