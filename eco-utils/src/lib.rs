//! Shared utility functions for EcoFish crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Date format used for sample dates: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
    }

    /// Parse the calendar date out of a sample `date` field.
    ///
    /// Accepts a bare "YYYY-MM-DD" as well as timestamps that start with one
    /// ("2021-06-03T10:00:00Z", "2021-06-03 10:00").
    pub fn parse_sample_date(s: &str) -> Option<NaiveDate> {
        let trimmed = s.trim();
        let head = trimmed.get(..10).unwrap_or(trimmed);
        parse_date(head).ok()
    }

    /// Build a "YYYY-MM-DD" string from the nesting position of a sample.
    ///
    /// `month` is 1-based. The day key is used as written, left-padded with
    /// zeros to two characters.
    pub fn synthesize_date(year: &str, month: u32, day_key: &str) -> String {
        format!("{}-{:02}-{:0>2}", year, month, day_key.trim())
    }

    /// Format a year/month pair as "YYYY-MM"
    pub fn year_month(year: i32, month: u32) -> String {
        format!("{:04}-{:02}", year, month)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_synthesize_date_pads_month_and_day() {
            assert_eq!(synthesize_date("2020", 1, "5"), "2020-01-05");
            assert_eq!(synthesize_date("2020", 11, "23"), "2020-11-23");
            assert_eq!(synthesize_date("2020", 3, "07"), "2020-03-07");
        }

        #[test]
        fn test_parse_sample_date_accepts_timestamps() {
            let expected = NaiveDate::from_ymd_opt(2021, 6, 3).unwrap();
            assert_eq!(parse_sample_date("2021-06-03"), Some(expected));
            assert_eq!(parse_sample_date("2021-06-03T10:00:00Z"), Some(expected));
            assert_eq!(parse_sample_date(" 2021-06-03 10:00"), Some(expected));
            assert_eq!(parse_sample_date("June 3rd"), None);
            assert_eq!(parse_sample_date("2021-02-30"), None);
        }

        #[test]
        fn test_year_month() {
            assert_eq!(year_month(2019, 4), "2019-04");
        }
    }
}

/// Number formatting helpers
pub mod format {
    /// Format a value with a fixed number of decimal places.
    pub fn fixed(value: f64, places: usize) -> String {
        format!("{:.*}", places, value)
    }

    /// Percent change from `previous` to `current`.
    ///
    /// Returns `None` when `previous` is exactly zero.
    pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
        if previous == 0.0 {
            return None;
        }
        Some((current - previous) / previous * 100.0)
    }

}
