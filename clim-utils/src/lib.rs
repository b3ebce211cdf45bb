//! Shared utility functions for climate chart crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Parse a sample timestamp into `(year, month)`.
    ///
    /// Accepts the monthly `YYYY-MM` form used by the measurement feeds as
    /// well as finer `YYYY-MM-DD` timestamps; the day is validated and then
    /// dropped since aggregation groups by month.
    pub fn parse_month_key(s: &str) -> anyhow::Result<(i32, u32)> {
        let s = s.trim();
        let date = if s.len() <= 7 {
            NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")?
        } else {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")?
        };
        Ok((date.year(), date.month()))
    }

    /// Format a `(year, month)` pair as "YYYY-MM"
    pub fn format_month_key(year: i32, month: u32) -> String {
        format!("{:04}-{:02}", year, month)
    }

}

/// Year input coercion.
///
/// Range inputs come from form controls as strings. Bad input is never an
/// error: non-numeric values are dropped and numeric values are clamped into
/// the dataset's year span.
pub mod years {
    /// Clamp `year` into `min..=max`.
    pub fn clamp_year(year: i32, min: i32, max: i32) -> i32 {
        year.max(min).min(max)
    }

    /// Parse a year typed or selected in a control.
    ///
    /// Reads an optional sign and the leading digits, ignoring whatever
    /// follows them, so `"1950.7"` and `"1950abc"` both give 1950. Returns
    /// `None` when there are no leading digits.
    pub fn coerce_year(input: &str, min: i32, max: i32) -> Option<i32> {
        let s = input.trim();
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        // only fails on overflow
        let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
        let year = if negative { -magnitude } else { magnitude };
        Some(year.clamp(min as i64, max as i64) as i32)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_clamp_year() {
            assert_eq!(clamp_year(1800, 1881, 2006), 1881);
            assert_eq!(clamp_year(2100, 1881, 2006), 2006);
            assert_eq!(clamp_year(1950, 1881, 2006), 1950);
        }

        #[test]
        fn test_coerce_year() {
            assert_eq!(coerce_year("1950", 1881, 2006), Some(1950));
            assert_eq!(coerce_year(" 1999 ", 1881, 2006), Some(1999));
            assert_eq!(coerce_year("1950.7", 1881, 2006), Some(1950));
            assert_eq!(coerce_year("99999999999", 1881, 2006), Some(2006));
            assert_eq!(coerce_year("-5", 1881, 2006), Some(1881));
        }

        #[test]
        fn test_coerce_year_non_numeric() {
            assert_eq!(coerce_year("abc", 1881, 2006), None);
            assert_eq!(coerce_year("", 1881, 2006), None);
            assert_eq!(coerce_year("NaN", 1881, 2006), None);
            assert_eq!(coerce_year("-", 1881, 2006), None);
            assert_eq!(coerce_year(".5", 1881, 2006), None);
        }

        #[test]
        fn test_coerce_year_reads_leading_digits() {
            assert_eq!(coerce_year("1950abc", 1881, 2006), Some(1950));
            assert_eq!(coerce_year("1990 AD", 1881, 2006), Some(1990));
            assert_eq!(coerce_year("+1960", 1881, 2006), Some(1960));
            assert_eq!(coerce_year("2e3", 1881, 2006), Some(1881));
            assert_eq!(coerce_year("123456789012345678901234", 1881, 2006), Some(2006));
        }
    }
}
