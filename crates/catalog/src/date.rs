use chrono::NaiveDate;

use crate::error::MalformedDateError;

/// Parses a `YYYY-MM` project date into the first day of that month.
pub fn parse_year_month(raw: &str) -> Result<NaiveDate, MalformedDateError> {
    let (year, month) = raw
        .split_once('-')
        .ok_or_else(|| MalformedDateError::new(raw, "expected YYYY-MM"))?;
    if month.contains('-') {
        return Err(MalformedDateError::new(raw, "expected exactly one '-'"));
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedDateError::new(raw, "year must be four digits"));
    }
    if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedDateError::new(raw, "month must be two digits"));
    }

    let year: i32 = year
        .parse()
        .map_err(|_| MalformedDateError::new(raw, "year must be four digits"))?;
    let month: u32 = month
        .parse()
        .map_err(|_| MalformedDateError::new(raw, "month must be two digits"))?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| MalformedDateError::new(raw, "month must be between 01 and 12"))
}

/// `"2025-08"` → `"Aug 2025"`. Out-of-range months are rejected, never clamped.
pub fn format_date(raw: &str) -> Result<String, MalformedDateError> {
    Ok(parse_year_month(raw)?.format("%b %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_month_abbreviation_and_year() {
        assert_eq!(format_date("2025-08").as_deref(), Ok("Aug 2025"));
        assert_eq!(format_date("2022-01").as_deref(), Ok("Jan 2022"));
        assert_eq!(format_date("2024-12").as_deref(), Ok("Dec 2024"));
    }

    #[test]
    fn rejects_month_out_of_range() {
        let err = format_date("2025-13").expect_err("month 13");
        assert_eq!(err.reason, "month must be between 01 and 12");
        assert!(format_date("2025-00").is_err());
    }

    #[test]
    fn rejects_wrong_separator_count() {
        assert!(format_date("202508").is_err());
        assert!(format_date("2025-08-01").is_err());
        assert!(format_date("").is_err());
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert!(format_date("20x5-08").is_err());
        assert!(format_date("2025-8").is_err());
        assert!(format_date("2025-+8").is_err());
    }
}
