use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar-date bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Range with no bounds; every date is contained.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Returns true if `date` lies within both bounds (inclusive).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start.format("%Y-%m-%d"))?;
        }
        write!(f, "..")?;
        if let Some(end) = self.end {
            write!(f, "={}", end.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::between(day(5), day(10));
        assert!(range.contains(day(5)));
        assert!(range.contains(day(10)));
        assert!(!range.contains(day(4)));
        assert!(!range.contains(day(11)));
    }

    #[test]
    fn test_open_bounds() {
        assert!(DateRange::unbounded().contains(day(1)));
        assert!(DateRange::new(Some(day(3)), None).contains(day(31)));
        assert!(!DateRange::new(None, Some(day(3))).contains(day(4)));
    }

    #[test]
    fn test_display() {
        assert_eq!(DateRange::unbounded().to_string(), "..");
        assert_eq!(
            DateRange::new(Some(day(2)), None).to_string(),
            "2024-01-02.."
        );
        assert_eq!(
            DateRange::new(None, Some(day(9))).to_string(),
            "..=2024-01-09"
        );
    }
}
