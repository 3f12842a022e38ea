use std::cmp::Ordering;
use std::fmt;
use time::{Date, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;
    fn is_weekend(&self) -> bool;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }

    fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

/// A calendar month of a specific year, ordered chronologically
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub(crate) fn new(year: i32, month: Month) -> YearMonth {
        YearMonth { year, month }
    }

    pub(crate) fn of(date: Date) -> YearMonth {
        YearMonth::new(date.year(), date.month())
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn days(&self) -> u8 {
        match self.month {
            Month::February if time::util::is_leap_year(self.year) => 29,
            Month::February => 28,
            Month::April | Month::June | Month::September | Month::November => 30,
            _ => 31,
        }
    }

    // Returns `None` if the month lies outside the range of representable
    // dates
    pub(crate) fn first_day(&self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, 1).ok()
    }

    pub(crate) fn last_day(&self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, self.days()).ok()
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        YearMonth::of(date) == *self
    }

    fn sort_key(&self) -> (i32, u8) {
        (self.year, u8::from(self.month))
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &YearMonth) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &YearMonth) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Formats as `YYYYMM`, the form used by the `month` request parameter
impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, u8::from(self.month))
    }
}

/// A date formatted as a zero-padded `YYYYMMDD` key
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct DateKey(pub(crate) Date);

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

bitflags::bitflags! {
    /// Presentation roles of a weekday header or a day cell, in the order
    /// their class names are written
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub(crate) struct Roles: u16 {
        /// Padding cell outside the month
        const EMPTY = 1;
        /// Day with at least one event
        const ACTIVE = 1 << 1;
        /// Day without events
        const INACTIVE = 1 << 2;
        const WEEKEND = 1 << 3;
        const COL_FIRST = 1 << 4;
        const COL_LAST = 1 << 5;
        const TODAY = 1 << 6;
        const SELECTED = 1 << 7;
    }
}

impl Roles {
    /// Column and weekend tags shared by weekday headers and day cells
    pub(crate) fn for_column(position: usize, weekday: Weekday) -> Roles {
        let mut roles = Roles::empty();
        if position == 0 {
            roles |= Roles::COL_FIRST;
        } else if position == DAYS_IN_WEEK - 1 {
            roles |= Roles::COL_LAST;
        }
        roles.set(Roles::WEEKEND, weekday.is_weekend());
        roles
    }
}

/// Space-separated class names
impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&name.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_days_in_month() {
        assert_eq!(YearMonth::new(2023, Month::February).days(), 28);
        assert_eq!(YearMonth::new(2024, Month::February).days(), 29);
        assert_eq!(YearMonth::new(1900, Month::February).days(), 28);
        assert_eq!(YearMonth::new(2000, Month::February).days(), 29);
        assert_eq!(YearMonth::new(2024, Month::April).days(), 30);
        assert_eq!(YearMonth::new(2024, Month::December).days(), 31);
    }

    #[test]
    fn test_month_bounds() {
        let ym = YearMonth::new(2024, Month::June);
        assert_eq!(ym.first_day(), Some(date!(2024 - 06 - 01)));
        assert_eq!(ym.last_day(), Some(date!(2024 - 06 - 30)));
        assert!(ym.contains(date!(2024 - 06 - 15)));
        assert!(!ym.contains(date!(2024 - 07 - 01)));
        assert_eq!(YearMonth::new(10000, Month::January).first_day(), None);
    }

    #[test]
    fn test_year_month_ordering() {
        let may = YearMonth::new(2024, Month::May);
        let june = YearMonth::new(2024, Month::June);
        let last_dec = YearMonth::new(2023, Month::December);
        assert!(may < june);
        assert!(last_dec < may);
        assert_eq!(YearMonth::of(date!(2024 - 06 - 15)), june);
    }

    #[test]
    fn test_keys_are_zero_padded() {
        assert_eq!(YearMonth::new(2024, Month::March).to_string(), "202403");
        assert_eq!(DateKey(date!(2024 - 03 - 05)).to_string(), "20240305");
        assert_eq!(DateKey(date!(2024 - 11 - 25)).to_string(), "20241125");
    }

    #[test]
    fn test_roles_display() {
        let roles = Roles::TODAY | Roles::ACTIVE | Roles::WEEKEND;
        assert_eq!(roles.to_string(), "active weekend today");
        assert_eq!(
            (Roles::SELECTED | Roles::COL_FIRST | Roles::INACTIVE).to_string(),
            "inactive col_first selected"
        );
        assert_eq!(Roles::empty().to_string(), "");
    }

    #[test]
    fn test_column_roles() {
        let first = Roles::for_column(0, Weekday::Sunday);
        assert!(first.contains(Roles::COL_FIRST));
        assert!(first.contains(Roles::WEEKEND));
        let mid = Roles::for_column(3, Weekday::Wednesday);
        assert_eq!(mid, Roles::empty());
        let last = Roles::for_column(6, Weekday::Sunday);
        assert_eq!(last.to_string(), "weekend col_last");
    }
}
