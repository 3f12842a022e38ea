use super::util::{DateKey, Roles, WeekdayExt, YearMonth, DAYS_IN_WEEK};
use crate::locale::Localizer;
use log::trace;
use std::collections::BTreeMap;
use std::iter::successors;
use thiserror::Error;
use time::{Date, Duration, Weekday};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekdayHeader {
    pub(crate) position: usize,
    pub(crate) weekday: Weekday,
    pub(crate) name: String,
    pub(crate) roles: Roles,
}

/// Events of a date range, keyed by day.  Each day holds groups of
/// occurrences (one group per start time) in display order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventsIndex<E>(BTreeMap<Date, Vec<Vec<E>>>);

impl<E> EventsIndex<E> {
    pub(crate) fn new() -> Self {
        EventsIndex(BTreeMap::new())
    }

    pub(crate) fn push_group(&mut self, date: Date, group: Vec<E>) {
        self.0.entry(date).or_default().push(group);
    }

    pub(crate) fn get(&self, date: Date) -> Option<&[Vec<E>]> {
        self.0.get(&date).map(Vec::as_slice)
    }

    pub(crate) fn days(&self) -> usize {
        self.0.len()
    }
}

impl<E> Default for EventsIndex<E> {
    fn default() -> Self {
        EventsIndex::new()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayCell<E> {
    /// Date the cell stands for.  Padding cells carry the neighboring
    /// month's dates.
    pub(crate) date: Date,
    // Only set for days of the rendered month
    pub(crate) key: Option<DateKey>,
    pub(crate) roles: Roles,
    pub(crate) events: Vec<E>,
}

impl<E> DayCell<E> {
    /// Day number to display, or `None` for a blank padding cell
    pub(crate) fn label(&self) -> Option<u8> {
        self.key.map(|DateKey(date)| date.day())
    }

    pub(crate) fn is_active(&self) -> bool {
        self.roles.contains(Roles::ACTIVE)
    }

    pub(crate) fn event_count(&self) -> usize {
        self.events.len()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekRow<E> {
    pub(crate) index: usize,
    pub(crate) first: bool,
    pub(crate) last: bool,
    // Invariant: exactly DAYS_IN_WEEK cells
    pub(crate) days: Vec<DayCell<E>>,
}

impl<E> WeekRow<E> {
    pub(crate) fn key(&self) -> String {
        format!("week_{}", self.index)
    }

    /// The row key followed by its "first"/"last" tags
    pub(crate) fn class_name(&self) -> String {
        let mut s = self.key();
        if self.first {
            s.push_str(" first");
        }
        if self.last {
            s.push_str(" last");
        }
        s
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayGrid<E> {
    pub(crate) month: YearMonth,
    pub(crate) first_day_offset: usize,
    pub(crate) weeks: Vec<WeekRow<E>>,
}

impl<E> DayGrid<E> {
    pub(crate) fn rows(&self) -> usize {
        self.weeks.len()
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = &DayCell<E>> + '_ {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub(crate) fn cell(&self, date: Date) -> Option<&DayCell<E>> {
        self.cells().find(|c| c.key == Some(DateKey(date)))
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot lay out {0}: reached the end of time")]
pub(crate) struct OutOfTimeError(pub(crate) YearMonth);

/// Returns the seven column headers of a week beginning on `start_day`
pub(crate) fn build_weekday_headers<L: Localizer + ?Sized>(
    start_day: Weekday,
    locale: &L,
) -> Vec<WeekdayHeader> {
    successors(Some(start_day), |wd| Some(wd.next()))
        .take(DAYS_IN_WEEK)
        .enumerate()
        .map(|(position, weekday)| WeekdayHeader {
            position,
            weekday,
            name: locale.day_name(weekday).to_owned(),
            roles: Roles::for_column(position, weekday),
        })
        .collect()
}

/// Number of padding cells in front of the first day of the month
pub(crate) fn first_day_offset(month_begin: Date, start_day: Weekday) -> u8 {
    (7 + month_begin.weekday().index0() - start_day.index0()) % 7
}

/// Lays out `month` as whole weeks beginning on `start_day`, attaching the
/// events that `events` lists for each day of the month.
pub(crate) fn build_day_grid<E: Clone>(
    month: YearMonth,
    start_day: Weekday,
    today: Date,
    selected: Option<Date>,
    events: &EventsIndex<E>,
) -> Result<DayGrid<E>, OutOfTimeError> {
    let month_begin = month.first_day().ok_or(OutOfTimeError(month))?;
    let offset = first_day_offset(month_begin, start_day);
    let rows = (usize::from(month.days()) + usize::from(offset)).div_ceil(DAYS_IN_WEEK);
    trace!("Laying out {month}: {offset} leading cells, {rows} rows");
    let grid_start = month_begin
        .checked_sub(Duration::days(offset.into()))
        .ok_or(OutOfTimeError(month))?;
    let dates = successors(Some(grid_start), |d| d.next_day())
        .take(rows * DAYS_IN_WEEK)
        .collect::<Vec<_>>();
    if dates.len() < rows * DAYS_IN_WEEK {
        return Err(OutOfTimeError(month));
    }
    let weeks = dates
        .chunks(DAYS_IN_WEEK)
        .enumerate()
        .map(|(index, week)| WeekRow {
            index,
            first: index == 0,
            last: index + 1 == rows,
            days: week
                .iter()
                .enumerate()
                .map(|(position, &date)| {
                    make_cell(month, position, date, today, selected, events)
                })
                .collect(),
        })
        .collect();
    Ok(DayGrid {
        month,
        first_day_offset: usize::from(offset),
        weeks,
    })
}

fn make_cell<E: Clone>(
    month: YearMonth,
    position: usize,
    date: Date,
    today: Date,
    selected: Option<Date>,
    events: &EventsIndex<E>,
) -> DayCell<E> {
    let mut roles = Roles::for_column(position, date.weekday());
    if !month.contains(date) {
        return DayCell {
            date,
            key: None,
            roles: roles | Roles::EMPTY,
            events: Vec::new(),
        };
    }
    if date == today {
        roles.insert(Roles::TODAY);
    }
    if selected == Some(date) {
        roles.insert(Roles::SELECTED);
    }
    let day_events = if let Some(groups) = events.get(date) {
        roles.insert(Roles::ACTIVE);
        groups.iter().flatten().cloned().collect()
    } else {
        roles.insert(Roles::INACTIVE);
        Vec::new()
    };
    DayCell {
        date,
        key: Some(DateKey(date)),
        roles,
        events: day_events,
    }
}
