use super::util::YearMonth;
use crate::locale::Localizer;
use log::debug;
use time::{Date, Month};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Previous,
    Next,
}

/// Date range covered by the stored events of the selected calendars.  All
/// fields are `None` when there are no events at all.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Boundaries {
    pub(crate) earliest_start: Option<Date>,
    pub(crate) latest_end: Option<Date>,
    pub(crate) latest_repeat_end: Option<Date>,
}

impl Boundaries {
    /// The last date on which any event can still occur
    pub(crate) fn latest(&self) -> Option<Date> {
        let end = self.latest_end?;
        Some(match self.latest_repeat_end {
            Some(repeat_end) => end.max(repeat_end),
            None => end,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct NavigationLink {
    pub(crate) direction: Direction,
    pub(crate) target: YearMonth,
    pub(crate) href: String,
    /// "<Month> <Year>" of the target month
    pub(crate) title: String,
    /// Title combined with the direction label
    pub(crate) link: String,
    /// The bare direction label
    pub(crate) label: String,
}

pub(crate) fn adjacent_month(ym: YearMonth, direction: Direction) -> YearMonth {
    match (direction, ym.month()) {
        (Direction::Previous, Month::January) => YearMonth::new(ym.year() - 1, Month::December),
        (Direction::Previous, m) => YearMonth::new(ym.year(), m.previous()),
        (Direction::Next, Month::December) => YearMonth::new(ym.year() + 1, Month::January),
        (Direction::Next, m) => YearMonth::new(ym.year(), m.next()),
    }
}

/// Whether a link to `candidate` may be shown: it must either be reachable
/// from the current month or lie within the span of stored events.
pub(crate) fn navigation_visible(
    candidate: YearMonth,
    today: Date,
    bounds: &Boundaries,
    direction: Direction,
) -> bool {
    let current = YearMonth::of(today);
    match direction {
        Direction::Previous => {
            candidate >= current
                || bounds
                    .earliest_start
                    .is_some_and(|start| candidate >= YearMonth::of(start))
        }
        Direction::Next => {
            candidate <= current
                || bounds
                    .latest()
                    .is_some_and(|end| candidate <= YearMonth::of(end))
        }
    }
}

/// Builds the link from `current` to the adjacent month in `direction`, or
/// returns `None` if that month has nothing to show
pub(crate) fn navigation_link<L: Localizer + ?Sized>(
    current: YearMonth,
    direction: Direction,
    today: Date,
    bounds: &Boundaries,
    base_url: &str,
    locale: &L,
) -> Option<NavigationLink> {
    let target = adjacent_month(current, direction);
    if !navigation_visible(target, today, bounds, direction) {
        debug!("No {direction:?} link from {current}: {target} has no reachable events");
        return None;
    }
    let title = month_title(target, locale);
    let (link, label) = match direction {
        Direction::Previous => {
            let label = locale.previous_label();
            (format!("{label} {title}"), label)
        }
        Direction::Next => {
            let label = locale.next_label();
            (format!("{title} {label}"), label)
        }
    };
    Some(NavigationLink {
        direction,
        target,
        href: format!("{base_url}?month={target}"),
        title,
        link,
        label: label.to_owned(),
    })
}

pub(crate) fn month_title<L: Localizer + ?Sized>(ym: YearMonth, locale: &L) -> String {
    format!("{} {}", locale.month_name(ym.month()), ym.year())
}
