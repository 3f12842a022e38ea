use super::grid::{DayCell, WeekRow, WeekdayHeader};
use super::nav::{Direction, NavigationLink};
use super::util::Roles;
use super::view::{CalendarView, DayLink};
use crate::store::Event;
use askama::Template;

/// A month rendered as a `minicalendar` HTML table
#[derive(Clone, Debug, Eq, PartialEq, Template)]
#[template(path = "minicalendar.html")]
pub(crate) struct HtmlCalendar<'a> {
    current: &'a str,
    previous: NavCell<'a>,
    next: NavCell<'a>,
    headers: Vec<HeaderCell<'a>>,
    weeks: Vec<WeekCells<'a>>,
}

impl<'a> HtmlCalendar<'a> {
    pub(crate) fn new(view: &'a CalendarView) -> HtmlCalendar<'a> {
        HtmlCalendar {
            current: &view.current,
            previous: NavCell::new(view, Direction::Previous),
            next: NavCell::new(view, Direction::Next),
            headers: view
                .headers
                .iter()
                .map(|h| HeaderCell::new(h, view.day_short_length))
                .collect(),
            weeks: view
                .grid
                .weeks
                .iter()
                .map(|w| WeekCells::new(view, w))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct NavCell<'a> {
    class: &'static str,
    link: Option<&'a NavigationLink>,
}

impl<'a> NavCell<'a> {
    fn new(view: &'a CalendarView, direction: Direction) -> NavCell<'a> {
        let class = match direction {
            Direction::Previous => "previous",
            Direction::Next => "next",
        };
        NavCell {
            class,
            link: view.link(direction),
        }
    }

    /// Whether the « label comes before the month title
    fn label_first(&self) -> bool {
        self.link
            .is_some_and(|link| link.direction == Direction::Previous)
    }
}

/// Weekday name split into the visible short form and the hidden rest
#[derive(Clone, Debug, Eq, PartialEq)]
struct HeaderCell<'a> {
    class: String,
    short: &'a str,
    rest: &'a str,
}

impl<'a> HeaderCell<'a> {
    fn new(header: &'a WeekdayHeader, short_length: usize) -> HeaderCell<'a> {
        let split = header
            .name
            .char_indices()
            .nth(short_length)
            .map_or(header.name.len(), |(i, _)| i);
        let (short, rest) = header.name.split_at(split);
        HeaderCell {
            class: class_attr("label", header.roles),
            short,
            rest,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct WeekCells<'a> {
    class: String,
    days: Vec<DayHtml<'a>>,
}

impl<'a> WeekCells<'a> {
    fn new(view: &'a CalendarView, week: &WeekRow<Event>) -> WeekCells<'a> {
        WeekCells {
            class: week.class_name(),
            days: week.days.iter().map(|c| DayHtml::new(view, c)).collect(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct DayHtml<'a> {
    class: String,
    /// Day of the month; `None` for padding
    label: Option<u8>,
    link: Option<&'a DayLink>,
}

impl<'a> DayHtml<'a> {
    fn new(view: &'a CalendarView, cell: &DayCell<Event>) -> DayHtml<'a> {
        let label = cell.label();
        DayHtml {
            class: class_attr("days", cell.roles),
            label,
            link: label.and(view.day_links.get(&cell.date)),
        }
    }
}

fn class_attr(base: &str, roles: Roles) -> String {
    if roles.is_empty() {
        base.to_owned()
    } else {
        format!("{base} {roles}")
    }
}
