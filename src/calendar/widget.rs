use super::grid::DayCell;
use super::util::Roles;
use super::view::CalendarView;
use crate::store::Event;
use crate::theme::{
    ACTIVE_STYLE, BASE_STYLE, NAV_STYLE, SELECTED_MODIFIER, TITLE_STYLE, WEEKDAY_STYLE,
    WEEKEND_NAME_STYLE, WEEKEND_STYLE,
};
use ratatui::{
    buffer::{Buffer, Cell},
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::{Paragraph, Widget},
};
use std::iter::zip;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 6;

/// Width of the calendar in columns
pub(crate) const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Number of lines taken up by the title, the weekday names, and their rule
const HEADER_LINES: u16 = 3;

/// Weekday names are indented by this many columns so that they line up with
/// the day numbers
const NAME_INDENT: u16 = 1;

const ACS_HLINE: char = '─';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<'a> {
    view: &'a CalendarView,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(view: &'a CalendarView) -> Calendar<'a> {
        Calendar { view }
    }

    /// Number of lines needed to draw everything
    pub(crate) fn height(&self) -> u16 {
        let events = self.focus_events().len();
        let events = if events == 0 { 0 } else { events + 1 };
        let lines = usize::from(HEADER_LINES) + self.view.grid.rows() + events;
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    fn focus_events(&self) -> &'a [Event] {
        match self.view.focus_day().and_then(|date| self.view.grid.cell(date)) {
            Some(cell) => &cell.events,
            None => &[],
        }
    }
}

impl Widget for Calendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let area = Rect {
            x: area.x + left,
            width: MAIN_WIDTH.min(area.width),
            ..area
        };
        let view = self.view;
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(view);
        canvas.draw_header(view);
        let mut y = HEADER_LINES;
        for week in &view.grid.weeks {
            for (col, cell) in zip(0u16.., &week.days) {
                canvas.draw_day(y, col, cell);
            }
            y = y.saturating_add(1);
        }
        let events = self.focus_events();
        if !events.is_empty() {
            y = y.saturating_add(1);
            for ev in events {
                let s = format!(
                    "{:02}:{:02}  {}",
                    ev.start.hour(),
                    ev.start.minute(),
                    ev.title
                );
                canvas.mvprint(y, 0, s, Some(BASE_STYLE));
                y = y.saturating_add(1);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, view: &CalendarView) {
        if let Some(prev) = &view.previous {
            self.mvprint(0, 0, &prev.link, Some(NAV_STYLE));
        }
        let current = Line::raw(view.current.as_str());
        let x = MAIN_WIDTH.saturating_sub(width_of(&current)) / 2;
        self.mvprint(0, x, &view.current, Some(TITLE_STYLE));
        if let Some(next) = &view.next {
            let x = MAIN_WIDTH.saturating_sub(width_of(&Line::raw(next.link.as_str())));
            self.mvprint(0, x, &next.link, Some(NAV_STYLE));
        }
    }

    fn draw_header(&mut self, view: &CalendarView) {
        for header in &view.headers {
            let name = header
                .name
                .chars()
                .take(view.day_short_length)
                .collect::<String>();
            let style = if header.roles.contains(Roles::WEEKEND) {
                WEEKEND_NAME_STYLE
            } else {
                WEEKDAY_STYLE
            };
            let Ok(col) = u16::try_from(header.position) else {
                continue;
            };
            self.mvprint(1, col * DAY_WIDTH + NAME_INDENT, name, Some(style));
        }
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, y: u16, col: u16, cell: &DayCell<Event>) {
        let Some(day) = cell.label() else {
            return;
        };
        let s = if cell.roles.contains(Roles::TODAY) {
            format!("[{day:2}]")
        } else {
            format!(" {day:2} ")
        };
        self.mvprint(y, col * DAY_WIDTH, s, Some(day_style(cell)));
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}

fn day_style<E>(cell: &DayCell<E>) -> Style {
    let style = if cell.is_active() {
        ACTIVE_STYLE
    } else if cell.roles.contains(Roles::WEEKEND) {
        WEEKEND_STYLE
    } else {
        BASE_STYLE
    };
    if cell.roles.contains(Roles::SELECTED) {
        style.add_modifier(SELECTED_MODIFIER)
    } else {
        style
    }
}

fn width_of(line: &Line<'_>) -> u16 {
    u16::try_from(line.width()).unwrap_or(u16::MAX)
}

/// Returns the text of each row of `buf`, for printing outside of a terminal
/// UI
pub(crate) fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf.cell((x, y)).map_or(" ", Cell::symbol))
                .collect()
        })
        .collect()
}
