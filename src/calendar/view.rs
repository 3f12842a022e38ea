use super::grid::{build_day_grid, build_weekday_headers, DayGrid, OutOfTimeError, WeekdayHeader};
use super::nav::{month_title, navigation_link, Direction, NavigationLink};
use super::target::{resolve_target_date, RequestParams, ResolveError, TargetDate};
use super::util::YearMonth;
use crate::config::Config;
use crate::locale::Localizer;
use crate::store::{Event, EventLookup, Selection};
use log::{debug, warn};
use std::collections::BTreeMap;
use thiserror::Error;
use time::{Date, PrimitiveDateTime};

/// Everything a renderer needs to draw one month
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarView {
    pub(crate) month: YearMonth,
    pub(crate) today: Date,
    pub(crate) selected: Option<Date>,
    /// "<Month> <Year>" of the shown month
    pub(crate) current: String,
    pub(crate) previous: Option<NavigationLink>,
    pub(crate) next: Option<NavigationLink>,
    pub(crate) headers: Vec<WeekdayHeader>,
    pub(crate) grid: DayGrid<Event>,
    pub(crate) day_links: BTreeMap<Date, DayLink>,
    pub(crate) day_short_length: usize,
}

impl CalendarView {
    pub(crate) fn link(&self, direction: Direction) -> Option<&NavigationLink> {
        match direction {
            Direction::Previous => self.previous.as_ref(),
            Direction::Next => self.next.as_ref(),
        }
    }

    /// The day whose events are listed: the selected day, or else today,
    /// whichever first falls in the shown month
    pub(crate) fn focus_day(&self) -> Option<Date> {
        self.selected
            .into_iter()
            .chain(Some(self.today))
            .find(|&date| self.month.contains(date))
    }
}

/// Link of a day that has events
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayLink {
    pub(crate) href: String,
    pub(crate) title: String,
}

/// Where the calendar is being shown
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Surface {
    Site,
    /// The editing interface, which only shows a placeholder
    Editor,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Rendered {
    /// No calendars are selected
    Nothing,
    Placeholder(String),
    Calendar(Box<CalendarView>),
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum RenderError {
    #[error(transparent)]
    NotFound(#[from] ResolveError),
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}

/// Produces the output for one request
pub(crate) fn generate<S, L>(
    surface: Surface,
    config: &Config,
    store: &S,
    locale: &L,
    params: &RequestParams,
    now: PrimitiveDateTime,
) -> Result<Rendered, RenderError>
where
    S: EventLookup + ?Sized,
    L: Localizer + ?Sized,
{
    if surface == Surface::Editor {
        let name = locale.module_name().to_uppercase();
        return Ok(Rendered::Placeholder(format!("### {name} ###")));
    }
    if config.calendars.is_empty() {
        debug!("No calendars selected; nothing to render");
        return Ok(Rendered::Nothing);
    }
    let target = resolve_target_date(params, now.date()).inspect_err(|e| warn!("{e}"))?;
    let view = compile(config, store, locale, &target, now)?;
    Ok(Rendered::Calendar(Box::new(view)))
}

/// Builds the view of `target`'s month.  `config.calendars` should not be
/// empty.
pub(crate) fn compile<S, L>(
    config: &Config,
    store: &S,
    locale: &L,
    target: &TargetDate,
    now: PrimitiveDateTime,
) -> Result<CalendarView, OutOfTimeError>
where
    S: EventLookup + ?Sized,
    L: Localizer + ?Sized,
{
    let today = now.date();
    let month = target.month;
    let selection = Selection {
        calendars: &config.calendars,
        now,
        preview: config.preview,
    };
    let bounds = store.boundaries(&selection);
    let [previous, next] = [Direction::Previous, Direction::Next]
        .map(|dir| navigation_link(month, dir, today, &bounds, &config.base_url, locale));
    let (Some(begin), Some(end)) = (target.month_begin(), target.month_end()) else {
        return Err(OutOfTimeError(month));
    };
    let events = store.events_index(&selection, begin, end);
    debug!("{} day(s) of {month} have events", events.days());
    let start_day = config.week_start_day.0;
    let grid = build_day_grid(month, start_day, today, target.day, &events)?;
    debug!(
        "{} starts after {} blank cell(s) and spans {} week(s)",
        grid.month,
        grid.first_day_offset,
        grid.rows()
    );
    let day_links = grid
        .cells()
        .filter(|c| c.is_active())
        .filter_map(|c| {
            let key = c.key?;
            let link = DayLink {
                href: format!("{}?day={key}", config.day_link_base()),
                title: locale.events_title(c.event_count()),
            };
            Some((key.0, link))
        })
        .collect();
    Ok(CalendarView {
        month,
        today,
        selected: target.day,
        current: month_title(month, locale),
        previous,
        next,
        headers: build_weekday_headers(start_day, locale),
        grid,
        day_links,
        day_short_length: locale.day_short_length(),
    })
}
