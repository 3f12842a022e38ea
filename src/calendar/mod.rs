mod grid;
mod html;
mod nav;
mod target;
mod util;
mod view;
mod widget;
pub(crate) use self::grid::EventsIndex;
pub(crate) use self::html::HtmlCalendar;
pub(crate) use self::nav::{Boundaries, Direction};
pub(crate) use self::target::{resolve_target_date, RequestParams, TargetDate};
pub(crate) use self::util::YearMonth;
pub(crate) use self::view::{compile, generate, CalendarView, Rendered, Surface};
pub(crate) use self::widget::{buffer_lines, Calendar, MAIN_WIDTH};
