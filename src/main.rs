mod app;
mod calendar;
mod config;
mod help;
mod jumpto;
mod locale;
mod logging;
mod store;
mod theme;
use crate::app::App;
use crate::calendar::{
    buffer_lines, generate, Calendar, CalendarView, HtmlCalendar, RequestParams, Rendered, Surface,
    MAIN_WIDTH,
};
use crate::config::load_config;
use crate::logging::LogTarget;
use crate::store::EventStore;
use anyhow::Context;
use askama::Template;
use lexopt::{Arg, Parser, ValueExt};
use log::info;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal};
use std::path::PathBuf;
use time::{OffsetDateTime, PrimitiveDateTime, Time};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    config: Option<PathBuf>,
    events: Option<PathBuf>,
    params: RequestParams,
    show: bool,
    html: bool,
    editor: bool,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('e') | Arg::Long("events") => {
                    opts.events = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("month") => opts.params.month = Some(parser.value()?.string()?),
                Arg::Long("day") => opts.params.day = Some(parser.value()?.string()?),
                Arg::Long("show") => opts.show = true,
                Arg::Long("html") => opts.html = true,
                Arg::Long("editor") => opts.editor = true,
                Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => run(opts),
            Command::Help => {
                println!("Usage: monthgrid [<options>]");
                println!();
                println!("Month-at-a-glance calendar of the events in a TOML file");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>   Read configuration from <FILE>");
                println!("  -e, --events <FILE>   Read events from <FILE>");
                println!("      --month <YYYYMM>  Show the given month (up to 999911; later months may not lay out)");
                println!("      --day <YYYYMMDD>  Show the month of the given day, selecting it");
                println!("      --show            Print the calendar once and exit");
                println!("      --html            Print the calendar as an HTML table and exit");
                println!("      --editor          Print what the editing interface shows and exit");
                println!("      --log-file <FILE> Write log messages to <FILE>");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn run(opts: RunOptions) -> anyhow::Result<()> {
    let interactive = !(opts.show || opts.html || opts.editor);
    let _logger = logging::init(LogTarget::choose(opts.log_file, interactive))
        .context("failed to start logger")?;
    let config = load_config(opts.config.as_deref())?;
    let store = match opts.events.as_ref().or(config.events.as_ref()) {
        Some(path) => EventStore::load(path)?,
        None => EventStore::default(),
    };
    info!("Loaded {} event(s)", store.len());
    let now = local_now()?;
    let surface = if opts.editor {
        Surface::Editor
    } else {
        Surface::Site
    };
    match generate(surface, &config, &store, &config.labels, &opts.params, now)? {
        Rendered::Nothing => info!("No calendars configured; nothing to show"),
        Rendered::Placeholder(text) => println!("{text}"),
        Rendered::Calendar(view) if opts.html => {
            let html = HtmlCalendar::new(&view)
                .render()
                .context("failed to render HTML calendar")?;
            println!("{html}");
        }
        Rendered::Calendar(view) if opts.show => print_view(&view),
        Rendered::Calendar(view) => with_terminal(|mut terminal| {
            terminal.hide_cursor().context("failed to hide cursor")?;
            App::new(&config, &store, now, *view).run(terminal)?;
            Ok(())
        })?,
    }
    Ok(())
}

/// Current local time, truncated to the minute
fn local_now() -> anyhow::Result<PrimitiveDateTime> {
    let now = OffsetDateTime::now_local().context("failed to determine local time")?;
    let time = Time::from_hms(now.hour(), now.minute(), 0)?;
    Ok(PrimitiveDateTime::new(now.date(), time))
}

fn print_view(view: &CalendarView) {
    let cal = Calendar::new(view);
    let area = Rect::new(0, 0, MAIN_WIDTH, cal.height());
    let mut buffer = Buffer::empty(area);
    cal.render(area, &mut buffer);
    for line in buffer_lines(&buffer) {
        println!("{}", line.trim_end());
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
