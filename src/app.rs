use crate::calendar::{
    compile, resolve_target_date, Calendar, CalendarView, Direction, RequestParams, TargetDate,
    YearMonth,
};
use crate::config::Config;
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::store::EventLookup;
use crate::theme::BASE_STYLE;
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::PrimitiveDateTime;

/// Interactive pager over the months of a calendar
#[derive(Clone, Debug)]
pub(crate) struct App<'a, S: ?Sized> {
    config: &'a Config,
    store: &'a S,
    now: PrimitiveDateTime,
    view: CalendarView,
    state: AppState,
}

impl<'a, S: EventLookup + ?Sized> App<'a, S> {
    pub(crate) fn new(
        config: &'a Config,
        store: &'a S,
        now: PrimitiveDateTime,
        view: CalendarView,
    ) -> App<'a, S> {
        App {
            config,
            store,
            now,
            view,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = read()?
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // Anything else (resizes included) just redraws
        Ok(())
    }

    // Returns `false` if the key did nothing
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.follow(Direction::Previous),
                KeyCode::Char('l') | KeyCode::Right => self.follow(Direction::Next),
                KeyCode::Char('0') | KeyCode::Home => self.reset(),
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let output = match key {
                    KeyCode::Char(c) => match digit(c) {
                        Some(d) => state.handle_input(JumpToInput::Digit(d)),
                        None => JumpToOutput::Invalid,
                    },
                    KeyCode::Backspace | KeyCode::Delete => {
                        state.handle_input(JumpToInput::Backspace)
                    }
                    KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                    _ => JumpToOutput::Invalid,
                };
                match output {
                    JumpToOutput::Ok => true,
                    JumpToOutput::Invalid => false,
                    JumpToOutput::Jump(month) => {
                        let jumped = self.jump_to(&month);
                        if jumped {
                            self.state = AppState::Calendar;
                        }
                        jumped
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn follow(&mut self, direction: Direction) -> bool {
        match self.view.link(direction) {
            Some(link) => {
                let target = TargetDate::for_month(link.target);
                self.show(&target)
            }
            None => false,
        }
    }

    fn reset(&mut self) -> bool {
        self.show(&TargetDate::for_month(YearMonth::of(self.now.date())))
    }

    fn jump_to(&mut self, month: &str) -> bool {
        match resolve_target_date(&RequestParams::month(month), self.now.date()) {
            Ok(target) => self.show(&target),
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    fn show(&mut self, target: &TargetDate) -> bool {
        debug!("Showing {}", target.month);
        match compile(
            self.config,
            self.store,
            &self.config.labels,
            target,
            self.now,
        ) {
            Ok(view) => {
                self.view = view;
                true
            }
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }
}

impl<S: EventLookup + ?Sized> Widget for &mut App<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        Calendar::new(&self.view).render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

fn digit(c: char) -> Option<u8> {
    c.to_digit(10).and_then(|d| u8::try_from(d).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::buffer_lines;
    use crate::config::WeekStart;
    use crate::store::EventStore;
    use ratatui::style::Color;
    use time::macros::datetime;
    use time::{Month, Weekday};

    const NOW: PrimitiveDateTime = datetime!(2024-06-15 12:00);

    fn config() -> Config {
        Config {
            week_start_day: WeekStart(Weekday::Monday),
            calendars: vec![1],
            ..Config::default()
        }
    }

    fn store() -> EventStore {
        EventStore::from_toml_str(
            r#"
            [[event]]
            id = 1
            calendar = 1
            title = "Standup"
            start = "2024-06-15T09:00"

            [[event]]
            id = 2
            calendar = 1
            title = "Kickoff"
            start = "2024-04-02"
            "#,
        )
        .expect("events should parse")
    }

    fn app<'a>(config: &'a Config, store: &'a EventStore) -> App<'a, EventStore> {
        let target = TargetDate::for_month(YearMonth::of(NOW.date()));
        let view = compile(config, store, &config.labels, &target, NOW)
            .expect("June 2024 should lay out");
        App::new(config, store, NOW, view)
    }

    #[test]
    fn test_follow_links() {
        let config = config();
        let store = store();
        let mut app = app(&config, &store);
        assert_eq!(app.view.month, YearMonth::new(2024, Month::June));
        // Nothing after today, so no next link
        assert!(!app.handle_key(KeyCode::Char('l')));
        assert!(app.handle_key(KeyCode::Left));
        assert_eq!(app.view.month, YearMonth::new(2024, Month::May));
        assert!(app.handle_key(KeyCode::Char('h')));
        assert_eq!(app.view.month, YearMonth::new(2024, Month::April));
        assert!(!app.handle_key(KeyCode::Char('h')));
        assert_eq!(app.view.month, YearMonth::new(2024, Month::April));
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.view.month, YearMonth::new(2024, Month::May));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.view.month, YearMonth::new(2024, Month::June));
    }

    #[test]
    fn test_jump() {
        let config = config();
        let store = store();
        let mut app = app(&config, &store);
        assert!(app.handle_key(KeyCode::Char('g')));
        for c in "202312".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(!app.handle_key(KeyCode::Char('7')));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.view.month, YearMonth::new(2023, Month::December));
        assert_eq!(app.view.current, "December 2023");
    }

    #[test]
    fn test_jump_invalid_month() {
        let config = config();
        let store = store();
        let mut app = app(&config, &store);
        app.handle_key(KeyCode::Char('g'));
        for c in "202413".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Jumping(_)));
        assert_eq!(app.view.month, YearMonth::new(2024, Month::June));
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn test_help_and_quit() {
        let config = config();
        let store = store();
        let mut app = app(&config, &store);
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }

    #[test]
    fn test_render() {
        let config = config();
        let store = store();
        let mut app = app(&config, &store);
        let area = Rect::new(0, 0, 50, 12);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "    « May 2024      June 2024                     ");
        assert_eq!(lines[9], "    09:00  Standup                                ");
        let corner = buffer.cell((0, 0)).expect("cell should be in buffer");
        assert_eq!(corner.style().bg, Some(Color::Black));

        app.handle_key(KeyCode::Char('?'));
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert_eq!(lines.len(), 12);
        assert!(lines[1].contains(" Commands "));
        assert!(lines[9].contains("Press the Any Key to dismiss."));
    }
}
