use crate::calendar::{Boundaries, EventsIndex};
use log::{debug, trace};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::iter::successors;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, PrimitiveDateTime,
    Time,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

static YMD_HM_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

/// A single stored event.  Recurrences are not expanded; `repeat_end` only
/// widens the navigable range.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawEvent")]
pub(crate) struct Event {
    pub(crate) id: u32,
    pub(crate) calendar: u32,
    pub(crate) title: String,
    pub(crate) start: PrimitiveDateTime,
    pub(crate) end: PrimitiveDateTime,
    pub(crate) repeat_end: Option<Date>,
    pub(crate) published: bool,
    pub(crate) show_from: Option<PrimitiveDateTime>,
    pub(crate) show_until: Option<PrimitiveDateTime>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawEvent {
    id: u32,
    calendar: u32,
    title: String,
    start: String,
    end: Option<String>,
    repeat_end: Option<String>,
    #[serde(default = "default_true")]
    published: bool,
    show_from: Option<String>,
    show_until: Option<String>,
}

fn default_true() -> bool {
    true
}

impl TryFrom<RawEvent> for Event {
    type Error = InvalidEventError;

    fn try_from(raw: RawEvent) -> Result<Event, InvalidEventError> {
        let id = raw.id;
        let timestamp = |field: &'static str, value: String| {
            parse_timestamp(&value).ok_or(InvalidEventError {
                id,
                field,
                value,
            })
        };
        let start = timestamp("start", raw.start)?;
        let end = match raw.end {
            Some(value) => timestamp("end", value)?,
            None => start,
        };
        if end < start {
            return Err(InvalidEventError {
                id,
                field: "end",
                value: String::from("before start"),
            });
        }
        let repeat_end = raw
            .repeat_end
            .map(|value| timestamp("repeat_end", value))
            .transpose()?
            .map(PrimitiveDateTime::date);
        let show_from = raw
            .show_from
            .map(|value| timestamp("show_from", value))
            .transpose()?;
        let show_until = raw
            .show_until
            .map(|value| timestamp("show_until", value))
            .transpose()?;
        Ok(Event {
            id,
            calendar: raw.calendar,
            title: raw.title,
            start,
            end,
            repeat_end,
            published: raw.published,
            show_from,
            show_until,
        })
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("event {id}: invalid {field}: {value:?}")]
pub(crate) struct InvalidEventError {
    id: u32,
    field: &'static str,
    value: String,
}

/// Parses `YYYY-MM-DDTHH:MM` or a plain `YYYY-MM-DD` (taken as midnight)
fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(s, &YMD_HM_FMT)
        .or_else(|_| Date::parse(s, &YMD_FMT).map(|d| d.with_time(Time::MIDNIGHT)))
        .ok()
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to read event file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse event file")]
    Parse(#[from] toml::de::Error),
}

/// Which events a query may see
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Selection<'a> {
    pub(crate) calendars: &'a [u32],
    pub(crate) now: PrimitiveDateTime,
    /// Also show unpublished events and events outside their show window
    pub(crate) preview: bool,
}

impl Selection<'_> {
    fn includes(&self, event: &Event) -> bool {
        if !self.calendars.contains(&event.calendar) {
            return false;
        }
        if self.preview {
            return true;
        }
        let started = match event.show_from {
            Some(from) => from <= self.now,
            None => true,
        };
        let not_stopped = match event.show_until {
            Some(until) => until > self.now,
            None => true,
        };
        event.published && started && not_stopped
    }
}

pub(crate) trait EventLookup {
    /// Earliest start and latest end of the visible events
    fn boundaries(&self, selection: &Selection<'_>) -> Boundaries;

    /// Visible events on each day from `begin` through `end`, grouped by
    /// start time
    fn events_index(
        &self,
        selection: &Selection<'_>,
        begin: Date,
        end: Date,
    ) -> EventsIndex<Event>;
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventStore {
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventFile {
    #[serde(default, rename = "event")]
    events: Vec<Event>,
}

impl EventStore {
    pub(crate) fn load(path: &Path) -> Result<EventStore, StoreError> {
        let src = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_owned(),
            source,
        })?;
        let store = EventStore::from_toml_str(&src)?;
        debug!("Loaded {} events from {}", store.len(), path.display());
        Ok(store)
    }

    pub(crate) fn from_toml_str(src: &str) -> Result<EventStore, StoreError> {
        let file = toml::from_str::<EventFile>(src)?;
        Ok(EventStore {
            events: file.events,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn visible<'a>(&'a self, selection: &'a Selection<'a>) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(|e| selection.includes(e))
    }
}

impl EventLookup for EventStore {
    fn boundaries(&self, selection: &Selection<'_>) -> Boundaries {
        let mut bounds = Boundaries::default();
        for event in self.visible(selection) {
            let start = event.start.date();
            let end = event.end.date();
            bounds.earliest_start = Some(bounds.earliest_start.map_or(start, |d| d.min(start)));
            bounds.latest_end = Some(bounds.latest_end.map_or(end, |d| d.max(end)));
            if let Some(repeat_end) = event.repeat_end {
                bounds.latest_repeat_end = Some(
                    bounds
                        .latest_repeat_end
                        .map_or(repeat_end, |d| d.max(repeat_end)),
                );
            }
        }
        bounds
    }

    fn events_index(
        &self,
        selection: &Selection<'_>,
        begin: Date,
        end: Date,
    ) -> EventsIndex<Event> {
        let mut days = BTreeMap::<Date, BTreeMap<PrimitiveDateTime, Vec<Event>>>::new();
        for event in self.visible(selection) {
            let first = event.start.date().max(begin);
            let last = event.end.date().min(end);
            trace!("Event {} covers {first} through {last}", event.id);
            for date in successors(Some(first), |d| d.next_day()).take_while(|&d| d <= last) {
                days.entry(date)
                    .or_default()
                    .entry(event.start)
                    .or_default()
                    .push(event.clone());
            }
        }
        let mut index = EventsIndex::new();
        for (date, groups) in days {
            for group in groups.into_values() {
                index.push_group(date, group);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    const NOW: PrimitiveDateTime = datetime!(2024-06-15 12:00);

    static SAMPLE: &str = r#"
        [[event]]
        id = 1
        calendar = 1
        title = "Board meeting"
        start = "2024-06-15T09:00"
        end = "2024-06-15T10:00"

        [[event]]
        id = 2
        calendar = 1
        title = "Breakfast"
        start = "2024-06-15T09:00"

        [[event]]
        id = 3
        calendar = 2
        title = "Early call"
        start = "2024-06-15T07:30"

        [[event]]
        id = 4
        calendar = 1
        title = "Conference"
        start = "2024-05-30"
        end = "2024-06-02T18:00"

        [[event]]
        id = 5
        calendar = 1
        title = "Draft"
        start = "2023-01-10"
        published = false

        [[event]]
        id = 6
        calendar = 1
        title = "Series"
        start = "2024-03-01"
        repeat_end = "2024-12-31"

        [[event]]
        id = 7
        calendar = 3
        title = "Other calendar"
        start = "2020-01-01"
    "#;

    fn sample() -> EventStore {
        EventStore::from_toml_str(SAMPLE).expect("sample should parse")
    }

    fn ids(events: &[Event]) -> Vec<u32> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_parse() {
        let store = sample();
        assert_eq!(store.len(), 7);
        let ev = &store.events[3];
        assert_eq!(ev.start, datetime!(2024-05-30 0:00));
        assert_eq!(ev.end, datetime!(2024-06-02 18:00));
        assert!(ev.published);
        assert_eq!(store.events[1].end, store.events[1].start);
        assert_eq!(store.events[5].repeat_end, Some(date!(2024 - 12 - 31)));
        assert!(!store.events[4].published);
    }

    #[test]
    fn test_parse_empty() {
        let store = EventStore::from_toml_str("").expect("empty file should parse");
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_timestamp() {
        let r = EventStore::from_toml_str(
            "[[event]]\nid = 9\ncalendar = 1\ntitle = \"x\"\nstart = \"15.06.2024\"\n",
        );
        let err = r.expect_err("bad timestamp should be rejected");
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_end_before_start() {
        let r = EventStore::from_toml_str(
            "[[event]]\nid = 9\ncalendar = 1\ntitle = \"x\"\nstart = \"2024-06-02\"\nend = \"2024-06-01\"\n",
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_grouped_by_start_time() {
        let store = sample();
        let selection = Selection {
            calendars: &[1, 2],
            now: NOW,
            preview: false,
        };
        let index = store.events_index(&selection, date!(2024 - 06 - 01), date!(2024 - 06 - 30));
        let groups = index
            .get(date!(2024 - 06 - 15))
            .expect("June 15 should have events")
            .iter()
            .map(|g| ids(g))
            .collect::<Vec<_>>();
        assert_eq!(groups, [vec![3], vec![1, 2]]);
    }

    #[test]
    fn test_multi_day_clipped_to_range() {
        let store = sample();
        let selection = Selection {
            calendars: &[1],
            now: NOW,
            preview: false,
        };
        let index = store.events_index(&selection, date!(2024 - 06 - 01), date!(2024 - 06 - 30));
        assert!(index.get(date!(2024 - 05 - 31)).is_none());
        for date in [date!(2024 - 06 - 01), date!(2024 - 06 - 02)] {
            let groups = index.get(date).expect("conference should span into June");
            assert_eq!(groups.len(), 1);
            assert_eq!(ids(&groups[0]), [4]);
        }
        assert!(index.get(date!(2024 - 06 - 03)).is_none());
        // June 1, June 2 and June 15
        assert_eq!(index.days(), 3);
    }

    #[test]
    fn test_boundaries() {
        let store = sample();
        let selection = Selection {
            calendars: &[1, 2],
            now: NOW,
            preview: false,
        };
        assert_eq!(
            store.boundaries(&selection),
            Boundaries {
                earliest_start: Some(date!(2024 - 03 - 01)),
                latest_end: Some(date!(2024 - 06 - 15)),
                latest_repeat_end: Some(date!(2024 - 12 - 31)),
            }
        );
    }

    #[test]
    fn test_preview_includes_unpublished() {
        let store = sample();
        let selection = Selection {
            calendars: &[1],
            now: NOW,
            preview: true,
        };
        assert_eq!(
            store.boundaries(&selection).earliest_start,
            Some(date!(2023 - 01 - 10))
        );
    }

    #[test]
    fn test_no_selected_events() {
        let store = sample();
        let selection = Selection {
            calendars: &[42],
            now: NOW,
            preview: false,
        };
        assert_eq!(store.boundaries(&selection), Boundaries::default());
        let index = store.events_index(&selection, date!(2024 - 06 - 01), date!(2024 - 06 - 30));
        assert_eq!(index.days(), 0);
    }

    #[test]
    fn test_show_window() {
        let store = EventStore::from_toml_str(
            r#"
            [[event]]
            id = 1
            calendar = 1
            title = "Not yet"
            start = "2024-06-20"
            show_from = "2024-06-16T00:00"

            [[event]]
            id = 2
            calendar = 1
            title = "Expired"
            start = "2024-06-10"
            show_until = "2024-06-15T12:00"

            [[event]]
            id = 3
            calendar = 1
            title = "Visible"
            start = "2024-06-12"
            show_from = "2024-06-01"
            show_until = "2024-07-01"
            "#,
        )
        .expect("events should parse");
        let selection = Selection {
            calendars: &[1],
            now: NOW,
            preview: false,
        };
        let index = store.events_index(&selection, date!(2024 - 06 - 01), date!(2024 - 06 - 30));
        assert_eq!(index.days(), 1);
        assert!(index.get(date!(2024 - 06 - 12)).is_some());
    }
}
