use serde::Deserialize;
use time::{Month, Weekday};

/// Source of every user-visible string.  Calendar code only ever hands over
/// months, weekdays, and counts.
pub(crate) trait Localizer {
    fn month_name(&self, month: Month) -> &str;
    fn day_name(&self, weekday: Weekday) -> &str;
    fn previous_label(&self) -> &str;
    fn next_label(&self) -> &str;
    fn events_title(&self, count: usize) -> String;
    fn day_short_length(&self) -> usize;
    fn module_name(&self) -> &str;
}

/// Placeholder in [`Labels::events`] that is replaced by the event count
const COUNT_PLACEHOLDER: &str = "{count}";

/// Label table read from the `[labels]` section of the configuration file.
/// Missing entries fall back to English.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Labels {
    pub(crate) months: [String; 12],
    pub(crate) days: [String; 7],
    pub(crate) previous: String,
    pub(crate) next: String,
    pub(crate) events: String,
    pub(crate) day_short_length: usize,
    pub(crate) module: String,
}

impl Default for Labels {
    fn default() -> Labels {
        Labels {
            months: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .map(String::from),
            days: [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]
            .map(String::from),
            previous: String::from("«"),
            next: String::from("»"),
            events: String::from("{count} event(s)"),
            day_short_length: 2,
            module: String::from("Calendar"),
        }
    }
}

impl Localizer for Labels {
    fn month_name(&self, month: Month) -> &str {
        &self.months[usize::from(u8::from(month) - 1)]
    }

    fn day_name(&self, weekday: Weekday) -> &str {
        &self.days[usize::from(weekday.number_days_from_sunday())]
    }

    fn previous_label(&self) -> &str {
        &self.previous
    }

    fn next_label(&self) -> &str {
        &self.next
    }

    fn events_title(&self, count: usize) -> String {
        self.events.replace(COUNT_PLACEHOLDER, &count.to_string())
    }

    fn day_short_length(&self) -> usize {
        self.day_short_length
    }

    fn module_name(&self) -> &str {
        &self.module
    }
}
