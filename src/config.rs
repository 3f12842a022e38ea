use crate::locale::Labels;
use log::{debug, warn};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::Weekday;

const CONFIG_PATH_ENV_VAR: &str = "MONTHGRID_CONFIG_FILE";

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// First day of each displayed week
    pub(crate) week_start_day: WeekStart,
    /// IDs of the calendars whose events are shown
    pub(crate) calendars: Vec<u32>,
    /// Page that navigation links point to
    pub(crate) base_url: String,
    /// Page that links of days with events point to; defaults to `base_url`
    pub(crate) jump_to: Option<String>,
    /// Show unpublished events and events outside their show window
    pub(crate) preview: bool,
    /// Event file to use when none is given on the command line
    pub(crate) events: Option<PathBuf>,
    pub(crate) labels: Labels,
}

impl Config {
    pub(crate) fn from_toml_str(src: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(src)
    }

    pub(crate) fn day_link_base(&self) -> &str {
        self.jump_to.as_deref().unwrap_or(&self.base_url)
    }
}

/// Week start day as configured by its number (0 = Sunday).  Out-of-range
/// numbers fall back to Sunday.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "i64")]
pub(crate) struct WeekStart(pub(crate) Weekday);

impl Default for WeekStart {
    fn default() -> WeekStart {
        WeekStart(Weekday::Sunday)
    }
}

impl From<i64> for WeekStart {
    fn from(n: i64) -> WeekStart {
        match u8::try_from(n) {
            Ok(days @ 0..=6) => WeekStart(Weekday::Sunday.nth_next(days)),
            _ => {
                warn!("week_start_day {n} is out of range; starting weeks on Sunday");
                WeekStart::default()
            }
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub(crate) fn find_config_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(path) = env::var_os(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }
    let home = env::var_os("HOME").map(PathBuf::from);
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
        locations.push(PathBuf::from(dir).join("monthgrid").join("config.toml"));
    } else if let Some(home) = home.as_ref() {
        locations.push(home.join(".config").join("monthgrid").join("config.toml"));
    }
    if let Some(home) = home {
        locations.push(home.join(".monthgrid.toml"));
    }
    locations
}

/// Reads the configuration from `explicit` if given, otherwise from the
/// first existing standard location.  Without any file the defaults are used.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_owned(),
        None => match find_config_locations().into_iter().find(|p| p.is_file()) {
            Some(path) => path,
            None => {
                debug!("No config file found; using defaults");
                return Ok(Config::default());
            }
        },
    };
    debug!("Reading config from {}", path.display());
    let src = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    Config::from_toml_str(&src).map_err(|source| ConfigError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Localizer;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.week_start_day, WeekStart(Weekday::Sunday));
        assert!(config.calendars.is_empty());
        assert!(!config.preview);
        assert_eq!(config.labels.day_short_length(), 2);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml_str(
            r#"
            week_start_day = 1
            calendars = [1, 2]
            base_url = "/calendar"
            jump_to = "/events"
            preview = true
            events = "events.toml"

            [labels]
            day_short_length = 3
            "#,
        )
        .expect("config should parse");
        assert_eq!(config.week_start_day, WeekStart(Weekday::Monday));
        assert_eq!(config.calendars, [1, 2]);
        assert_eq!(config.base_url, "/calendar");
        assert_eq!(config.day_link_base(), "/events");
        assert!(config.preview);
        assert_eq!(config.events, Some(PathBuf::from("events.toml")));
        assert_eq!(config.labels.day_short_length(), 3);
    }

    #[test]
    fn test_day_link_base_defaults_to_base_url() {
        let config = Config::from_toml_str("base_url = \"/cal\"").expect("config should parse");
        assert_eq!(config.day_link_base(), "/cal");
    }

    #[test]
    fn test_week_start_normalized() {
        for (raw, expected) in [
            (0, Weekday::Sunday),
            (3, Weekday::Wednesday),
            (6, Weekday::Saturday),
            (7, Weekday::Sunday),
            (-1, Weekday::Sunday),
            (300, Weekday::Sunday),
        ] {
            let config = Config::from_toml_str(&format!("week_start_day = {raw}"))
                .expect("config should parse");
            assert_eq!(config.week_start_day, WeekStart(expected));
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_toml_str("cal_startDay = 1").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let r = load_config(Some(Path::new("/nonexistent/monthgrid.toml")));
        assert!(matches!(r, Err(ConfigError::Read { .. })));
    }
}
