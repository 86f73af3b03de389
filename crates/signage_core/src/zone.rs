use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use signage_logging::signage_warn;

use crate::clock::EpochMillis;

/// Time zone used to project epoch instants onto a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The host's local zone.
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// Resolves an IANA zone name. Unknown names degrade to [`Zone::Local`].
    pub fn from_name(name: Option<&str>) -> Zone {
        let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
            return Zone::Local;
        };
        match name.parse::<Tz>() {
            Ok(tz) => Zone::Named(tz),
            Err(err) => {
                signage_warn!("unknown time zone {:?} ({}); using local time", name, err);
                Zone::Local
            }
        }
    }

    /// Wall-clock reading of `epoch_ms` in this zone.
    pub fn project(&self, epoch_ms: EpochMillis) -> NaiveDateTime {
        let utc = DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or_default();
        match self {
            Zone::Local => Local.from_utc_datetime(&utc.naive_utc()).naive_local(),
            Zone::Named(tz) => tz.from_utc_datetime(&utc.naive_utc()).naive_local(),
        }
    }
}
