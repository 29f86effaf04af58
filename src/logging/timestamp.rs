//! Fixed-width time and date tags for log lines

use chrono::{Datelike, Timelike};

/// `[HH:MM:SS.mmm]`
pub fn time_tag<T: Timelike>(t: &T) -> String {
    // A leap second shows up as nanosecond >= 1e9; keep the field 3 digits wide
    let millis = (t.nanosecond() / 1_000_000).min(999);
    format!(
        "[{:02}:{:02}:{:02}.{:03}]",
        t.hour(),
        t.minute(),
        t.second(),
        millis
    )
}

/// `YYYY-MM-DD`
pub fn date_tag<D: Datelike>(d: &D) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
}
