//! Digest period and time-zone calculations.
//!
//! All storage is absolute UTC; users carry an IANA zone name. The daily
//! digest is anchored at a fixed local hour, so the engine has to convert
//! "now" into the user's wall clock, snap to the anchor, and come back to
//! UTC using the zone's offset rules rather than string round-trips.

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Local hour the daily digest fires at (minute 0).
pub const DIGEST_HOUR: u32 = 10;

/// Length of one digest period.
pub const PERIOD_LENGTH_HOURS: i64 = 24;

/// Resolve a stored zone name to a [`Tz`], falling back to UTC.
///
/// Unresolvable values never raise: a bad row must not block delivery
/// for that user, it just degrades them to UTC.
pub fn resolve_timezone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            tracing::warn!(timezone = name, "Unresolvable IANA zone, falling back to UTC");
            Tz::UTC
        }
    }
}

/// True iff the wall clock in `tz` reads exactly `DIGEST_HOUR`:00.
///
/// The dispatcher ticks every 60 seconds, so this is the discretization
/// boundary: if the process is down during the whole trigger minute the
/// digest for that local day is skipped, not retried.
pub fn is_digest_trigger_minute(now_utc: DateTime<Utc>, tz: Tz) -> bool {
    let local = now_utc.with_timezone(&tz);
    local.hour() == DIGEST_HOUR && local.minute() == 0
}

/// The most recent local `DIGEST_HOUR`:00 at or before `now_utc`, in UTC.
pub fn period_start(now_utc: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local = now_utc.with_timezone(&tz);
    let anchor = NaiveTime::from_hms_opt(DIGEST_HOUR, 0, 0).expect("valid anchor time");

    let mut day = local.date_naive();
    if local.time() < anchor {
        day = day.pred_opt().unwrap_or(day);
    }

    let naive = day.and_time(anchor);
    let start_local = match naive.and_local_timezone(tz) {
        LocalResult::Single(dt) => dt,
        // Fall-back transition: two readings of 10:00, take the first.
        LocalResult::Ambiguous(first, _) => first,
        // Spring-forward gap at the anchor hour: take the earliest valid
        // instant after the nominal anchor.
        LocalResult::None => match (naive + Duration::hours(1)).and_local_timezone(tz) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
            LocalResult::None => tz.from_utc_datetime(&naive),
        },
    };

    start_local.with_timezone(&Utc)
}

/// End of the digest period starting at `start`: exactly 24 hours later.
pub fn period_end(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::hours(PERIOD_LENGTH_HOURS)
}
