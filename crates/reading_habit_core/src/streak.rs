//! Consecutive-day reading streaks.

use crate::domain::DailyLog;
use chrono::NaiveDate;
use tracing::debug;

/// Date format used by daily logs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Counts consecutive calendar days with a log entry, walking back from the
/// most recent entry.
///
/// The streak is 0 unless the most recent entry is `today` or the day before.
/// Entries whose date can't be parsed are ignored.
pub fn current_streak(logs: &[DailyLog], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = logs
        .iter()
        .filter_map(|log| {
            let parsed = parse_date(&log.date);
            if parsed.is_none() {
                debug!(date = %log.date, "Skipping daily log with unparseable date");
            }
            parsed
        })
        .collect();

    if dates.is_empty() {
        return 0;
    }

    dates.sort_unstable_by(|a, b| b.cmp(a));

    let latest = dates[0];
    let yesterday = today.pred_opt();
    if latest != today && Some(latest) != yesterday {
        return 0;
    }

    let mut streak = 1;
    for pair in dates.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
