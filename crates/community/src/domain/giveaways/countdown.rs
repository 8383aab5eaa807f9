use std::fmt;

use time::OffsetDateTime;

pub const ENDED: &str = "ENDED";

const MINUTE_MS: i128 = 60 * 1000;
const HOUR_MS: i128 = 60 * MINUTE_MS;
const DAY_MS: i128 = 24 * HOUR_MS;

/// Time left on a giveaway, truncated to whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Ended,
    Remaining { days: i128, hours: i128, minutes: i128 },
}

impl Countdown {
    pub fn between(end: OffsetDateTime, now: OffsetDateTime) -> Self {
        let diff = (end - now).whole_milliseconds();
        if diff <= 0 {
            return Countdown::Ended;
        }

        Countdown::Remaining {
            days: diff / DAY_MS,
            hours: (diff % DAY_MS) / HOUR_MS,
            minutes: (diff % HOUR_MS) / MINUTE_MS,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Ended => write!(f, "{}", ENDED),
            Countdown::Remaining {
                days,
                hours,
                minutes,
            } => write!(f, "{}d {}h {}m", days, hours, minutes),
        }
    }
}

pub fn format_time_remaining(end: OffsetDateTime, now: OffsetDateTime) -> String {
    Countdown::between(end, now).to_string()
}
