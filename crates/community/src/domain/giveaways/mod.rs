mod countdown;
mod store;
mod watcher;

pub use countdown::{format_time_remaining, Countdown, ENDED};
pub use store::{active_giveaways, GiveawayStore};
pub use watcher::{refresh_giveaways, GiveawayWatcher};

use serde::{Deserialize, Serialize};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime,
};

/// Naive layouts a `datetime-local` input or a python `isoformat()` produce
const NAIVE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
];

const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year] [hour]:[minute] UTC");

/// A giveaway as returned by the backend, the id is assigned there and treated as opaque
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Giveaway {
    pub id: String,
    pub title: String,
    pub description: String,
    pub prize: String,
    pub end_date: String,
    pub entry_requirement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Giveaway {
    /// `None` when the backend handed us an end date we can't read
    pub fn ends_at(&self) -> Option<OffsetDateTime> {
        parse_end_date(&self.end_date)
    }

    /// Active iff the end date is strictly after `now`, unreadable end dates never are
    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        self.ends_at().is_some_and(|end| end > now)
    }

    pub fn display_end_date(&self) -> String {
        self.ends_at()
            .and_then(|end| end.format(DISPLAY_FORMAT).ok())
            .unwrap_or_else(|| self.end_date.clone())
    }
}

/// Field set the admin form submits, ids are never sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewGiveaway {
    pub title: String,
    pub description: String,
    pub prize: String,
    pub end_date: String,
    pub entry_requirement: String,
}

impl NewGiveaway {
    /// Names of the fields that are still blank, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("prize", &self.prize),
            ("description", &self.description),
            ("end date", &self.end_date),
            ("entry requirement", &self.entry_requirement),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Backend community figures, shown in the stats section when available
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    pub total_giveaways: u64,
    pub active_giveaways: u64,
    pub member_count: u64,
}

pub fn parse_end_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(end) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(end);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
pub(crate) fn test_giveaway(id: &str, end: OffsetDateTime) -> Giveaway {
    Giveaway {
        id: id.to_string(),
        title: format!("Giveaway {}", id),
        description: String::from("Nitro for a lucky tiger"),
        prize: String::from("Discord Nitro"),
        end_date: end.format(&Rfc3339).unwrap(),
        entry_requirement: String::from("Join the server"),
        created_at: None,
    }
}
