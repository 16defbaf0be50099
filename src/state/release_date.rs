//! Release-date parsing, countdown classification and the waiting-list ordering.

use std::cmp::Ordering;

use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::BorrowedFormatItem,
    macros::format_description,
};
use validator::ValidationError;

use crate::state::game::GameRecord;

/// Canonical token stored for games without a known release window.
pub const UNKNOWN_TOKEN: &str = "Unknown";
/// Earliest accepted year-only input.
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted year-only input.
pub const MAX_YEAR: i32 = 2100;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Comparison-ready form of a raw release date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No date entered (or one that cannot be decoded).
    Unset,
    /// Explicitly marked as unknown.
    Unknown,
    /// Only the release year is known; signed distance in years from the current year.
    YearOnly(i32),
    /// Exact calendar date; signed distance in days from today.
    ExactDate(i64),
}

/// Styling category of a countdown label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Release date lies in the past.
    Overdue,
    /// Release is imminent (this year, today, or within a week).
    Soon,
    /// Release is at least a year away.
    FutureYear,
    /// Release window is unknown.
    Unknown,
    /// Plain countdown.
    Normal,
}

impl Classification {
    fn rank(self) -> u8 {
        match self {
            Classification::ExactDate(_) => 0,
            Classification::YearOnly(_) => 1,
            Classification::Unknown => 2,
            Classification::Unset => 3,
        }
    }

    /// Human readable countdown. `None` when no date is set.
    pub fn label(self) -> Option<String> {
        let label = match self {
            Classification::Unset => return None,
            Classification::Unknown => UNKNOWN_TOKEN.to_owned(),
            Classification::YearOnly(0) => "Soon™".to_owned(),
            Classification::YearOnly(-1) => "Released last year".to_owned(),
            Classification::YearOnly(years) if years < 0 => {
                format!("Released {} years ago", years.unsigned_abs())
            }
            Classification::YearOnly(1) => "a year, or less?".to_owned(),
            Classification::YearOnly(years) => format!("in {years} years"),
            Classification::ExactDate(days) if days < 0 => {
                format!("Released {} days ago", days.unsigned_abs())
            }
            Classification::ExactDate(0) => "Releases today!".to_owned(),
            Classification::ExactDate(days) => format!("{days} days left"),
        };
        Some(label)
    }

    /// Styling category for the label. `None` when no date is set.
    pub fn tone(self) -> Option<Tone> {
        let tone = match self {
            Classification::Unset => return None,
            Classification::Unknown => Tone::Unknown,
            Classification::YearOnly(0) => Tone::Soon,
            Classification::YearOnly(years) if years < 0 => Tone::Overdue,
            Classification::YearOnly(_) => Tone::FutureYear,
            Classification::ExactDate(days) if days < 0 => Tone::Overdue,
            Classification::ExactDate(days) if days <= 7 => Tone::Soon,
            Classification::ExactDate(_) => Tone::Normal,
        };
        Some(tone)
    }
}

/// Today's calendar date at `offset`.
///
/// The local offset can only be read reliably before any thread is spawned, so callers
/// resolve it once at startup and pass it down.
pub fn today_in(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Classify a raw release date relative to `today`.
pub fn classify(release_date: &str, today: Date) -> Classification {
    if release_date.is_empty() {
        return Classification::Unset;
    }

    if release_date.eq_ignore_ascii_case(UNKNOWN_TOKEN) {
        return Classification::Unknown;
    }

    if is_year_shape(release_date) {
        return match release_date.parse::<i32>() {
            Ok(year) => Classification::YearOnly(year - today.year()),
            Err(_) => Classification::Unset,
        };
    }

    if is_iso_shape(release_date) {
        if let Ok(date) = Date::parse(release_date, ISO_DATE) {
            return Classification::ExactDate((date - today).whole_days());
        }
    }

    Classification::Unset
}

/// Waiting-list display order: exact dates (soonest first), then year-only dates
/// (soonest first), then `Unknown`, then unset dates.
pub fn compare(a: Classification, b: Classification) -> Ordering {
    match (a, b) {
        (Classification::ExactDate(a), Classification::ExactDate(b)) => a.cmp(&b),
        (Classification::YearOnly(a), Classification::YearOnly(b)) => a.cmp(&b),
        (a, b) => a.rank().cmp(&b.rank()),
    }
}

/// Return the waiting list in display order without touching the stored order.
///
/// The sort is stable, so records that compare equal keep their manual order.
pub fn sorted_view(games: &[GameRecord], today: Date) -> Vec<(Classification, &GameRecord)> {
    let mut ranked: Vec<_> = games
        .iter()
        .map(|game| (classify(game.release_date.as_deref().unwrap_or(""), today), game))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| compare(*a, *b));
    ranked
}

/// Validates a user-entered release date.
///
/// Accepted forms are `unknown` (any case), a year within [`MIN_YEAR`]..=[`MAX_YEAR`], and a
/// real calendar date written as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```ignore
/// validate_release_date("2025-06-15") // Ok
/// validate_release_date("2024-02-30") // Err - not a calendar date
/// validate_release_date("1850")       // Err - out of range
/// ```
pub fn validate_release_date(value: &str) -> Result<(), ValidationError> {
    if value.eq_ignore_ascii_case(UNKNOWN_TOKEN) {
        return Ok(());
    }

    if is_year_shape(value) {
        let year = value.parse::<i32>().unwrap_or_default();
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Ok(());
        }
        let mut err = ValidationError::new("release_year_range");
        err.message =
            Some(format!("Release year must be between {MIN_YEAR} and {MAX_YEAR}").into());
        return Err(err);
    }

    if is_iso_shape(value) {
        let round_trips = Date::parse(value, ISO_DATE)
            .ok()
            .and_then(|date| date.format(ISO_DATE).ok())
            .is_some_and(|canonical| canonical == value);
        if round_trips {
            return Ok(());
        }
        let mut err = ValidationError::new("release_date_calendar");
        err.message = Some(format!("`{value}` is not a valid calendar date").into());
        return Err(err);
    }

    let mut err = ValidationError::new("release_date_format");
    err.message = Some("Expected YYYY-MM-DD, YYYY, or \"Unknown\"".into());
    Err(err)
}

/// Boolean form of [`validate_release_date`].
pub fn is_valid_date_input(value: &str) -> bool {
    validate_release_date(value).is_ok()
}

/// Canonical stored form of an accepted input (`unknown` in any case becomes `Unknown`).
pub fn normalize_release_date(value: &str) -> String {
    if value.eq_ignore_ascii_case(UNKNOWN_TOKEN) {
        UNKNOWN_TOKEN.to_owned()
    } else {
        value.to_owned()
    }
}

fn is_year_shape(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_iso_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::state::game::ListKey;

    #[test]
    fn classifies_each_input_form() {
        let today = date!(2024 - 06 - 15);
        assert_eq!(classify("", today), Classification::Unset);
        assert_eq!(classify("Unknown", today), Classification::Unknown);
        assert_eq!(classify("UNKNOWN", today), Classification::Unknown);
        assert_eq!(classify("2024", today), Classification::YearOnly(0));
        assert_eq!(classify("2021", today), Classification::YearOnly(-3));
        assert_eq!(classify("2024-06-20", today), Classification::ExactDate(5));
        assert_eq!(classify("2024-06-15", today), Classification::ExactDate(0));
        assert_eq!(classify("garbage", today), Classification::Unset);
        assert_eq!(classify("2024-02-30", today), Classification::Unset);
    }

    #[test]
    fn old_exact_date_is_released_days_ago() {
        let today = date!(2024 - 06 - 15);
        let classification = classify("2000-01-01", today);
        let Classification::ExactDate(days) = classification else {
            panic!("expected exact date, got {classification:?}");
        };
        assert!(days < -8000);
        assert_eq!(
            classification.label().unwrap(),
            format!("Released {} days ago", days.abs())
        );
    }

    #[test]
    fn labels_follow_countdown_table() {
        let cases = [
            (Classification::Unknown, "Unknown"),
            (Classification::YearOnly(0), "Soon™"),
            (Classification::YearOnly(-1), "Released last year"),
            (Classification::YearOnly(-4), "Released 4 years ago"),
            (Classification::YearOnly(1), "a year, or less?"),
            (Classification::YearOnly(3), "in 3 years"),
            (Classification::ExactDate(-12), "Released 12 days ago"),
            (Classification::ExactDate(0), "Releases today!"),
            (Classification::ExactDate(3), "3 days left"),
            (Classification::ExactDate(40), "40 days left"),
        ];
        for (classification, expected) in cases {
            assert_eq!(classification.label().as_deref(), Some(expected));
        }
        assert_eq!(Classification::Unset.label(), None);
    }

    #[test]
    fn tones_mark_imminent_releases() {
        assert_eq!(Classification::ExactDate(7).tone(), Some(Tone::Soon));
        assert_eq!(Classification::ExactDate(8).tone(), Some(Tone::Normal));
        assert_eq!(Classification::ExactDate(-1).tone(), Some(Tone::Overdue));
        assert_eq!(Classification::YearOnly(0).tone(), Some(Tone::Soon));
        assert_eq!(Classification::YearOnly(2).tone(), Some(Tone::FutureYear));
        assert_eq!(Classification::Unset.tone(), None);
    }

    #[test]
    fn validates_date_inputs() {
        for valid in ["2025", "2025-06-15", "unknown", "Unknown", "1900", "2100", "2024-02-29"] {
            assert!(is_valid_date_input(valid), "{valid} should be accepted");
        }
        for invalid in [
            "15-06-2025",
            "1850",
            "2101",
            "2025-13-01",
            "2024-02-30",
            "2023-02-29",
            "",
            " 2025",
            "2025-6-15",
            "soon",
        ] {
            assert!(!is_valid_date_input(invalid), "{invalid} should be rejected");
        }
    }

    #[test]
    fn validation_errors_carry_codes() {
        assert_eq!(validate_release_date("1850").unwrap_err().code, "release_year_range");
        assert_eq!(
            validate_release_date("2025-13-01").unwrap_err().code,
            "release_date_calendar"
        );
        assert_eq!(validate_release_date("next week").unwrap_err().code, "release_date_format");
    }

    #[test]
    fn normalizes_unknown_token() {
        assert_eq!(normalize_release_date("unKnown"), "Unknown");
        assert_eq!(normalize_release_date("2025"), "2025");
    }

    #[test]
    fn waiting_view_orders_exact_year_unknown_then_unset() {
        let today = date!(2024 - 06 - 15);
        let dates = ["Unknown", "", "2025-01-01", "2030", "2024-01-01"];
        let games: Vec<GameRecord> = dates
            .iter()
            .enumerate()
            .map(|(idx, date)| {
                let mut game = GameRecord::new(format!("Game {idx}"), ListKey::Waiting, None);
                game.release_date = Some((*date).to_owned());
                game
            })
            .collect();

        let order: Vec<&str> = sorted_view(&games, today)
            .into_iter()
            .map(|(_, game)| game.release_date.as_deref().unwrap())
            .collect();

        assert_eq!(order, ["2024-01-01", "2025-01-01", "2030", "Unknown", ""]);
        assert_eq!(games[0].release_date.as_deref(), Some("Unknown"));
    }

    #[test]
    fn equal_dates_keep_manual_order() {
        let today = date!(2024 - 06 - 15);
        let games: Vec<GameRecord> = ["First", "Second", "Third"]
            .into_iter()
            .map(|name| GameRecord::new(name.into(), ListKey::Waiting, None))
            .collect();

        let names: Vec<&str> = sorted_view(&games, today)
            .into_iter()
            .map(|(_, game)| game.name.as_str())
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn today_follows_the_given_offset() {
        let east = UtcOffset::from_hms(14, 0, 0).unwrap();
        let west = UtcOffset::from_hms(-12, 0, 0).unwrap();

        let ahead = (today_in(east) - today_in(west)).whole_days();
        assert!((1..=2).contains(&ahead), "offsets 26h apart gave {ahead} days");
    }
}
