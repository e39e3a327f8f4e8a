//! Notification text composition.
//!
//! Telegram messages use Markdown (the transport falls back to plain text
//! if Telegram rejects the formatting). Localization is deliberately a
//! static string table with placeholder substitution, nothing more.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::types::Timestamp;

/// Image URLs embedded in event notes, sent via `sendPhoto` ahead of the
/// reminder text.
static IMAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"')]+\.(?:png|jpe?g|gif|webp)"#).expect("valid regex")
});

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Supported notification languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    Lv,
    Ru,
}

impl Locale {
    /// Map a stored language code to a locale; unknown codes fall back to
    /// English rather than failing.
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "lv" => Locale::Lv,
            "ru" => Locale::Ru,
            _ => Locale::En,
        }
    }
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

/// Whole minutes until `start`, rounded up. Clamped at zero for safety;
/// the eligibility window never selects an event that already started.
pub fn minutes_until(now: DateTime<Utc>, start: DateTime<Utc>) -> i64 {
    let secs = (start - now).num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs + 59) / 60
}

/// Compose the reminder message for one event.
///
/// Contains the title, minutes to start (rounded up), the notes or a
/// localized "no description" placeholder, and the start time rendered in
/// the recipient's own zone.
pub fn reminder_text(
    locale: Locale,
    title: &str,
    notes: &str,
    start: Timestamp,
    now: Timestamp,
    tz: Tz,
) -> String {
    let minutes = minutes_until(now, start);
    let local_start = start.with_timezone(&tz).format("%Y-%m-%d %H:%M (%Z)");

    let heading = match locale {
        Locale::En => format!("🔔 *{title}* starts in *{minutes} minutes*."),
        Locale::Lv => format!("🔔 *{title}* sākas pēc *{minutes} min.*"),
        Locale::Ru => format!("🔔 *{title}* начнётся через *{minutes} мин.*"),
    };

    let body = if notes.trim().is_empty() {
        no_description(locale).to_string()
    } else {
        notes.trim().to_string()
    };

    format!("{heading}\n\n{body}\n\n🕒 {local_start}")
}

fn no_description(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "No description",
        Locale::Lv => "Nav apraksta",
        Locale::Ru => "Без описания",
    }
}

/// Extract image URLs embedded in event notes.
pub fn extract_image_urls(notes: &str) -> Vec<String> {
    IMAGE_URL_RE
        .find_iter(notes)
        .map(|m| m.as_str().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Daily digest
// ---------------------------------------------------------------------------

/// One agenda entry: event start (UTC) and title.
pub type DigestEntry = (Timestamp, String);

/// Compose the daily digest: localized heading plus one
/// `HH:MM — title` line per event, rendered in the recipient's zone.
///
/// Returns `None` for an empty agenda; an empty digest is suppressed.
pub fn digest_text(locale: Locale, entries: &[DigestEntry], tz: Tz) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let heading = match locale {
        Locale::En => "📅 Your agenda for today:",
        Locale::Lv => "📅 Tavi šodienas pasākumi:",
        Locale::Ru => "📅 Ваши события на сегодня:",
    };

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(heading.to_string());
    for (start, title) in entries {
        let local = start.with_timezone(&tz).format("%H:%M");
        lines.push(format!("{local} — {title}"));
    }

    Some(lines.join("\n"))
}

// ---------------------------------------------------------------------------
// Link handshake
// ---------------------------------------------------------------------------

/// Confirmation sent once a chat is bound.
pub fn link_confirmation(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "✅ Telegram notifications are now connected.",
        Locale::Lv => "✅ Telegram paziņojumi ir pieslēgti.",
        Locale::Ru => "✅ Уведомления Telegram подключены.",
    }
}

/// True iff `text` is the `/start` message carrying exactly this token.
pub fn start_payload_matches(text: &str, token: &str) -> bool {
    text.trim() == format!("/start {token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::resolve_timezone;

    fn utc(s: &str) -> Timestamp {
        s.parse().expect("valid RFC 3339 timestamp")
    }

    // -----------------------------------------------------------------------
    // Minutes rounding
    // -----------------------------------------------------------------------

    #[test]
    fn minutes_round_up_from_whole() {
        // 29 minutes exactly stays 29.
        let now = utc("2024-01-10T08:31:00Z");
        let start = utc("2024-01-10T09:00:00Z");
        assert_eq!(minutes_until(now, start), 29);
    }

    #[test]
    fn partial_minute_rounds_up() {
        let now = utc("2024-01-10T08:30:01Z");
        let start = utc("2024-01-10T09:00:00Z");
        assert_eq!(minutes_until(now, start), 30);
    }

    #[test]
    fn past_start_clamps_to_zero() {
        let now = utc("2024-01-10T09:01:00Z");
        let start = utc("2024-01-10T09:00:00Z");
        assert_eq!(minutes_until(now, start), 0);
    }

    // -----------------------------------------------------------------------
    // Reminder text
    // -----------------------------------------------------------------------

    #[test]
    fn reminder_contains_rounded_minutes_and_utc_date() {
        let text = reminder_text(
            Locale::En,
            "Standup",
            "",
            utc("2024-01-10T09:00:00Z"),
            utc("2024-01-10T08:31:00Z"),
            resolve_timezone("UTC"),
        );
        assert!(text.contains("starts in *29 minutes*"), "{text}");
        assert!(text.contains("2024-01-10 09:00 (UTC)"), "{text}");
        assert!(text.contains("No description"), "{text}");
    }

    #[test]
    fn reminder_renders_start_in_recipient_zone() {
        let text = reminder_text(
            Locale::En,
            "Standup",
            "Sync with the team",
            utc("2024-01-10T09:00:00Z"),
            utc("2024-01-10T08:31:00Z"),
            resolve_timezone("Europe/Riga"),
        );
        // 09:00 UTC is 11:00 in Riga (UTC+2 in January).
        assert!(text.contains("2024-01-10 11:00"), "{text}");
        assert!(text.contains("Sync with the team"), "{text}");
    }

    #[test]
    fn reminder_localizes_heading() {
        let text = reminder_text(
            Locale::Ru,
            "Standup",
            "",
            utc("2024-01-10T09:00:00Z"),
            utc("2024-01-10T08:31:00Z"),
            resolve_timezone("UTC"),
        );
        assert!(text.contains("начнётся через *29 мин.*"), "{text}");
    }

    // -----------------------------------------------------------------------
    // Image extraction
    // -----------------------------------------------------------------------

    #[test]
    fn extracts_image_urls_from_notes() {
        let notes = "Agenda attached: https://cdn.example.com/room.png and \
                     see http://example.com/map.JPG (parking)";
        let urls = extract_image_urls(notes);
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/room.png".to_string(),
                "http://example.com/map.JPG".to_string(),
            ]
        );
    }

    #[test]
    fn ignores_non_image_links() {
        let urls = extract_image_urls("Join https://meet.example.com/abc");
        assert!(urls.is_empty());
    }

    // -----------------------------------------------------------------------
    // Digest text
    // -----------------------------------------------------------------------

    #[test]
    fn digest_lists_events_in_local_time() {
        let tz = resolve_timezone("Europe/Riga");
        let entries = vec![
            (utc("2024-01-10T09:00:00Z"), "Standup".to_string()),
            (utc("2024-01-10T14:30:00Z"), "Review".to_string()),
        ];
        let text = digest_text(Locale::En, &entries, tz).expect("non-empty digest");
        assert!(text.starts_with("📅 Your agenda for today:"), "{text}");
        assert!(text.contains("11:00 — Standup"), "{text}");
        assert!(text.contains("16:30 — Review"), "{text}");
    }

    #[test]
    fn empty_digest_is_suppressed() {
        assert_eq!(digest_text(Locale::En, &[], Tz::UTC), None);
    }

    // -----------------------------------------------------------------------
    // /start payload
    // -----------------------------------------------------------------------

    #[test]
    fn start_payload_exact_match() {
        assert!(start_payload_matches("/start abc123", "abc123"));
        assert!(start_payload_matches("  /start abc123  ", "abc123"));
    }

    #[test]
    fn start_payload_rejects_other_tokens() {
        assert!(!start_payload_matches("/start abc124", "abc123"));
        assert!(!start_payload_matches("/start", "abc123"));
        assert!(!start_payload_matches("hello", "abc123"));
    }

    // -----------------------------------------------------------------------
    // Locale mapping
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(Locale::from_code("de"), Locale::En);
        assert_eq!(Locale::from_code("LV"), Locale::Lv);
        assert_eq!(Locale::from_code("ru"), Locale::Ru);
    }
}
