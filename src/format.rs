//! Deadline Formatting
//!
//! Turns deadline records into the HTML lines shown in the block:
//! - emoji for category tokens (`[Тест]` → 📚, `[Лекция]` → 👨‍🏫)
//! - optional link around the name
//! - localized date wrapped in a "create event" Google Calendar link
//! - raw fallback text when the time cannot be parsed

use std::cmp::Ordering;
use std::fmt::Display;
use std::sync::OnceLock;
use chrono::{DateTime, TimeZone, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::config::DeadlinesConfig;
use crate::datetime::{gcal_timestamp, localized_date, parse_deadline_time};
use crate::models::Deadline;

const GCAL_EVENT_URL: &str = "https://calendar.google.com/calendar/u/0/r/eventedit";

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const LINK_STYLE: &str = r#"style="text-decoration: none; color: inherit;" onmouseover="this.style.opacity='0.8'" onmouseout="this.style.opacity='1'""#;

/// Category tokens and their replacements (lazy compiled)
static CATEGORY_TOKENS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn category_tokens() -> &'static [(Regex, &'static str)] {
    CATEGORY_TOKENS.get_or_init(|| {
        [(r"(?i)\[тест\]", "📚"), (r"(?i)\[лекция\]", "👨‍🏫")]
            .into_iter()
            .map(|(pattern, emoji)| (Regex::new(pattern).expect("Invalid category pattern"), emoji))
            .collect()
    })
}

/// Replace known bracketed category tokens, case-insensitively
pub fn substitute_emoji(name: &str) -> String {
    category_tokens()
        .iter()
        .fold(name.to_string(), |acc, (token, emoji)| {
            token.replace_all(&acc, *emoji).into_owned()
        })
}

/// Ascending by parsed time; unparsable times go last
pub fn compare_deadlines<Tz: TimeZone>(a: &Deadline, b: &Deadline, tz: &Tz) -> Ordering {
    let parse = |d: &Deadline| d.time_str().and_then(|t| parse_deadline_time(t, tz));
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort, so equal and unparsable entries keep document order
pub fn sort_deadlines<Tz: TimeZone>(deadlines: &mut [Deadline], tz: &Tz) {
    deadlines.sort_by(|a, b| compare_deadlines(a, b, tz));
}

/// Google Calendar "create event" link for one deadline
pub fn calendar_link<Tz>(name: &str, instant: &DateTime<Utc>, tz: &Tz, description: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = gcal_timestamp(instant, tz);
    format!(
        "{}?text={}&dates={}/{}&details={}&color=6",
        GCAL_EVENT_URL,
        utf8_percent_encode(name, URI_COMPONENT),
        stamp,
        stamp,
        utf8_percent_encode(description, URI_COMPONENT),
    )
}

/// Format one deadline as an HTML line.
///
/// Returns `None` when the deadline has a valid time that is not in the
/// future. An unparsable time is logged and shown raw instead; a missing one
/// shows `config.missing_time_text`.
pub fn format_deadline<Tz>(
    deadline: &Deadline,
    now: &DateTime<Utc>,
    tz: &Tz,
    config: &DeadlinesConfig,
) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let instant = match deadline.time_str() {
        None => {
            log::warn!("[DEADLINES] Time property is missing for {:?}", deadline.name);
            None
        }
        Some(raw) => {
            let parsed = parse_deadline_time(raw, tz);
            if parsed.is_none() {
                log::warn!("[DEADLINES] Invalid date format: {:?}", raw);
            }
            parsed
        }
    };

    if instant.is_some_and(|at| at <= *now) {
        return None;
    }

    let name = substitute_emoji(&deadline.name);
    let mut text = label_html(&name, deadline.url.as_deref());

    match instant {
        Some(at) => {
            let link = calendar_link(&name, &at, tz, &config.calendar_description);
            text.push_str(&format!(
                r#" &#8212; <a href="{}" target="_blank" {}> {} </a>"#,
                escape_html(&link),
                LINK_STYLE,
                localized_date(&at, tz),
            ));
        }
        None => {
            let raw = deadline.time_str().unwrap_or(config.missing_time_text.as_str());
            text.push_str(" &#8212; ");
            text.push_str(&escape_html(raw));
        }
    }

    Some(text)
}

/// Format a sorted list, dropping suppressed entries
pub fn render_entries<Tz>(
    deadlines: &[Deadline],
    now: &DateTime<Utc>,
    tz: &Tz,
    config: &DeadlinesConfig,
) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    deadlines
        .iter()
        .filter_map(|deadline| format_deadline(deadline, now, tz, config))
        .collect()
}

fn label_html(name: &str, url: Option<&str>) -> String {
    let name = escape_html(name);
    match url.filter(|u| !u.is_empty()) {
        Some(url) => format!(
            r#"<b style="padding-left: 5px; border-left: 2px solid rgba(157,128,218,0.5);"><a href="{}" target="_blank" {}>{}</a></b>"#,
            escape_html(url),
            LINK_STYLE,
            name,
        ),
        None => format!(r#"<b style="padding-left: 8px;">{}</b>"#, name),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
