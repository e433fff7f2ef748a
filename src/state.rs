//! Block State
//!
//! Loading / error / data state of the deadlines block and its single
//! transition: applying the outcome of a poll.

use std::fmt::Display;
use chrono::{DateTime, TimeZone, Utc};

use crate::config::DeadlinesConfig;
use crate::format::{render_entries, sort_deadlines};
use crate::models::{Deadline, DeadlinesDocument};

/// Result of one fetch, `Err` carries the message to show
pub type PollOutcome = Result<DeadlinesDocument, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct DeadlinesState {
    /// Sorted deadlines from the last successful poll
    pub deadlines: Vec<Deadline>,
    /// True until the first poll completes
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for DeadlinesState {
    fn default() -> Self {
        Self {
            deadlines: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

/// What the block shows
#[derive(Debug, Clone, PartialEq)]
pub enum BlockView {
    Loading,
    Error(String),
    Empty,
    /// Formatted entries joined with `<br>`
    Entries(String),
}

impl DeadlinesState {
    /// Apply a poll outcome.
    ///
    /// Success replaces the list and clears a stale error. Failure keeps the
    /// last list but the error takes over the view until a poll succeeds.
    pub fn apply<Tz: TimeZone>(&mut self, outcome: PollOutcome, tz: &Tz) {
        match outcome {
            Ok(document) => {
                let mut deadlines = document.deadlines;
                sort_deadlines(&mut deadlines, tz);
                self.deadlines = deadlines;
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        self.loading = false;
    }

    pub fn view<Tz>(&self, now: &DateTime<Utc>, tz: &Tz, config: &DeadlinesConfig) -> BlockView
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if let Some(message) = &self.error {
            return BlockView::Error(message.clone());
        }
        if self.loading && self.deadlines.is_empty() {
            return BlockView::Loading;
        }

        let entries = render_entries(&self.deadlines, now, tz, config);
        if entries.is_empty() {
            BlockView::Empty
        } else {
            BlockView::Entries(entries.join("<br>"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{check_status, FETCH_FAILED};
    use chrono::FixedOffset;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2030-01-01T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn poll(json: &str) -> PollOutcome {
        DeadlinesDocument::from_json(json)
    }

    fn view(state: &DeadlinesState) -> BlockView {
        state.view(&now(), &tz(), &DeadlinesConfig::default())
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = DeadlinesState::default();
        assert!(state.loading);
        assert_eq!(view(&state), BlockView::Loading);
    }

    #[test]
    fn test_future_deadline_rendered() {
        let mut state = DeadlinesState::default();
        state.apply(poll(r#"{"deadlines":[{"name":"HW1","time":"2099-01-01T10:00:00Z"}]}"#), &tz());

        assert!(!state.loading);
        match view(&state) {
            BlockView::Entries(html) => {
                assert!(html.contains("HW1"));
                assert!(html.contains("https://calendar.google.com/calendar/u/0/r/eventedit?text=HW1"));
                assert!(!html.contains("<br>"));
            }
            other => panic!("expected entries, got {:?}", other),
        }
    }

    #[test]
    fn test_only_past_deadlines_shows_empty() {
        let mut state = DeadlinesState::default();
        state.apply(poll(r#"{"deadlines":[{"name":"Old","time":"2000-01-01T10:00:00Z"}]}"#), &tz());
        assert_eq!(view(&state), BlockView::Empty);
    }

    #[test]
    fn test_http_error_shows_message() {
        let outcome = check_status(500).map(|_| DeadlinesDocument::default()).map_err(|_| FETCH_FAILED.to_string());
        let mut state = DeadlinesState::default();
        state.apply(outcome, &tz());

        assert!(!state.loading);
        assert_eq!(view(&state), BlockView::Error(FETCH_FAILED.to_string()));
    }

    #[test]
    fn test_missing_time_renders_fallback() {
        let mut state = DeadlinesState::default();
        state.apply(poll(r#"{"deadlines":[{"name":"Essay"}]}"#), &tz());

        match view(&state) {
            BlockView::Entries(html) => assert!(html.contains("Essay</b> &#8212; не указано")),
            other => panic!("expected entries, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_record_renders_beside_good_one() {
        let mut state = DeadlinesState::default();
        state.apply(
            poll(r#"{"deadlines":[
                {"name":"Bad","time":20991231},
                {"name":"HW1","time":"2099-01-01T10:00:00Z"}
            ]}"#),
            &tz(),
        );

        let BlockView::Entries(html) = view(&state) else {
            panic!("expected entries");
        };
        let parts: Vec<_> = html.split("<br>").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("HW1") && parts[0].contains("calendar.google.com"));
        assert!(parts[1].ends_with("Bad</b> &#8212; 20991231"));
    }

    #[test]
    fn test_entries_sorted_and_joined() {
        let mut state = DeadlinesState::default();
        state.apply(
            poll(r#"{"deadlines":[
                {"name":"Second","time":"2099-02-01T10:00:00Z"},
                {"name":"First","time":"2099-01-01T10:00:00Z"}
            ]}"#),
            &tz(),
        );

        assert_eq!(state.deadlines[0].name, "First");
        let BlockView::Entries(html) = view(&state) else {
            panic!("expected entries");
        };
        let parts: Vec<_> = html.split("<br>").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("First"));
        assert!(parts[1].contains("Second"));
    }

    #[test]
    fn test_success_after_error_clears_error() {
        let mut state = DeadlinesState::default();
        state.apply(poll(r#"{"deadlines":[{"name":"HW1","time":"2099-01-01T10:00:00Z"}]}"#), &tz());
        state.apply(Err(FETCH_FAILED.to_string()), &tz());

        // error wins, the previous list is kept underneath
        assert_eq!(view(&state), BlockView::Error(FETCH_FAILED.to_string()));
        assert_eq!(state.deadlines.len(), 1);

        state.apply(poll(r#"{"deadlines":[]}"#), &tz());
        assert_eq!(state.error, None);
        assert_eq!(view(&state), BlockView::Empty);
    }

    #[test]
    fn test_new_poll_replaces_list() {
        let mut state = DeadlinesState::default();
        state.apply(poll(r#"{"deadlines":[{"name":"A","time":"2099-01-01"},{"name":"B","time":"2099-01-02"}]}"#), &tz());
        state.apply(poll(r#"{"deadlines":[{"name":"C","time":"2099-01-03"}]}"#), &tz());

        let names: Vec<_> = state.deadlines.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["C"]);
    }
}
