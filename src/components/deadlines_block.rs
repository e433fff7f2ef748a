//! Deadlines Block Component
//!
//! Shows upcoming deadlines and keeps them fresh with a per-minute poll.

use chrono::{Local, Utc};
use leptos::prelude::*;

use crate::api;
use crate::config::DeadlinesConfig;
use crate::poller::DeadlinePoller;
use crate::state::{BlockView, DeadlinesState};

/// Upcoming deadlines list
///
/// # Arguments
/// * `config` - Source URL, poll period and texts; defaults to the deployed setup
#[component]
pub fn DeadlinesBlock(#[prop(optional)] config: Option<DeadlinesConfig>) -> impl IntoView {
    let config = config.unwrap_or_default();
    let state = RwSignal::new(DeadlinesState::default());
    let poller = DeadlinePoller::new();

    // Start polling on mount
    {
        let poller = poller.clone();
        let source_url = config.source_url.clone();
        let period = config.poll_period();
        Effect::new(move |_| {
            let task_poller = poller.clone();
            let source_url = source_url.clone();
            poller.start(period, move || {
                let poller = task_poller.clone();
                let source_url = source_url.clone();
                async move {
                    let outcome = api::fetch_deadlines(&source_url).await;
                    if let Some(outcome) = poller.admit(outcome) {
                        state.try_update(|s| s.apply(outcome, &Local));
                    }
                }
            });
        });
    }

    on_cleanup(move || poller.stop());

    move || match state.with(|s| s.view(&Utc::now(), &Local, &config)) {
        BlockView::Loading => view! { <p>{config.loading_text.clone()}</p> }.into_any(),
        BlockView::Error(message) => view! { <p>"Error: " {message}</p> }.into_any(),
        BlockView::Empty => block_frame(
            &config,
            view! { <p>{config.empty_text.clone()}</p> }.into_any(),
        ),
        BlockView::Entries(html) => block_frame(
            &config,
            view! { <p style="line-height: 1.8em;" inner_html=html></p> }.into_any(),
        ),
    }
}

fn block_frame(config: &DeadlinesConfig, body: AnyView) -> AnyView {
    view! {
        <div id="deadlinesBlock" style="margin-bottom: 20px;">
            <h2>{config.heading.clone()}</h2>
            {body}
            <a href={config.submit_link.clone()}>{config.submit_label.clone()}</a>
        </div>
    }
    .into_any()
}
