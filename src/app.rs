//! Deadlines App
//!
//! Root component; the block is the whole page.

use leptos::prelude::*;

use crate::components::DeadlinesBlock;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="main-content">
            <DeadlinesBlock />
        </main>
    }
}
