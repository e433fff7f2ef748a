//! UI Components
//!
//! Leptos components of the deadlines page.

mod deadlines_block;

pub use deadlines_block::DeadlinesBlock;
