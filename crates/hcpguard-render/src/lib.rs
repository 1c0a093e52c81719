//! Rendering for scan reports (console, Markdown, JSON).
//!
//! Renderers are pure: they take a finished `ScanReport` and return a string.

#![forbid(unsafe_code)]

mod console;
mod json;
mod markdown;
mod model;

pub use console::render_console;
pub use json::render_json;
pub use markdown::render_markdown;
pub use model::RowStatus;

#[cfg(test)]
mod test_support;
