//! Report renderers for mockview.
//!
//! The report data itself lives in [`mockview_core::report`]; this crate turns
//! it into a self-contained HTML page or a plain-text summary.

pub mod html;
pub mod text;

pub use html::{generate_html, write_html_report};
pub use text::{generate_text, write_text_report};
