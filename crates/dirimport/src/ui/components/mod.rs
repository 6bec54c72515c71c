//! Collection of reusable TUI components.

pub mod directory_form;
pub mod notice;
