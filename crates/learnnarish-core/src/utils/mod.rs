//! Display helpers shared by status output and the CLI.

pub mod format;

pub use format::{format_age, format_date, truncate};
