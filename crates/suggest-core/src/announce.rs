//! Status messages handed to the host's live-region announcer.

use serde::Serialize;

/// How urgently the host should read a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    Polite,
    Assertive,
}

pub const NO_RESULTS: &str = "No results.";

/// Result-count message announced after every successful fetch.
pub fn results_message(count: usize) -> String {
    match count {
        0 => NO_RESULTS.to_string(),
        1 => "1 result found, use up and down arrow keys to navigate.".to_string(),
        n => format!("{n} results found, use up and down arrow keys to navigate."),
    }
}

pub fn selection_message(label: &str) -> String {
    format!("{label} selected.")
}
