//! User-facing message catalogue
//!
//! Everything the session writes into its error slot comes from here.

use crate::api::TransportKind;

pub const EMPTY_QUERY: &str = "Enter a title to search";
pub const SHORT_QUERY: &str = "Enter at least 2 characters";
pub const API_CONFIG_ERROR: &str = "API configuration error. Please try again.";
pub const TOO_MANY_RESULTS: &str = "Too many results. Be more specific.";
pub const DETAIL_REJECTED: &str = "Couldn't load movie details";

pub fn no_results(query: &str) -> String {
    format!("No results found for \"{}\"", query)
}

/// Map a remote rejection of a search to what the user sees
pub fn search_rejected(raw: &str, query: &str) -> String {
    let lowered = raw.to_ascii_lowercase();
    if lowered.contains("not found") {
        format!("No movie found for \"{}\". Try another term.", query)
    } else if lowered.contains("too many results") {
        TOO_MANY_RESULTS.to_string()
    } else if lowered.contains("invalid api") {
        API_CONFIG_ERROR.to_string()
    } else {
        format!("Couldn't find movies for \"{}\"", query)
    }
}

pub fn transport(kind: TransportKind) -> &'static str {
    match kind {
        TransportKind::Unreachable => "No internet connection. Check your connection.",
        TransportKind::Timeout => "Connection is too slow. Please try again.",
        TransportKind::Tls => "Secure connection failed.",
        TransportKind::Io => "Network error. Check your connection.",
    }
}

pub fn search_retrying(kind: TransportKind, attempt: u32, max: u32) -> String {
    format!("{} Attempt {}/{}...", transport(kind), attempt, max)
}

pub fn search_exhausted(kind: TransportKind) -> String {
    format!("{} All attempts failed.", transport(kind))
}

pub fn unexpected(details: &str) -> String {
    format!("Unexpected error. Please try again.\nDetails: {}", details)
}

pub fn detail_retrying(kind: TransportKind, attempt: u32, max: u32) -> String {
    let prefix = match kind {
        TransportKind::Timeout => "Timeout.",
        _ => "Connection error.",
    };
    format!("{} Attempt {}/{}...", prefix, attempt, max)
}

pub fn detail_exhausted(kind: TransportKind, attempts: u32) -> String {
    let prefix = match kind {
        TransportKind::Timeout => "Timed out while loading details",
        _ => "Connection error while loading details",
    };
    format!("{} after {} attempts", prefix, attempts)
}

pub fn detail_unexpected(details: &str) -> String {
    format!("Unexpected error while loading details: {}", details)
}
