//! CLI Command Handlers
//!
//! Each handler drives a `SearchSession` to completion and reports the
//! outcome through `Output`, returning an `ExitCode`.

use crate::cli::{validate_imdb_id, ExitCode, InfoCmd, Output, SearchCmd};
use crate::models::{DetailRecord, SearchResultItem};
use crate::session::{validate_query, Phase, SearchSession};

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, session: &SearchSession, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if let Some(message) = validate_query(query, session.config().min_query_len) {
        return output.error(message, ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for: {}", query));
    session.update_query(query);
    session.search();
    let state = session.settled().await;

    match state.search_phase {
        Phase::Success => {
            let mut results = state.results;
            if let Some(filter) = cmd.media_type {
                results.retain(|r| filter.matches(r.media_type));
            }
            results.truncate(cmd.limit);

            if let Some(total) = state.total_results {
                output.info(format!("{} of {} total results", results.len(), total));
            }
            if let Err(e) = output.print(&results, || format_results(&results)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Phase::Failed(message) => output.error(message, ExitCode::Error),
        Phase::Idle | Phase::Loading => output.error("Search did not complete", ExitCode::Error),
    }
}

fn format_results(results: &[SearchResultItem]) -> String {
    if results.is_empty() {
        return "No results match the filter".to_string();
    }
    results
        .iter()
        .map(|r| format!("{:<12} {}", r.imdb_id, r))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, session: &SearchSession, output: &Output) -> ExitCode {
    let imdb_id = match validate_imdb_id(cmd.imdb_id.trim()) {
        Ok(id) => id,
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };

    output.info(format!("Getting info for: {}", imdb_id));
    session.get_details(imdb_id);
    let state = session.settled().await;

    match (state.selected, state.detail_phase) {
        (Some(detail), _) => {
            if let Err(e) = output.print(&detail, || format_detail(&detail)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        (None, Phase::Failed(message)) => output.error(message, ExitCode::Error),
        (None, _) => output.error("Detail fetch did not complete", ExitCode::Error),
    }
}

fn format_detail(detail: &DetailRecord) -> String {
    let mut lines = vec![detail.to_string(), String::new()];
    for (label, value) in detail.fields() {
        lines.push(format!("{:<12} {}", format!("{}:", label), value));
    }
    if let Some(ref plot) = detail.plot {
        lines.push(String::new());
        lines.push(plot.clone());
    }
    lines.join("\n")
}
