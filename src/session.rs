//! Search session: the state behind one search screen
//!
//! A [`SearchSession`] owns the query, the result list, loading flags, the
//! single error slot and the selected detail record. Mutators return
//! immediately; network work runs on tokio tasks owned by the session and
//! every change is published through a `watch` channel.
//!
//! Each operation kind (search, detail fetch) carries a sequence number.
//! Starting a new operation aborts the previous task of that kind, and a
//! result is only applied while its sequence is still the latest, so a slow
//! earlier response can never overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{LookupError, MetadataClient};
use crate::messages;
use crate::models::{DetailRecord, SearchResultItem};
use crate::retry::{RetryError, RetryPolicy};

// =============================================================================
// Published State
// =============================================================================

/// Status of one operation kind
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet (or cleared)
    #[default]
    Idle,
    /// Request in flight, including retry backoff
    Loading,
    /// Last request succeeded
    Success,
    /// Last request failed with the given user-facing message
    Failed(String),
}

/// Which display mode the state calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

/// Everything a screen needs to render a session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub query: String,
    /// Replaced wholesale by each search
    pub results: Vec<SearchResultItem>,
    pub total_results: Option<u32>,
    pub search_loading: bool,
    pub detail_loading: bool,
    /// Single slot, newest message wins
    pub error: Option<String>,
    pub selected: Option<DetailRecord>,
    pub search_phase: Phase,
    pub detail_phase: Phase,
    /// Retries spent by the current search, 0 when idle
    pub search_retries: u32,
    /// Retries spent by the current detail fetch, 0 when idle
    pub detail_retries: u32,
}

impl SessionState {
    /// A selected record means detail view; otherwise list view
    pub fn view(&self) -> View {
        if self.selected.is_some() {
            View::Detail
        } else {
            View::List
        }
    }

    /// Whether any operation is in flight
    pub fn is_busy(&self) -> bool {
        self.search_loading || self.detail_loading
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub search_retry: RetryPolicy,
    pub detail_retry: RetryPolicy,
    /// Minimum trimmed query length, in characters
    pub min_query_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search_retry: RetryPolicy::SEARCH,
            detail_retry: RetryPolicy::DETAIL,
            min_query_len: 2,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Op {
    Search,
    Detail,
}

#[derive(Default)]
struct Control {
    closed: bool,
    search_seq: u64,
    detail_seq: u64,
    search_task: Option<JoinHandle<()>>,
    detail_task: Option<JoinHandle<()>>,
}

impl Control {
    fn seq(&self, op: Op) -> u64 {
        match op {
            Op::Search => self.search_seq,
            Op::Detail => self.detail_seq,
        }
    }

    /// Start a new generation of `op`, cancelling the previous task
    fn supersede(&mut self, op: Op) -> u64 {
        let (seq, task) = match op {
            Op::Search => (&mut self.search_seq, &mut self.search_task),
            Op::Detail => (&mut self.detail_seq, &mut self.detail_task),
        };
        *seq += 1;
        if let Some(task) = task.take() {
            if !task.is_finished() {
                debug!(?op, "superseding in-flight task");
            }
            task.abort();
        }
        *seq
    }

    fn set_task(&mut self, op: Op, task: JoinHandle<()>) {
        match op {
            Op::Search => self.search_task = Some(task),
            Op::Detail => self.detail_task = Some(task),
        }
    }
}

struct Shared {
    client: Arc<dyn MetadataClient>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    control: Mutex<Control>,
}

impl Shared {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a change unless the session is closed
    fn modify(&self, f: impl FnOnce(&mut SessionState)) -> bool {
        let control = self.control();
        if control.closed {
            return false;
        }
        self.state.send_modify(f);
        true
    }

    /// Publish a change only while `seq` is the latest generation of `op`
    fn apply(&self, op: Op, seq: u64, f: impl FnOnce(&mut SessionState)) -> bool {
        let control = self.control();
        if control.closed || control.seq(op) != seq {
            debug!(?op, seq, latest = control.seq(op), "dropping stale result");
            return false;
        }
        self.state.send_modify(f);
        true
    }
}

/// Search/detail state holder for one screen.
///
/// Must be driven from inside a Tokio runtime: `search` and `get_details`
/// spawn tasks. Dropping the session cancels them.
pub struct SearchSession {
    shared: Arc<Shared>,
}

impl SearchSession {
    /// Create a session with default retry policies
    pub fn new(client: Arc<dyn MetadataClient>) -> Self {
        Self::with_config(client, SessionConfig::default())
    }

    pub fn with_config(client: Arc<dyn MetadataClient>, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            shared: Arc::new(Shared {
                client,
                config,
                state,
                control: Mutex::new(Control::default()),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Wait until neither a search nor a detail fetch is in flight
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        if let Ok(state) = rx.wait_for(|s| !s.is_busy()).await {
            return state.clone();
        }
        self.state()
    }

    /// Replace the query text. Clears any error; no network effect.
    pub fn update_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.modify(|s| {
            s.query = text;
            s.error = None;
        });
    }

    /// Validate the current query and start a search.
    ///
    /// A query that fails validation only writes the error slot while a
    /// previous search is still in flight; that search keeps running and
    /// owns `search_phase`.
    pub fn search(&self) {
        let query = self.shared.state.borrow().query.trim().to_string();

        if let Some(message) = validate_query(&query, self.shared.config.min_query_len) {
            debug!(%query, %message, "search rejected locally");
            self.shared.modify(|s| {
                s.error = Some(message.to_string());
                if !s.search_loading {
                    s.search_phase = Phase::Failed(message.to_string());
                }
            });
            return;
        }

        let mut control = self.shared.control();
        if control.closed {
            return;
        }
        let seq = control.supersede(Op::Search);
        self.shared.state.send_modify(|s| {
            s.search_loading = true;
            s.error = None;
            s.search_phase = Phase::Loading;
            s.search_retries = 0;
        });

        info!(%query, seq, "search started");
        let task = tokio::spawn(run_search(Arc::clone(&self.shared), seq, query));
        control.set_task(Op::Search, task);
    }

    /// Fetch the full record for `imdb_id` and select it on success
    pub fn get_details(&self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();

        let mut control = self.shared.control();
        if control.closed {
            return;
        }
        let seq = control.supersede(Op::Detail);
        self.shared.state.send_modify(|s| {
            s.detail_loading = true;
            s.detail_phase = Phase::Loading;
            s.detail_retries = 0;
        });

        info!(%imdb_id, seq, "detail fetch started");
        let task = tokio::spawn(run_details(Arc::clone(&self.shared), seq, imdb_id));
        control.set_task(Op::Detail, task);
    }

    /// Leave detail view. An in-flight detail fetch is abandoned.
    pub fn clear_selected(&self) {
        let mut control = self.shared.control();
        if control.closed {
            return;
        }
        control.supersede(Op::Detail);
        self.shared.state.send_modify(|s| {
            s.selected = None;
            s.detail_loading = false;
            s.detail_retries = 0;
            s.detail_phase = Phase::Idle;
        });
    }

    pub fn clear_error(&self) {
        self.shared.modify(|s| s.error = None);
    }

    /// Back to the state of a fresh session, abandoning in-flight work
    pub fn clear_all(&self) {
        let mut control = self.shared.control();
        if control.closed {
            return;
        }
        control.supersede(Op::Search);
        control.supersede(Op::Detail);
        self.shared.state.send_modify(|s| *s = SessionState::default());
        debug!("session cleared");
    }

    /// Repeat the search for the current query, if there is one
    pub fn force_refresh(&self) {
        let has_query = !self.shared.state.borrow().query.trim().is_empty();
        if has_query {
            self.search();
        }
    }

    /// Tear down: cancel all tasks (including retry waits). No state change
    /// is published after this returns.
    pub fn close(&self) {
        let mut control = self.shared.control();
        if control.closed {
            return;
        }
        control.closed = true;
        for task in [control.search_task.take(), control.detail_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
        self.shared.state.send_modify(|s| {
            s.search_loading = false;
            s.detail_loading = false;
        });
        debug!("session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.control().closed
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Local checks on a trimmed query; `None` when it may be sent
pub fn validate_query(query: &str, min_len: usize) -> Option<&'static str> {
    if query.is_empty() {
        Some(messages::EMPTY_QUERY)
    } else if query.chars().count() < min_len {
        Some(messages::SHORT_QUERY)
    } else {
        None
    }
}

// =============================================================================
// Tasks
// =============================================================================

async fn run_search(shared: Arc<Shared>, seq: u64, query: String) {
    let policy = shared.config.search_retry;

    let outcome = policy
        .run(
            || shared.client.search(&query),
            |kind, retry| {
                warn!(%query, %kind, retry, max = policy.max_retries, "search retrying");
                shared.apply(Op::Search, seq, |s| {
                    s.error = Some(messages::search_retrying(kind, retry, policy.max_retries));
                    s.search_retries = retry;
                })
            },
        )
        .await;

    let (results, total_results, error) = match outcome {
        Ok(page) if page.items.is_empty() => {
            info!(%query, "search returned no results");
            (Vec::new(), page.total_results, Some(messages::no_results(&query)))
        }
        Ok(page) => {
            info!(%query, count = page.items.len(), "search succeeded");
            (page.items, page.total_results, None)
        }
        Err(RetryError::Terminal(LookupError::Rejected(raw))) => {
            info!(%query, %raw, "search rejected by service");
            (Vec::new(), None, Some(messages::search_rejected(&raw, &query)))
        }
        Err(RetryError::Terminal(other)) => {
            warn!(%query, error = %other, "search failed unexpectedly");
            (Vec::new(), None, Some(messages::unexpected(&other.to_string())))
        }
        Err(RetryError::Exhausted { kind, attempts, .. }) => {
            warn!(%query, %kind, attempts, max_attempts = policy.max_attempts(), "search gave up");
            (Vec::new(), None, Some(messages::search_exhausted(kind)))
        }
        Err(RetryError::Abandoned) => return,
    };

    shared.apply(Op::Search, seq, |s| {
        s.results = results;
        s.total_results = total_results;
        s.search_phase = match error {
            Some(ref msg) => Phase::Failed(msg.clone()),
            None => Phase::Success,
        };
        s.error = error;
        s.search_loading = false;
        s.search_retries = 0;
    });
}

async fn run_details(shared: Arc<Shared>, seq: u64, imdb_id: String) {
    let policy = shared.config.detail_retry;
    let mut last_progress: Option<String> = None;

    let outcome = policy
        .run(
            || shared.client.get_details(&imdb_id),
            |kind, retry| {
                warn!(%imdb_id, %kind, retry, max = policy.max_retries, "detail fetch retrying");
                let progress = messages::detail_retrying(kind, retry, policy.max_retries);
                last_progress = Some(progress.clone());
                shared.apply(Op::Detail, seq, |s| {
                    s.error = Some(progress);
                    s.detail_retries = retry;
                })
            },
        )
        .await;

    let result = match outcome {
        Ok(record) => {
            info!(%imdb_id, "detail fetch succeeded");
            Ok(record)
        }
        Err(RetryError::Terminal(LookupError::Rejected(raw))) => {
            info!(%imdb_id, %raw, "detail fetch rejected by service");
            Err(messages::DETAIL_REJECTED.to_string())
        }
        Err(RetryError::Terminal(other)) => {
            warn!(%imdb_id, error = %other, "detail fetch failed unexpectedly");
            Err(messages::detail_unexpected(&other.to_string()))
        }
        Err(RetryError::Exhausted { kind, attempts, .. }) => {
            warn!(%imdb_id, %kind, attempts, max_attempts = policy.max_attempts(), "detail fetch gave up");
            Err(messages::detail_exhausted(kind, attempts))
        }
        Err(RetryError::Abandoned) => return,
    };

    shared.apply(Op::Detail, seq, |s| {
        match result {
            Ok(record) => {
                // Progress text from our own retries is stale now
                if last_progress.is_some() && s.error == last_progress {
                    s.error = None;
                }
                s.selected = Some(record);
                s.detail_phase = Phase::Success;
            }
            Err(message) => {
                s.error = Some(message.clone());
                s.detail_phase = Phase::Failed(message);
            }
        }
        s.detail_loading = false;
        s.detail_retries = 0;
    });
}
