//! # Listing Actor
//!
//! The `ListingActor` owns the [`ListingState`] and is the only thing that ever
//! mutates it. It processes three kinds of input sequentially in one task:
//!
//! - **Intents** from [`ListingClient`] (filter, sort, page changes).
//! - **Fetch completions** from the tasks it spawns, one per fetch cycle.
//! - **Session changes** from the identity layer's `watch` channel.
//!
//! ## Last-issued-wins
//! Every fetch gets the next sequence number. A completion commits only if its
//! number is the highest issued so far; anything older is dropped. In-flight
//! fetches are never cancelled, their results are just ignored.
//!
//! ## Commit rules
//! - Fetch start: `loading = true`, `last_error` cleared.
//! - Success: `items` and `total_count` replaced together, `loading = false`.
//! - Failure: `last_error` set, `loading = false`, previous rows kept.
//! - A committed total that leaves `page` past the last page moves to the last
//!   page and fetches again.
//! - An intent deferred by the session invalidates the fetch in flight.

use super::fetch::fetch_page;
use super::messages::{FetchCompleted, IntentOutcome, ListingIntent, ListingRequest};
use crate::clients::ListingClient;
use crate::config::ListingConfig;
use crate::model::{ListingSort, ListingState, SortDirection};
use crate::session::{Navigator, SessionSignal};
use crate::source::DataSource;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, info_span, warn, Instrument};

/// Dependencies injected when the actor starts running.
#[derive(Clone)]
pub struct ListingContext {
    pub source: Arc<dyn DataSource>,
    pub session: watch::Receiver<SessionSignal>,
    pub navigator: Arc<dyn Navigator>,
}

pub struct ListingActor {
    receiver: mpsc::Receiver<ListingRequest>,
    completions_tx: mpsc::UnboundedSender<FetchCompleted>,
    completions: mpsc::UnboundedReceiver<FetchCompleted>,
    publisher: watch::Sender<ListingState>,
    state: ListingState,
    /// Highest sequence number issued.
    issued: u64,
    /// A fetch is owed as soon as the session allows it.
    deferred: bool,
}

impl ListingActor {
    /// Creates the actor and its client. The actor does nothing until [`run`](Self::run).
    pub fn new(config: &ListingConfig) -> (Self, ListingClient) {
        let (sender, receiver) = mpsc::channel(config.mailbox_capacity.max(1));
        let (completions_tx, completions) = mpsc::unbounded_channel();

        let sort = ListingSort {
            key: config.default_sort,
            direction: SortDirection::Asc,
        };
        let state = ListingState::new(config.page_size, sort);
        let (publisher, watcher) = watch::channel(state.clone());

        let actor = Self {
            receiver,
            completions_tx,
            completions,
            publisher,
            state,
            issued: 0,
            // The initial load is owed from the start.
            deferred: true,
        };
        (actor, ListingClient::new(sender, watcher))
    }

    /// Runs the event loop until every client is dropped.
    pub async fn run(mut self, context: ListingContext) {
        info!(page_size = self.state.page_size, "Listing actor started");

        let mut session = context.session.clone();
        let initial = *session.borrow_and_update();
        self.observe_session(initial, &context);
        let mut session_open = true;

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg, &context),
                    None => break,
                },
                Some(done) = self.completions.recv() => self.complete(done, &context),
                changed = session.changed(), if session_open => match changed {
                    Ok(()) => {
                        let signal = *session.borrow_and_update();
                        self.observe_session(signal, &context);
                    }
                    Err(_) => {
                        debug!("Session channel closed");
                        session_open = false;
                    }
                },
            }
        }

        info!(issued = self.issued, total = self.state.total_count, "Shutdown");
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }

    fn handle(&mut self, msg: ListingRequest, context: &ListingContext) {
        match msg {
            ListingRequest::Intent { intent, respond_to } => {
                debug!(?intent, "Intent");
                let outcome = self.apply_intent(intent, context);
                let _ = respond_to.send(outcome);
            }
            ListingRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.state.clone());
            }
        }
    }

    fn apply_intent(&mut self, intent: ListingIntent, context: &ListingContext) -> IntentOutcome {
        let state = &mut self.state;
        match intent {
            ListingIntent::SetReferenceFilter(text) => {
                state.filters.reference = text;
                state.page = 1;
            }
            ListingIntent::SetManufacturerNameFilter(text) => {
                state.filters.manufacturer_name = text;
                state.page = 1;
            }
            ListingIntent::SetManufacturerFilter(id) => {
                state.filters.manufacturer_id = id;
                state.page = 1;
            }
            ListingIntent::SetCategoryFilter(id) => {
                state.filters.category_id = id;
                state.page = 1;
            }
            ListingIntent::SetSort(key) => {
                state.sort = state.sort.select(key);
                state.page = 1;
            }
            ListingIntent::SetPage(page) => {
                if !state.accepts_page(page) {
                    debug!(page, total_pages = state.total_pages(), "Page out of range");
                    return IntentOutcome::Ignored;
                }
                state.page = page;
            }
            ListingIntent::SetPageSize(page_size) => {
                if page_size == 0 {
                    return IntentOutcome::Ignored;
                }
                state.page_size = page_size;
                state.page = 1;
            }
            ListingIntent::Refresh => {}
        }
        self.issue_fetch(context)
    }

    fn issue_fetch(&mut self, context: &ListingContext) -> IntentOutcome {
        if !self.state.session.allows_fetch() {
            if self.state.loading {
                // The running fetch was issued for the previous filters.
                self.issued += 1;
                self.state.loading = false;
            }
            self.deferred = true;
            self.publish();
            debug!(session = ?self.state.session, "Fetch deferred");
            return IntentOutcome::Deferred;
        }

        self.deferred = false;
        self.issued += 1;
        let seq = self.issued;
        self.state.loading = true;
        self.state.last_error = None;
        self.publish();

        let params = self.state.params();
        let source = context.source.clone();
        let completions = self.completions_tx.clone();
        debug!(seq, page = params.page, "Fetch issued");
        tokio::spawn(
            async move {
                let outcome = fetch_page(source.as_ref(), &params).await;
                let _ = completions.send(FetchCompleted { seq, outcome });
            }
            .instrument(info_span!("listing_fetch", seq)),
        );

        IntentOutcome::Fetching { seq }
    }

    fn complete(&mut self, done: FetchCompleted, context: &ListingContext) {
        if done.seq != self.issued {
            debug!(seq = done.seq, latest = self.issued, "Stale completion dropped");
            return;
        }

        self.state.loading = false;
        self.state.loaded = true;
        match done.outcome {
            Ok(page) => {
                info!(
                    seq = done.seq,
                    rows = page.items.len(),
                    total = page.total_count,
                    "Committed"
                );
                self.state.items = page.items;
                self.state.total_count = page.total_count;

                // A page accepted against an older total may now be past the end.
                let last_page = self.state.total_pages();
                if self.state.page > last_page {
                    debug!(page = self.state.page, last_page, "Page out of range after commit");
                    self.state.page = last_page;
                    self.issue_fetch(context);
                    return;
                }
            }
            Err(e) => {
                warn!(seq = done.seq, error = %e, "Listing fetch failed");
                self.state.last_error = Some(e.to_string());
            }
        }
        self.publish();
    }

    fn observe_session(&mut self, signal: SessionSignal, context: &ListingContext) {
        let previous = self.state.session;
        self.state.session = signal;
        debug!(?previous, current = ?signal, "Session");

        match signal {
            SessionSignal::Present if self.deferred => {
                self.issue_fetch(context);
            }
            SessionSignal::Absent => {
                if previous != SessionSignal::Absent {
                    context.navigator.redirect_to_auth();
                }
                // Reload once a session is back.
                self.deferred = true;
                self.publish();
            }
            _ => self.publish(),
        }
    }
}
