//! The three feed streams and their commit protocol.
//!
//! Each stream is an independently-lifecycled ordered sequence of records
//! with its own loading guard and a monotonic generation. A load follows a
//! ticket protocol: [`FeedStore::begin_load`] flips the guard and hands out
//! a [`LoadTicket`]; the pipeline later commits or aborts with it. A commit
//! whose ticket generation is stale (the stream was cleared or a newer load
//! began) is discarded: last request wins.

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::debug;

use crate::domain::ArticleRecord;

/// One of the three independently-lifecycled streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Random discovery feed; append-only for the life of the session.
    Main,
    /// Keyword results; replaced wholesale per submitted term.
    Search,
    /// Related-articles overlay; replaced per selection, cleared on dismiss.
    Related,
}

#[derive(Default)]
struct StreamState {
    records: Vec<ArticleRecord>,
    loading: bool,
    generation: u64,
}

/// Proof that a load was admitted for a stream. Not cloneable; a ticket is
/// consumed by exactly one commit or abort.
#[derive(Debug)]
pub struct LoadTicket {
    kind: StreamKind,
    generation: u64,
}

impl LoadTicket {
    pub fn kind(&self) -> StreamKind {
        self.kind
    }
}

/// Explicit state container for the three streams, with a watch-channel
/// revision counter as the subscribe/notify mechanism for a presentation
/// layer.
pub struct FeedStore {
    main: Mutex<StreamState>,
    search: Mutex<StreamState>,
    related: Mutex<StreamState>,
    revision: watch::Sender<u64>,
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            main: Mutex::default(),
            search: Mutex::default(),
            related: Mutex::default(),
            revision,
        }
    }

    fn cell(&self, kind: StreamKind) -> &Mutex<StreamState> {
        match kind {
            StreamKind::Main => &self.main,
            StreamKind::Search => &self.search,
            StreamKind::Related => &self.related,
        }
    }

    fn lock(&self, kind: StreamKind) -> std::sync::MutexGuard<'_, StreamState> {
        self.cell(kind).lock().expect("stream lock poisoned")
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Snapshot of a stream's current records.
    pub fn records(&self, kind: StreamKind) -> Vec<ArticleRecord> {
        self.lock(kind).records.clone()
    }

    pub fn len(&self, kind: StreamKind) -> usize {
        self.lock(kind).records.len()
    }

    pub fn is_empty(&self, kind: StreamKind) -> bool {
        self.len(kind) == 0
    }

    pub fn is_loading(&self, kind: StreamKind) -> bool {
        self.lock(kind).loading
    }

    /// Receiver on a revision counter bumped on every visible state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Admit a load for `kind`. Returns `None` while the stream is already
    /// loading: single request in flight per stream.
    pub fn begin_load(&self, kind: StreamKind) -> Option<LoadTicket> {
        let mut state = self.lock(kind);
        if state.loading {
            return None;
        }
        state.loading = true;
        state.generation += 1;
        let ticket = LoadTicket {
            kind,
            generation: state.generation,
        };
        drop(state);
        self.bump();
        Some(ticket)
    }

    /// Append records in arrival order. Returns false (and mutates nothing)
    /// when the ticket is stale.
    pub fn commit_append(&self, ticket: LoadTicket, records: Vec<ArticleRecord>) -> bool {
        let mut state = self.lock(ticket.kind);
        if state.generation != ticket.generation {
            debug!("Discarding stale append for {:?} stream", ticket.kind);
            return false;
        }
        state.loading = false;
        state.records.extend(records);
        drop(state);
        self.bump();
        true
    }

    /// Replace the whole sequence atomically. Returns false (and mutates
    /// nothing) when the ticket is stale.
    pub fn commit_replace(&self, ticket: LoadTicket, records: Vec<ArticleRecord>) -> bool {
        let mut state = self.lock(ticket.kind);
        if state.generation != ticket.generation {
            debug!("Discarding stale replace for {:?} stream", ticket.kind);
            return false;
        }
        state.loading = false;
        state.records = records;
        drop(state);
        self.bump();
        true
    }

    /// Clear the guard after a failed load, leaving the records untouched.
    pub fn abort(&self, ticket: LoadTicket) {
        let mut state = self.lock(ticket.kind);
        if state.generation != ticket.generation {
            debug!("Ignoring stale abort for {:?} stream", ticket.kind);
            return;
        }
        state.loading = false;
        drop(state);
        self.bump();
    }

    /// Drop a stream's records and invalidate any in-flight ticket for it.
    pub fn clear(&self, kind: StreamKind) {
        let mut state = self.lock(kind);
        state.records.clear();
        state.generation += 1;
        state.loading = false;
        drop(state);
        self.bump();
    }
}
