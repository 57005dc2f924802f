//! Bounded undo/redo history of full scene snapshots.
//!
//! DESIGN
//! ======
//! Every logical edit commits a serialized copy of the whole scene. The
//! history is linear: committing after an undo drops the redo branch. The
//! stack is capped and evicts oldest-first.
//!
//! Restoring is a two-step handshake. `undo`/`redo` hand back the snapshot to
//! reload and open a pending restoration; the index only moves once the host
//! confirms the reload with `finish_restore`. While a restoration is pending
//! every other history write is rejected with `EditorError::Busy`, so an
//! in-flight restore can never interleave with a commit or a second undo.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::debug;

use crate::consts::DEFAULT_HISTORY_LIMIT;
use crate::doc::Scene;
use crate::error::EditorError;

/// Immutable serialized copy of a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    json: String,
}

impl Snapshot {
    /// Serialize `scene`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be encoded as JSON.
    pub fn capture(scene: &Scene) -> Result<Self, serde_json::Error> {
        Ok(Self { json: serde_json::to_string(scene)? })
    }

    /// Rebuild the scene this snapshot was captured from.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored JSON does not decode to a scene.
    pub fn restore(&self) -> Result<Scene, serde_json::Error> {
        serde_json::from_str(&self.json)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.json
    }
}

/// Externally visible shape of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    /// Nothing committed yet.
    Empty,
    /// At least one entry; the payload is the current index.
    Ready(usize),
}

/// Linear, bounded snapshot history.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<Snapshot>,
    index: usize,
    limit: usize,
    pending: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history holding at most `limit` entries (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { entries: VecDeque::new(), index: 0, limit: limit.max(1), pending: None }
    }

    #[must_use]
    pub fn state(&self) -> HistoryState {
        if self.entries.is_empty() {
            HistoryState::Empty
        } else {
            HistoryState::Ready(self.index)
        }
    }

    /// Authoritative current index, if any entry exists.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.state() {
            HistoryState::Empty => None,
            HistoryState::Ready(i) => Some(i),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Snapshot at the current index.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.index().and_then(|i| self.entries.get(i))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.pending.is_none() && !self.entries.is_empty() && self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && self.index + 1 < self.entries.len()
    }

    /// Whether an undo/redo is waiting for `finish_restore`.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.pending.is_some()
    }

    /// Append a snapshot after the current index and make it current.
    ///
    /// Entries after the current index are discarded first; the oldest entry
    /// is evicted when the limit is exceeded. Returns the new index.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration is pending.
    pub fn commit(&mut self, snapshot: Snapshot) -> Result<usize, EditorError> {
        if self.pending.is_some() {
            return Err(EditorError::Busy);
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
        debug!(index = self.index, len = self.entries.len(), "history: commit");
        Ok(self.index)
    }

    /// Begin restoring the previous entry and return it.
    ///
    /// # Errors
    ///
    /// `NoHistory` at the oldest entry, `Busy` while a restoration is pending.
    pub fn undo(&mut self) -> Result<Snapshot, EditorError> {
        if self.pending.is_some() {
            return Err(EditorError::Busy);
        }
        if self.entries.is_empty() || self.index == 0 {
            return Err(EditorError::NoHistory);
        }
        self.begin_restore(self.index - 1)
    }

    /// Begin restoring the next entry and return it.
    ///
    /// # Errors
    ///
    /// `NoHistory` at the newest entry, `Busy` while a restoration is pending.
    pub fn redo(&mut self) -> Result<Snapshot, EditorError> {
        if self.pending.is_some() {
            return Err(EditorError::Busy);
        }
        if self.index + 1 >= self.entries.len() {
            return Err(EditorError::NoHistory);
        }
        self.begin_restore(self.index + 1)
    }

    fn begin_restore(&mut self, target: usize) -> Result<Snapshot, EditorError> {
        let snapshot = self.entries.get(target).cloned().ok_or(EditorError::NoHistory)?;
        self.pending = Some(target);
        debug!(from = self.index, to = target, "history: restore started");
        Ok(snapshot)
    }

    /// Confirm the pending restoration and move the index to its target.
    ///
    /// Returns the new index, or `None` when nothing was pending.
    pub fn finish_restore(&mut self) -> Option<usize> {
        let target = self.pending.take()?;
        self.index = target;
        debug!(index = target, "history: restore finished");
        Some(target)
    }

    /// Drop a pending restoration without moving the index.
    pub fn abort_restore(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
