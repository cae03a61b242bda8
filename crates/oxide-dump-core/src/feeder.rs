//! Chunk feeder.
//!
//! Queues chunks as they arrive from an I/O source and drives them through a
//! [`StatementSplitter`] one at a time. Parser state carries over between
//! chunks, so chunk boundaries never change the emitted statements.

use std::collections::VecDeque;
use std::fmt;

use crate::splitter::StatementSplitter;

/// Callback fired once the chunk queue is empty.
pub type DrainedHandler = Box<dyn FnOnce() + Send>;

/// Feeds queued chunks into a splitter in arrival order.
pub struct ChunkFeeder {
    splitter: StatementSplitter,
    pending: VecDeque<String>,
    draining: bool,
    drained: Vec<DrainedHandler>,
}

impl ChunkFeeder {
    /// Creates a feeder driving `splitter`.
    #[must_use]
    pub fn new(splitter: StatementSplitter) -> Self {
        Self {
            splitter,
            pending: VecDeque::new(),
            draining: false,
            drained: Vec::new(),
        }
    }

    /// Queues a chunk and drains the queue unless a drain is running.
    pub fn enqueue(&mut self, chunk: impl Into<String>) {
        self.push_chunk(chunk);
        if !self.draining {
            self.drain();
        }
    }

    /// Queues a chunk without draining.
    pub fn push_chunk(&mut self, chunk: impl Into<String>) {
        self.pending.push_back(chunk.into());
    }

    /// Processes queued chunks until the queue is empty, then fires the
    /// drained handlers in registration order.
    pub fn drain(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;

        while let Some(chunk) = self.pending.pop_front() {
            for c in chunk.chars() {
                self.splitter.feed_char(c);
            }
        }

        self.draining = false;
        for handler in std::mem::take(&mut self.drained) {
            handler();
        }
    }

    /// Registers a completion handler.
    ///
    /// Fires immediately when the feeder is already idle, otherwise after the
    /// next drain empties the queue.
    pub fn on_drained<F>(&mut self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_idle() {
            handler();
        } else {
            self.drained.push(Box::new(handler));
        }
    }

    /// True when no chunk is queued and no drain is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.draining && self.pending.is_empty()
    }

    /// Number of chunks waiting to be processed.
    #[must_use]
    pub fn pending_chunks(&self) -> usize {
        self.pending.len()
    }

    /// The driven splitter.
    #[must_use]
    pub const fn splitter(&self) -> &StatementSplitter {
        &self.splitter
    }

    /// Mutable access to the driven splitter.
    pub fn splitter_mut(&mut self) -> &mut StatementSplitter {
        &mut self.splitter
    }

    /// Consumes the feeder. Queued chunks and unfired handlers are dropped.
    #[must_use]
    pub fn into_splitter(self) -> StatementSplitter {
        self.splitter
    }
}

impl fmt::Debug for ChunkFeeder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkFeeder")
            .field("splitter", &self.splitter)
            .field("pending", &self.pending.len())
            .field("draining", &self.draining)
            .field("drained_handlers", &self.drained.len())
            .finish()
    }
}
