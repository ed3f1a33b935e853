//! Single-threaded continuation queue.
//!
//! Work that completes "later" (asset loads) does not touch shared state directly.
//! It enqueues a continuation here, and the frame loop drains the queue between
//! ticks so every tick observes a consistent context.

use std::collections::VecDeque;

/// A deferred mutation of the context `C`.
pub type Continuation<C> = Box<dyn FnOnce(&mut C)>;

/// FIFO of continuations. Not `Send`: everything runs on the frame loop's thread.
pub struct TaskQueue<C> {
    pending: VecDeque<Continuation<C>>,
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TaskQueue<C> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Queue a continuation to run on the next drain.
    pub fn enqueue(&mut self, task: impl FnOnce(&mut C) + 'static) {
        self.pending.push_back(Box::new(task));
    }

    /// Number of continuations waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take everything queued so far, leaving the queue empty.
    ///
    /// Callers run the returned batch against the context; anything those
    /// continuations enqueue lands in the next batch.
    pub fn take_batch(&mut self) -> VecDeque<Continuation<C>> {
        std::mem::take(&mut self.pending)
    }
}

/// Run one batch of continuations stored inside the context itself.
///
/// `queue` projects the context onto its queue. Returns how many ran.
pub fn drain_into<C>(ctx: &mut C, queue: fn(&mut C) -> &mut TaskQueue<C>) -> usize {
    let batch = queue(ctx).take_batch();
    let count = batch.len();
    for task in batch {
        task(ctx);
    }
    if count > 0 {
        log::trace!("Ran {} queued continuation(s)", count);
    }
    count
}
