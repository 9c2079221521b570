//! Progress-callback trait for per-chunk comparison events.
//!
//! Inject an [`Arc<dyn CompareProgressCallback>`] via
//! [`crate::config::CompareConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through chunk pairs.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a WebSocket, or a terminal progress bar
//! without the library knowing how the host application communicates. Chunk
//! pairs are processed strictly sequentially, so implementations will never
//! see concurrent calls — the `Send + Sync` bound exists only because the
//! callback is shared via `Arc` across `await` points.

use std::sync::Arc;

/// Called by the comparison pipeline as it works through chunks.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `total_chunks` is the larger of the two documents'
/// chunk counts: aligned pairs plus leftover chunks.
pub trait CompareProgressCallback: Send + Sync {
    /// Called once after chunking, before any model call.
    fn on_compare_start(&self, total_chunks: usize) {
        let _ = total_chunks;
    }

    /// Called just before the model request for an aligned chunk pair.
    ///
    /// `chunk_num` is 1-indexed.
    fn on_chunk_start(&self, chunk_num: usize, total_chunks: usize) {
        let _ = (chunk_num, total_chunks);
    }

    /// Called when a chunk pair compares successfully.
    fn on_chunk_complete(&self, chunk_num: usize, total_chunks: usize, section_count: usize) {
        let _ = (chunk_num, total_chunks, section_count);
    }

    /// Called when a chunk pair's comparison fails.
    fn on_chunk_error(&self, chunk_num: usize, total_chunks: usize, error: &str) {
        let _ = (chunk_num, total_chunks, error);
    }

    /// Called for each leftover chunk classified wholesale as added or
    /// deleted (no model call involved).
    fn on_chunk_leftover(&self, chunk_num: usize, total_chunks: usize, added: bool) {
        let _ = (chunk_num, total_chunks, added);
    }

    /// Called once after all chunks have been handled, before synthesis.
    fn on_compare_complete(&self, total_chunks: usize, error_count: usize) {
        let _ = (total_chunks, error_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CompareProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CompareConfig`].
pub type ProgressCallback = Arc<dyn CompareProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        leftovers: AtomicUsize,
    }

    impl CompareProgressCallback for TrackingCallback {
        fn on_chunk_start(&self, _chunk_num: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_chunk_complete(&self, _chunk_num: usize, _total: usize, _sections: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_chunk_error(&self, _chunk_num: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_chunk_leftover(&self, _chunk_num: usize, _total: usize, _added: bool) {
            self.leftovers.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_compare_start(5);
        cb.on_chunk_start(1, 5);
        cb.on_chunk_complete(1, 5, 3);
        cb.on_chunk_error(2, 5, "some error");
        cb.on_chunk_leftover(4, 5, true);
        cb.on_compare_complete(5, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            leftovers: AtomicUsize::new(0),
        };

        tracker.on_chunk_start(1, 3);
        tracker.on_chunk_complete(1, 3, 4);
        tracker.on_chunk_start(2, 3);
        tracker.on_chunk_error(2, 3, "model timeout");
        tracker.on_chunk_leftover(3, 3, true);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.leftovers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn CompareProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_compare_start(10);
        cb.on_chunk_start(1, 10);
        cb.on_chunk_complete(1, 10, 2);
    }
}
