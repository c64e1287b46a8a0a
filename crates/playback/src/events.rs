//! Bridging the play-loop thread into async consumers.

use std::sync::Arc;

use contracts::{PlaybackCallback, PlaybackUpdate};

/// Build a callback/receiver pair for consuming playback updates from
/// async code (the dispatcher lives on a tokio runtime, the play loop
/// on a plain thread).
///
/// The channel is unbounded so delivery never blocks the paced loop;
/// backpressure is applied downstream by the per-sink queues. Once the
/// receiver is dropped further updates are discarded silently.
pub fn update_channel() -> (PlaybackCallback, async_channel::Receiver<PlaybackUpdate>) {
    let (tx, rx) = async_channel::unbounded();
    let callback: PlaybackCallback = Arc::new(move |update| {
        let _ = tx.send_blocking(update);
    });
    (callback, rx)
}
