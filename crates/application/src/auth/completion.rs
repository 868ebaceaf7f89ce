//! One-shot completion callbacks.

use std::fmt;

use tokio::sync::oneshot;

/// Callback the SDK hands over with a login or renewal request.
///
/// [`Completion::complete`] consumes the value, so a completion can never be
/// invoked twice.
pub struct Completion {
    callback: Box<dyn FnOnce() + Send + 'static>,
}

impl Completion {
    /// Wrap a callback.
    #[must_use]
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Completion paired with a receiver that resolves once it is invoked.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let completion = Self::new(move || {
            // The SDK may have stopped waiting.
            let _ = tx.send(());
        });
        (completion, rx)
    }

    /// Signal the SDK that the interaction is over.
    pub fn complete(self) {
        (self.callback)();
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

/// Slot holding the completion of the login flow currently on screen.
#[derive(Debug, Default)]
pub(crate) enum PendingCompletion {
    /// No login flow is waiting.
    #[default]
    None,
    /// A login flow is waiting for this completion.
    Awaiting(Completion),
}

impl PendingCompletion {
    /// Store a completion, returning the one it displaced.
    pub(crate) fn replace(&mut self, completion: Completion) -> Option<Completion> {
        std::mem::replace(self, Self::Awaiting(completion)).into_completion()
    }

    /// Clear the slot, returning what it held.
    pub(crate) fn take(&mut self) -> Option<Completion> {
        std::mem::take(self).into_completion()
    }

    pub(crate) const fn is_awaiting(&self) -> bool {
        matches!(self, Self::Awaiting(_))
    }

    fn into_completion(self) -> Option<Completion> {
        match self {
            Self::None => None,
            Self::Awaiting(completion) => Some(completion),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_pending_slot_replace_and_take() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut slot = PendingCompletion::default();
        assert!(!slot.is_awaiting());
        assert!(slot.take().is_none());

        let displaced = slot.replace(Completion::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(displaced.is_none());
        assert!(slot.is_awaiting());

        slot.take().unwrap().complete();
        assert!(!slot.is_awaiting());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_channel_resolves_on_complete() {
        let (completion, rx) = Completion::channel();
        completion.complete();
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn test_channel_errors_when_dropped_uninvoked() {
        let (completion, rx) = Completion::channel();
        drop(completion);
        assert!(rx.await.is_err());
    }
}
