//! Utilities for declaring an async (usually debounced) hook

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Async hooks run as a background tokio task that waits for events sent
/// through a channel. Each event can be consumed immediately or debounced;
/// when a debounce deadline passes without further events,
/// [`AsyncHook::finish_debounce`] runs.
pub trait AsyncHook: Send + 'static + Sized {
    type Event: Send + 'static;

    /// Called whenever an event is received. Returns the new debounce
    /// deadline, or `timeout` to keep the current one, or `None` to clear it.
    fn handle_event(&mut self, event: Self::Event, timeout: Option<Instant>) -> Option<Instant>;

    /// Called whenever the debounce deadline is reached.
    fn finish_debounce(&mut self);

    /// Spawns the hook on the current runtime.
    ///
    /// Returns `None` for the handle outside a runtime so unrelated unit
    /// tests don't need one; events sent then are simply dropped.
    fn spawn(self) -> (mpsc::UnboundedSender<Self::Event>, Option<JoinHandle<()>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::runtime::Handle::try_current()
            .ok()
            .map(|runtime| runtime.spawn(run(self, rx)));
        (tx, handle)
    }
}

async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: mpsc::UnboundedReceiver<Hook::Event>) {
    let mut deadline = None;
    loop {
        let event = match deadline {
            Some(deadline_) => match tokio::time::timeout_at(deadline_, rx.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    hook.finish_debounce();
                    deadline = None;
                    continue;
                }
            },
            None => rx.recv().await,
        };
        let Some(event) = event else {
            break;
        };
        deadline = hook.handle_event(event, deadline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counter {
        fired: Arc<AtomicUsize>,
    }

    impl AsyncHook for Counter {
        type Event = ();

        fn handle_event(&mut self, _: (), _: Option<Instant>) -> Option<Instant> {
            Some(Instant::now() + Duration::from_millis(100))
        }

        fn finish_debounce(&mut self) {
            self.fired.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_trailing_edge() {
        let fired = Arc::new(AtomicUsize::new(0));
        let (tx, _handle) = Counter { fired: fired.clone() }.spawn();

        for _ in 0..5 {
            tx.send(()).unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_spawn_outside_runtime() {
        let fired = Arc::new(AtomicUsize::new(0));
        let (tx, handle) = Counter { fired }.spawn();
        assert!(handle.is_none());
        // receiver was dropped with the hook
        assert!(tx.send(()).is_err());
    }
}
