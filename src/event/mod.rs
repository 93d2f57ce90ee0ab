//! Event plumbing shared by the settings subscribers and the lint coalescer.
//!
//! Settings changes that cause further settings changes form a cascade. Each
//! subscriber yields back to the runtime after reading an event and after
//! each write, so the writes earlier in the cascade are visible before a
//! later step reads the settings again.

mod debounce;

pub use debounce::AsyncHook;

/// Yields to the runtime once, letting every other ready task run.
pub async fn yield_now() {
    tokio::task::yield_now().await;
}

/// Yields `times` times in a row.
pub async fn settle(times: usize) {
    for _ in 0..times {
        tokio::task::yield_now().await;
    }
}
