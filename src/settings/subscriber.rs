use std::future::Future;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{SettingKey, Settings};
use crate::event::yield_now;

/// Runs `handler` for every change of `key` until `cancel` fires or the
/// store goes away.
///
/// The receiver is created before spawning, so no change raised after this
/// call is missed. Each event is followed by a yield before the key is
/// checked, letting writes earlier in a cascade land first.
pub fn spawn_subscriber<F, Fut>(
    settings: &Settings,
    key: SettingKey,
    cancel: CancellationToken,
    mut handler: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut changes = settings.subscribe();
    tokio::spawn(async move {
        loop {
            let change = tokio::select! {
                _ = cancel.cancelled() => break,
                change = changes.recv() => change,
            };
            match change {
                Ok(change) => {
                    yield_now().await;
                    if !change.affects(key) {
                        continue;
                    }
                }
                // Missed changes may include ours; handlers re-read
                // everything anyway.
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(%key, missed, "settings subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
            tracing::debug!(%key, "handling settings change");
            handler().await;
        }
        tracing::debug!(%key, "settings subscriber stopped");
    })
}
