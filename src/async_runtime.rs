//! Cross-platform task spawning
//!
//! Geocoding lookups run as background tasks: on native they are spawned on the
//! tokio runtime the entry point created, on web they run on the JavaScript event
//! loop through `wasm-bindgen-futures`. Futures only need to be `Send` on native,
//! which [`MaybeSend`] expresses.

use std::future::Future;

/// `Send` on native targets, no bound on web (browser futures are not `Send`)
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send> MaybeSend for T {}

/// `Send` on native targets, no bound on web (browser futures are not `Send`)
#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSend for T {}

/// Spawn a detached task.
///
/// Returns `false` when there is no runtime to run it on (native only), in which
/// case the future is dropped without being polled.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    if !in_runtime_context() {
        tracing::warn!("No async runtime available, dropping task");
        return false;
    }
    tokio::spawn(future);
    true
}

/// Spawn a detached task on the JavaScript event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F) -> bool
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
    true
}

/// Check if we're running inside a tokio runtime context.
#[cfg(not(target_arch = "wasm32"))]
pub fn in_runtime_context() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

/// Always true on web, where the JS event loop drives tasks.
#[cfg(target_arch = "wasm32")]
pub fn in_runtime_context() -> bool {
    true
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_without_runtime_is_rejected() {
        assert!(!in_runtime_context());
        assert!(!spawn(async {}));
    }

    #[tokio::test]
    async fn test_spawn_runs_task() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        assert!(spawn(async move {
            let _ = tx.send(42);
        }));
        assert_eq!(rx.await.unwrap(), 42);
    }
}
