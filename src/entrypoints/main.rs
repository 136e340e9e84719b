// === Entry point for desktop ===
/// Runs the app on a multi-threaded tokio runtime until the window closes.
#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "multi_thread")]
pub async fn run_native() {
    super::run::native_main().await;
}
