mod app;
pub(crate) mod async_runtime;
mod entrypoints;
pub mod explore;

#[cfg(not(target_arch = "wasm32"))]
pub use entrypoints::main::run_native;

// Entry point for Android
#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
fn android_main(app: winit::platform::android::activity::AndroidApp) {
    entrypoints::lib::android_main(app);
}
