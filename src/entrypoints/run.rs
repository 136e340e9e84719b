use super::metadata::log_version_info;
use crate::app::{ExploreMapApp, settings::Settings};
use crate::explore::NominatimGeocoder;

/// Window title and app id
pub const APP_NAME: &str = "Explore Map";

/// Boxed constructor handed to eframe once the window exists
pub type AppCreator = Box<dyn FnOnce(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>>;

/// Setup and create the app.
///
/// Returns `None` when the configuration is unusable (the reason is logged).
pub async fn setup_app() -> Option<AppCreator> {
    log_version_info();
    let settings = Settings::from_cli();

    let geocoder = match NominatimGeocoder::new(settings.nominatim_config()) {
        Ok(geocoder) => geocoder,
        Err(err) => {
            tracing::error!("Cannot start: {err}");
            return None;
        }
    };

    Some(Box::new(move |cc| {
        Box::new(ExploreMapApp::new(cc, settings, geocoder))
    }))
}

/// Installs the fmt subscriber, honoring `RUST_LOG` when set.
#[cfg(not(target_arch = "wasm32"))]
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,explore_map=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Native entry point
#[cfg(not(target_arch = "wasm32"))]
pub async fn native_main() {
    setup_logging();

    if let Some(app_creator) = setup_app().await {
        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 720.0])
                .with_title(APP_NAME),
            ..Default::default()
        };

        if let Err(err) = eframe::run_native(
            APP_NAME,
            native_options,
            Box::new(move |cc| Ok(app_creator(cc))),
        ) {
            tracing::error!("App exited with an error: {err}");
        }
    }
}
