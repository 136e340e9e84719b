use crate::app::state::TilesProvider;
use crate::entrypoints::cli::parse_args;
use crate::explore::NominatimConfig;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Explore Map - Drop geocoded pins and measure great-circle distances on a slippy map
pub struct Settings {
    /// Base URL of a Nominatim-compatible reverse geocoding service
    #[clap(long, default_value = "https://nominatim.openstreetmap.org")]
    pub geocoder_url: String,

    /// Timeout of a single reverse geocoding request, in seconds (native only)
    #[clap(long, default_value = "10")]
    pub geocoder_timeout_secs: u64,

    /// User-Agent sent to the geocoding service
    #[clap(long, default_value = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// Preferred language of place names (e.g. "en", "fr")
    #[clap(long)]
    pub language: Option<String>,

    /// Initial map zoom level
    #[clap(long, default_value = "12.0")]
    pub zoom: f64,

    /// Map tiles provider
    #[clap(long, value_enum, default_value_t = TilesProvider::OpenStreetMap)]
    pub tiles: TilesProvider,
}

impl Settings {
    /// Parse the settings, exiting on bad arguments (native) or using defaults (web).
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => {
                #[cfg(not(target_arch = "wasm32"))]
                e.exit();
                #[cfg(target_arch = "wasm32")]
                {
                    let user_msg = format!(
                        "Error parsing CLI:\n{e}\n
You should change the GET params, using the cli prefix.\n
Starting anyway without args."
                    );
                    if let Some(window) = web_sys::window() {
                        window.alert_with_message(&user_msg).unwrap_or(());
                    } else {
                        tracing::error!(user_msg);
                    }
                    Settings::parse_from([env!("CARGO_PKG_NAME")]) // Default args on web if parsing fails
                }
            }
        }
    }

    /// Geocoder connection settings
    pub fn nominatim_config(&self) -> NominatimConfig {
        NominatimConfig {
            base_url: self.geocoder_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.geocoder_timeout_secs),
            language: self.language.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["explore-map"]);
        assert_eq!(settings.geocoder_url, "https://nominatim.openstreetmap.org");
        assert_eq!(settings.geocoder_timeout_secs, 10);
        assert_eq!(settings.zoom, 12.0);
        assert_eq!(settings.tiles, TilesProvider::OpenStreetMap);
        assert!(settings.user_agent.starts_with("explore-map/"));
        assert!(settings.language.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::parse_from([
            "explore-map",
            "--geocoder-url",
            "http://localhost:8080",
            "--geocoder-timeout-secs",
            "3",
            "--language",
            "fr",
            "--zoom",
            "5",
            "--tiles",
            "open-topo-map",
        ]);
        assert_eq!(settings.tiles, TilesProvider::OpenTopoMap);
        assert_eq!(settings.zoom, 5.0);

        let config = settings.nominatim_config();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.language.as_deref(), Some("fr"));
        assert_eq!(config.zoom, NominatimConfig::default().zoom);
    }

    #[test]
    fn test_unknown_tiles_rejected() {
        assert!(Settings::try_parse_from(["explore-map", "--tiles", "cyclosm"]).is_err());
    }
}
