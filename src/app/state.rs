//! Application state management
//!
//! This module holds the state shared between the app and the map plugin (the
//! screen controller and the gesture recognizers) and the UI settings that can
//! be adjusted at runtime.

use crate::app::settings::Settings;
use crate::explore::{MapScreen, PairClickEmulator, TwoFingerDoubleTap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use walkers::{
    TileId,
    sources::{Attribution, TileSource},
};

/// Screen controller plus the input recognizers that feed it
pub struct ExploreState<G> {
    pub screen: MapScreen<G>,
    /// Recognizes the pair gesture from raw touches
    pub two_finger: TwoFingerDoubleTap,
    /// Pair gesture from two secondary clicks (desktop)
    pub pair_clicks: PairClickEmulator,
}

impl<G> ExploreState<G> {
    pub fn new(screen: MapScreen<G>) -> Self {
        Self {
            screen,
            two_finger: TwoFingerDoubleTap::new(),
            pair_clicks: PairClickEmulator::default(),
        }
    }
}

/// State shared between the app and the per-frame map plugin
pub type SharedState<G> = Arc<Mutex<ExploreState<G>>>;

/// Locks the shared state. A panic while holding the lock does not make the
/// state unusable, so poisoning is ignored.
pub fn lock_state<G>(state: &Mutex<ExploreState<G>>) -> MutexGuard<'_, ExploreState<G>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// UI-specific settings that can be adjusted at runtime
#[derive(Clone, Debug)]
pub struct UiSettings {
    /// Map tiles provider
    pub tiles_provider: TilesProvider,

    /// Whether the help window is open
    pub show_help: bool,
}

impl UiSettings {
    pub fn new(settings: &Settings) -> Self {
        Self {
            tiles_provider: settings.tiles,
            show_help: false,
        }
    }
}

/// Available map tile providers
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TilesProvider {
    OpenStreetMap,
    OpenTopoMap,
}

impl TilesProvider {
    pub fn attribution(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "© OpenStreetMap contributors",
            Self::OpenTopoMap => "© OpenTopoMap (CC-BY-SA)",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::OpenStreetMap, Self::OpenTopoMap]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::OpenTopoMap => "OpenTopoMap",
        }
    }
}

/// Custom OpenTopoMap tile source
pub struct OpenTopoMap;

impl TileSource for OpenTopoMap {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://tile.opentopomap.org/{}/{}/{}.png",
            tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: TilesProvider::OpenTopoMap.attribution(),
            url: "https://opentopomap.org/",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        17 // OpenTopoMap has max zoom of 17
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::{Coordinate, GeocodeResult, Geocoder, Placemark, ScreenConfig};
    use crate::async_runtime::MaybeSend;
    use std::future::Future;

    struct NoGeocoder;

    impl Geocoder for NoGeocoder {
        fn reverse_geocode(
            &self,
            _coordinate: Coordinate,
        ) -> impl Future<Output = GeocodeResult<Vec<Placemark>>> + MaybeSend + 'static {
            std::future::ready(Ok(Vec::new()))
        }
    }

    #[test]
    fn test_lock_survives_poisoning() {
        let state: SharedState<NoGeocoder> = Arc::new(Mutex::new(ExploreState::new(
            MapScreen::new(NoGeocoder, ScreenConfig::default()),
        )));

        let poisoner = state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(state.is_poisoned());

        let mut guard = lock_state(&state);
        guard.screen.load(instant::Instant::now());
        assert_eq!(guard.screen.annotations().len(), 1);
    }

    #[test]
    fn test_tiles_provider_names() {
        assert_eq!(TilesProvider::all().len(), 2);
        for provider in TilesProvider::all() {
            assert!(!provider.name().is_empty());
            assert!(provider.attribution().starts_with('©'));
        }
    }

    #[test]
    fn test_open_topo_map_url() {
        let url = OpenTopoMap.tile_url(TileId {
            x: 1,
            y: 2,
            zoom: 3,
        });
        assert_eq!(url, "https://tile.opentopomap.org/3/1/2.png");
    }
}
