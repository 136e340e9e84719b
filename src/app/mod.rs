//! Application module
//!
//! This module provides the main application structure:
//! - Full-screen map view with selectable tiles
//! - Pins dropped by taps, pin pairs with their distance
//! - Notification label describing the map center
//! - Help overlay (F1) with the gestures and runtime settings

mod plugin;
pub(crate) mod settings;
mod state;
mod ui_panels;

use crate::app::plugin::ScreenPlugin;
use crate::app::settings::Settings;
use crate::app::state::{ExploreState, OpenTopoMap, SharedState, TilesProvider, UiSettings, lock_state};
use crate::explore::{MapScreen, NominatimGeocoder, ScreenConfig};
use eframe::egui;
use instant::Instant;
use std::sync::{Arc, Mutex};
use walkers::{HttpTiles, Map, MapMemory, sources::OpenStreetMap};

/// Main application structure
pub struct ExploreMapApp {
    /// Runtime-adjustable UI settings
    ui_settings: UiSettings,

    /// Map tiles provider (OpenStreetMap)
    tiles_osm: HttpTiles,

    /// Map tiles provider (OpenTopoMap)
    tiles_otm: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,

    /// Screen controller and input recognizers, shared with the map plugin
    state: SharedState<NominatimGeocoder>,

    /// Where the map centers when not moved by the user
    home: walkers::Position,
}

impl ExploreMapApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        geocoder: NominatimGeocoder,
    ) -> Self {
        let config = ScreenConfig::default();
        let home = config.home.to_position();

        let mut screen = MapScreen::new(geocoder, config);
        screen.load(Instant::now());

        let mut map_memory = MapMemory::default();
        map_memory.center_at(home);
        if let Err(err) = map_memory.set_zoom(settings.zoom) {
            tracing::warn!("Ignoring zoom {}: {err:?}", settings.zoom);
        }

        tracing::info!(
            "Initialized with {} tiles at zoom {}",
            settings.tiles.name(),
            settings.zoom
        );

        Self {
            ui_settings: UiSettings::new(&settings),
            tiles_osm: HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone()),
            tiles_otm: HttpTiles::new(OpenTopoMap, cc.egui_ctx.clone()),
            map_memory,
            state: Arc::new(Mutex::new(ExploreState::new(screen))),
            home,
        }
    }
}

#[profiling::all_functions]
impl eframe::App for ExploreMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Handle keyboard shortcuts
        ctx.input(|i| {
            if i.key_pressed(egui::Key::F1) || (i.key_pressed(egui::Key::H) && i.modifiers.ctrl) {
                self.ui_settings.show_help = !self.ui_settings.show_help;
            }
        });

        // Follow the camera animation
        if let Some(center) = lock_state(&self.state).screen.camera_position(now) {
            self.map_memory.center_at(center.to_position());
        }

        if self.ui_settings.show_help {
            ui_panels::help_overlay(ctx, &mut self.ui_settings);
        }

        let tiles_provider = self.ui_settings.tiles_provider;

        // Central panel: Map view (full screen)
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");

                let tiles: &mut HttpTiles = match tiles_provider {
                    TilesProvider::OpenStreetMap => &mut self.tiles_osm,
                    TilesProvider::OpenTopoMap => &mut self.tiles_otm,
                };

                let map = Map::new(Some(tiles), &mut self.map_memory, self.home)
                    .with_plugin(ScreenPlugin::new(self.state.clone()));
                ui.add(map);

                ui_panels::attribution(ui, tiles_provider);
                ui_panels::help_button(ui, &mut self.ui_settings.show_help);
            });

        let state = lock_state(&self.state);
        let screen = &state.screen;
        ui_panels::notification_label(ctx, screen.notification().text(), screen.label_frame(now));

        // Keep animating and polling while lookups or animations are in flight
        if screen.is_busy(now) {
            ctx.request_repaint();
        }
    }
}
