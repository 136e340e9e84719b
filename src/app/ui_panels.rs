//! UI panels drawn over the map

use crate::app::state::{TilesProvider, UiSettings};
use crate::explore::LabelFrame;
use egui::{Align2, Color32, RichText, Ui};

/// Gap between the resting notification label and the bottom edge
const LABEL_MARGIN: f32 = 48.0;
/// Distance the label travels from below the visible area
const LABEL_TRAVEL: f32 = 120.0;

/// Notification label at the bottom center of the map.
pub fn notification_label(ctx: &egui::Context, text: &str, frame: LabelFrame) {
    if frame.alpha <= 0.0 || text.is_empty() {
        return;
    }
    let y = -LABEL_MARGIN + frame.offset * (LABEL_MARGIN + LABEL_TRAVEL);

    egui::Area::new(egui::Id::new("notification_label"))
        .anchor(Align2::CENTER_BOTTOM, [0.0, y])
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_opacity(frame.alpha);
            egui::Frame::new()
                .fill(Color32::from_black_alpha(200))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(14, 8))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(text)
                            .color(Color32::WHITE)
                            .size(16.0),
                    );
                });
        });
}

/// Round "?" button in the top-right corner
pub fn help_button(ui: &mut Ui, show_help: &mut bool) {
    let rect = ui.max_rect();
    let button_rect =
        Align2::RIGHT_TOP.anchor_size(rect.right_top() + egui::vec2(-12.0, 12.0), [32.0, 32.0].into());
    let button = egui::Button::new(RichText::new("?").size(18.0)).corner_radius(16.0);
    if ui
        .put(button_rect, button)
        .on_hover_text("Help (F1)")
        .clicked()
    {
        *show_help = !*show_help;
    }
}

/// Help overlay with the gestures and the runtime settings
pub fn help_overlay(ctx: &egui::Context, ui_settings: &mut UiSettings) {
    let mut open = ui_settings.show_help;
    egui::Window::new("Help")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading("Explore Map");
            ui.add_space(8.0);

            ui.label(RichText::new("Pins").strong());
            ui.label("• Tap or click the map to drop a pin named after the place");
            ui.label("• Hover a pin to see its callout");
            ui.add_space(8.0);

            ui.label(RichText::new("Distance").strong());
            ui.label("• Double tap with two fingers to drop Point A and Point B");
            ui.label("• On desktop, right click twice instead");
            ui.add_space(8.0);

            ui.label(RichText::new("Navigation").strong());
            ui.label("• Drag to pan, scroll or pinch to zoom");
            ui.label("• The map center is described when the map stops moving");
            ui.add_space(8.0);

            ui.label(RichText::new("Map tiles").strong());
            egui::ComboBox::from_id_salt("tiles_provider")
                .selected_text(ui_settings.tiles_provider.name())
                .show_ui(ui, |ui| {
                    for provider in TilesProvider::all() {
                        ui.selectable_value(
                            &mut ui_settings.tiles_provider,
                            *provider,
                            provider.name(),
                        );
                    }
                });
            ui.add_space(8.0);

            ui.collapsing("Profiling", |ui| {
                crate::entrypoints::profiling::profiling_ui(ui);
            });
            ui.add_space(8.0);
            ui.label(RichText::new("Keyboard Shortcuts").strong());
            ui.label("• F1 or Ctrl+H - Toggle this help");
        });
    ui_settings.show_help = open;
}

/// Tile attribution along the bottom edge
pub fn attribution(ui: &Ui, provider: TilesProvider) {
    let rect = ui.max_rect();
    ui.painter().text(
        rect.center_bottom() + egui::vec2(0.0, -5.0),
        Align2::CENTER_BOTTOM,
        provider.attribution(),
        egui::FontId::proportional(10.0),
        Color32::from_black_alpha(180),
    );
}
