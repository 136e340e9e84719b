//! Walkers plugin connecting the map widget to the screen controller
//!
//! Each frame the plugin converts pointer and touch input into screen events,
//! reports the visible region, applies finished geocode lookups and draws the
//! pins on top of the tiles.

use crate::app::state::{SharedState, lock_state};
use crate::explore::{
    Annotation, Coordinate, Geocoder, MapView, PinStyle, TouchPhase, TouchSample, ease_in_out,
    pin_style,
};
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2, vec2};
use instant::Instant;
use walkers::{MapMemory, Plugin, Projector};

/// Radius of a pin head, in points
const PIN_RADIUS: f32 = 8.0;
/// Distance from the pin tip to the center of its head
const PIN_HEIGHT: f32 = 22.0;
/// Height a pin falls from while dropping
const PIN_DROP_HEIGHT: f32 = 40.0;

/// Screen/geographic conversions through the walkers projector
struct ProjectedView<'a> {
    projector: &'a Projector,
    rect: Rect,
}

impl MapView for ProjectedView<'_> {
    fn coordinate_at(&self, point: Pos2) -> Coordinate {
        self.projector.unproject(point.to_vec2()).into()
    }

    fn center(&self) -> Coordinate {
        self.coordinate_at(self.rect.center())
    }
}

/// Converts an egui touch event into a gesture sample.
fn touch_sample(event: &egui::Event, time: Instant) -> Option<TouchSample> {
    let egui::Event::Touch { id, phase, pos, .. } = event else {
        return None;
    };
    let phase = match phase {
        egui::TouchPhase::Start => TouchPhase::Start,
        egui::TouchPhase::Move => TouchPhase::Move,
        egui::TouchPhase::End => TouchPhase::End,
        egui::TouchPhase::Cancel => TouchPhase::Cancel,
    };
    Some(TouchSample {
        id: id.0,
        phase,
        pos: *pos,
        time,
    })
}

/// Plugin driving the map screen
pub struct ScreenPlugin<G> {
    state: SharedState<G>,
}

impl<G> ScreenPlugin<G> {
    pub fn new(state: SharedState<G>) -> Self {
        Self { state }
    }
}

impl<G: Geocoder> Plugin for ScreenPlugin<G> {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        map_memory: &MapMemory,
    ) {
        profiling::scope!("ScreenPlugin::run");

        let now = Instant::now();
        let view = ProjectedView {
            projector,
            rect: response.rect,
        };
        let mut guard = lock_state(&self.state);
        let state = &mut *guard;

        // Two-finger double tap
        let touches: Vec<TouchSample> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|event| touch_sample(event, now))
                .collect()
        });
        for sample in touches {
            if let Some(points) = state.two_finger.feed(sample) {
                state.screen.two_finger_tap(points, &view, now);
            }
        }

        // Single tap
        if response.clicked()
            && !state.two_finger.suppresses_single_tap(now)
            && let Some(pos) = response.interact_pointer_pos()
        {
            state.screen.tap(pos, &view, now);
        }

        // Pair from two secondary clicks
        if response.secondary_clicked()
            && let Some(pos) = response.interact_pointer_pos()
            && let Some(points) = state.pair_clicks.secondary_click(pos)
        {
            state.screen.two_finger_tap(points, &view, now);
        }
        if response.dragged() {
            state.pair_clicks.cancel();
        }

        let interacting = response.dragged()
            || response.is_pointer_button_down_on()
            || ui.input(|i| i.any_touches());
        state
            .screen
            .observe_region(view.center(), map_memory.zoom(), interacting, now);

        state.screen.poll_replies(now);

        profiling::scope!("draw_pins");
        let painter = ui.painter_at(response.rect);
        let hover = response.hover_pos();
        let mut hovered = None;
        for annotation in state.screen.annotations() {
            let style = pin_style(annotation);
            let head = draw_pin(&painter, projector, annotation, &style, now);
            if hover.is_some_and(|pos| pos.distance(head) <= PIN_RADIUS + 2.0) {
                hovered = Some((annotation, style, head));
            }
        }
        if let Some(pending) = state.pair_clicks.pending() {
            painter.circle_stroke(pending, PIN_RADIUS, Stroke::new(2.0, Color32::WHITE));
        }
        if let Some((annotation, style, head)) = hovered
            && style.shows_callout
        {
            draw_callout(&painter, annotation, &style, head);
        }
    }
}

/// Draws a pin and returns the center of its head.
fn draw_pin(
    painter: &egui::Painter,
    projector: &Projector,
    annotation: &Annotation,
    style: &PinStyle,
    now: Instant,
) -> Pos2 {
    let tip = projector.project(annotation.coordinate.to_position()).to_pos2();
    let fall = if style.animates_drop {
        (1.0 - ease_in_out(annotation.drop_progress(now))) * PIN_DROP_HEIGHT
    } else {
        0.0
    };
    let head = tip - vec2(0.0, PIN_HEIGHT + fall);

    painter.circle_filled(tip, 2.5, Color32::from_black_alpha(90));
    painter.line_segment(
        [head, tip - vec2(0.0, fall)],
        Stroke::new(2.0, style.tint.gamma_multiply(0.8)),
    );
    painter.circle(head, PIN_RADIUS, style.tint, Stroke::new(1.5, Color32::WHITE));
    head
}

/// Title, subtitle and icon bubble above a pin head
fn draw_callout(painter: &egui::Painter, annotation: &Annotation, style: &PinStyle, head: Pos2) {
    let title = painter.layout_no_wrap(
        annotation.title.clone(),
        FontId::proportional(14.0),
        Color32::BLACK,
    );
    let subtitle = annotation.subtitle.as_ref().map(|subtitle| {
        painter.layout_no_wrap(
            subtitle.clone(),
            FontId::proportional(12.0),
            Color32::DARK_GRAY,
        )
    });
    let icon = style.icon.map(|icon| {
        painter.layout_no_wrap(
            icon.glyph().to_string(),
            FontId::proportional(22.0),
            style.tint,
        )
    });

    let padding = 6.0;
    let icon_width = icon.as_ref().map_or(0.0, |g| g.size().x + padding);
    let text_width = title
        .size()
        .x
        .max(subtitle.as_ref().map_or(0.0, |g| g.size().x));
    let text_height = title.size().y + subtitle.as_ref().map_or(0.0, |g| g.size().y);
    let size = vec2(icon_width + text_width, text_height) + Vec2::splat(2.0 * padding);

    let bottom = head - vec2(0.0, PIN_RADIUS + 6.0);
    let rect = Align2::CENTER_BOTTOM.anchor_size(bottom, size);
    painter.rect_filled(rect, 6.0, Color32::from_white_alpha(235));

    let mut cursor = rect.min + Vec2::splat(padding);
    if let Some(icon) = icon {
        let y = rect.center().y - icon.size().y / 2.0;
        let width = icon.size().x;
        painter.galley(Pos2::new(cursor.x, y), icon, style.tint);
        cursor.x += width + padding;
    }
    let title_height = title.size().y;
    painter.galley(cursor, title, Color32::BLACK);
    if let Some(subtitle) = subtitle {
        painter.galley(cursor + vec2(0.0, title_height), subtitle, Color32::DARK_GRAY);
    }
}
