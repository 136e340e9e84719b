//! Map screen controller
//!
//! [`MapScreen`] reacts to the three input events of the screen (settled region,
//! single tap, two-finger double tap) and owns everything they produce: the
//! annotations, the current pair color, the notification label and the camera
//! animation. Geocode lookups are spawned on the async runtime and their replies
//! come back through a channel, applied by [`MapScreen::poll_replies`] every frame.
//!
//! Replies are never cancelled. Tap replies always add their annotation. Region
//! replies older than the newest region request are dropped, so the notification
//! describes the latest settled region.

use crate::async_runtime;
use crate::explore::animation::CameraAnimation;
use crate::explore::annotation::random_pin_color;
use crate::explore::distance::{distance_message, distance_meters};
use crate::explore::geocode::{GeocodeError, GeocodeResult, region_message, tap_labels};
use crate::explore::notification::{LabelFrame, NotificationLabel, NotificationTiming};
use crate::explore::{Annotation, Coordinate, Geocoder, PinColor, PinRole, Placemark};
use egui::Pos2;
use instant::{Duration, Instant};
use tokio::sync::mpsc;

/// Conversion services provided by the map widget
pub trait MapView {
    /// Geographic coordinate under a screen point
    fn coordinate_at(&self, point: Pos2) -> Coordinate;

    /// Coordinate at the center of the visible map
    fn center(&self) -> Coordinate;
}

/// Fixed parameters of the screen
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Where the home pin is placed and the map first centers
    pub home: Coordinate,
    pub home_title: String,
    pub home_subtitle: String,
    /// How long the camera takes to center on a tapped location
    pub camera_duration: Duration,
    pub notification: NotificationTiming,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            home: Coordinate::new(49.263570, -123.138570),
            home_title: "Vancouver".to_string(),
            home_subtitle: "Canada".to_string(),
            camera_duration: Duration::from_millis(1500),
            notification: NotificationTiming::default(),
        }
    }
}

/// What a geocode lookup was started for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeRequest {
    /// Describe the map center; `sequence` orders region requests
    Region { sequence: u64 },
    /// Label the pin to be dropped at `coordinate`
    Tap { coordinate: Coordinate },
}

/// A finished geocode lookup
#[derive(Debug)]
pub struct GeocodeReply {
    pub request: GeocodeRequest,
    pub result: GeocodeResult<Vec<Placemark>>,
}

const CENTER_EPSILON: f64 = 1e-7;
const ZOOM_EPSILON: f64 = 1e-3;

/// Turns per-frame map state into "region did change" events.
///
/// A region is reported once it has been stable for one observation, differs
/// from the last reported one, and the user is not interacting with the map.
#[derive(Debug, Clone, Default)]
pub struct RegionTracker {
    last_seen: Option<(Coordinate, f64)>,
    last_reported: Option<(Coordinate, f64)>,
}

impl RegionTracker {
    fn same(a: (Coordinate, f64), b: (Coordinate, f64)) -> bool {
        a.0.approx_eq(&b.0, CENTER_EPSILON) && (a.1 - b.1).abs() <= ZOOM_EPSILON
    }

    /// Returns true when `center`/`zoom` is a newly settled region.
    pub fn observe(&mut self, center: Coordinate, zoom: f64, interacting: bool) -> bool {
        let region = (center, zoom);
        let stable = self
            .last_seen
            .is_some_and(|seen| Self::same(seen, region));
        self.last_seen = Some(region);

        if !stable || interacting {
            return false;
        }
        if self
            .last_reported
            .is_some_and(|reported| Self::same(reported, region))
        {
            return false;
        }
        self.last_reported = Some(region);
        true
    }

    /// True while the last observed region has not been reported yet. One more
    /// observation is needed to confirm it.
    pub fn is_settling(&self) -> bool {
        match (self.last_seen, self.last_reported) {
            (Some(seen), Some(reported)) => !Self::same(seen, reported),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// The map screen controller
pub struct MapScreen<G> {
    geocoder: G,
    config: ScreenConfig,
    annotations: Vec<Annotation>,
    next_annotation_id: u64,
    pair_color: Option<PinColor>,
    notification: NotificationLabel,
    camera: Option<CameraAnimation>,
    region_tracker: RegionTracker,
    /// Sequence number of the newest region request
    region_sequence: u64,
    /// Lookups spawned but not applied yet
    pending: usize,
    replies_tx: mpsc::UnboundedSender<GeocodeReply>,
    replies_rx: mpsc::UnboundedReceiver<GeocodeReply>,
    loaded: bool,
}

impl<G: Geocoder> MapScreen<G> {
    pub fn new(geocoder: G, config: ScreenConfig) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        let notification = NotificationLabel::new(config.notification);
        Self {
            geocoder,
            config,
            annotations: Vec::new(),
            next_annotation_id: 0,
            pair_color: None,
            notification,
            camera: None,
            region_tracker: RegionTracker::default(),
            region_sequence: 0,
            pending: 0,
            replies_tx,
            replies_rx,
            loaded: false,
        }
    }

    /// Places the home pin, centers the map on it and hides the notification label.
    pub fn load(&mut self, now: Instant) {
        if self.loaded {
            tracing::warn!("Map screen already loaded");
            return;
        }
        self.loaded = true;

        let home = Annotation {
            id: self.next_id(),
            coordinate: self.config.home,
            title: self.config.home_title.clone(),
            subtitle: Some(self.config.home_subtitle.clone()),
            color_tag: Some(random_pin_color()),
            role: PinRole::Home,
            added_at: now,
        };
        tracing::info!(
            "Loaded map screen at {} ({:.6}, {:.6})",
            home.title,
            home.coordinate.latitude,
            home.coordinate.longitude
        );
        self.annotations.push(home);
        self.camera = Some(CameraAnimation::jump(self.config.home, now));
        self.notification = NotificationLabel::new(self.config.notification);
    }

    /// Feeds the visible region of the current frame; starts a region lookup when it settles.
    pub fn observe_region(
        &mut self,
        center: Coordinate,
        zoom: f64,
        interacting: bool,
        now: Instant,
    ) -> bool {
        let interacting = interacting || self.is_camera_moving(now);
        if self.region_tracker.observe(center, zoom, interacting) {
            self.region_changed(center, now);
            true
        } else {
            false
        }
    }

    /// Describes the new map center in a notification once geocoding finishes.
    pub fn region_changed(&mut self, center: Coordinate, _now: Instant) {
        profiling::scope!("MapScreen::region_changed");
        self.region_sequence += 1;
        tracing::debug!(
            "Region #{} settled at ({:.5}, {:.5})",
            self.region_sequence,
            center.latitude,
            center.longitude
        );
        self.request_geocode(
            center,
            GeocodeRequest::Region {
                sequence: self.region_sequence,
            },
        );
    }

    /// Single tap: drops a geocoded pin at the tapped location and moves the camera there.
    ///
    /// The pin appears when geocoding finishes; the camera starts moving right away.
    pub fn tap(&mut self, point: Pos2, view: &impl MapView, now: Instant) -> Coordinate {
        profiling::scope!("MapScreen::tap");
        let coordinate = view.coordinate_at(point);
        tracing::debug!(
            "Tap at ({:.1}, {:.1}) -> ({:.5}, {:.5})",
            point.x,
            point.y,
            coordinate.latitude,
            coordinate.longitude
        );
        self.request_geocode(coordinate, GeocodeRequest::Tap { coordinate });

        let from = self
            .camera
            .map(|camera| camera.sample(now))
            .unwrap_or_else(|| view.center());
        self.camera = Some(CameraAnimation::new(
            from,
            coordinate,
            now,
            self.config.camera_duration,
        ));
        coordinate
    }

    /// Two-finger double tap: drops "Point A" and "Point B" in a fresh shared color and
    /// reports their distance. Returns the distance in meters.
    pub fn two_finger_tap(&mut self, points: [Pos2; 2], view: &impl MapView, now: Instant) -> f64 {
        profiling::scope!("MapScreen::two_finger_tap");
        let [a, b] = points.map(|point| view.coordinate_at(point));
        let color = self.next_pair_color();

        let pin_a = Annotation::pair(self.next_id(), PinRole::PairA, a, color, now);
        let pin_b = Annotation::pair(self.next_id(), PinRole::PairB, b, color, now);
        self.annotations.extend([pin_a, pin_b]);

        let meters = distance_meters(a, b);
        tracing::debug!("Pair distance: {meters:.1} m");
        self.show_notification(distance_message(meters), now);
        meters
    }

    /// Slides the notification label in with `message`, then fades it out.
    pub fn show_notification(&mut self, message: impl Into<String>, now: Instant) {
        self.notification.show(message, now);
    }

    /// Applies every geocode reply received so far. Returns how many were applied.
    pub fn poll_replies(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(reply) = self.replies_rx.try_recv() {
            if self.apply_reply(reply, now) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for every in-flight lookup and applies its reply.
    ///
    /// A lookup task that panics never replies, and the screen keeps its own
    /// sender alive, so this then waits forever. Bound it with a timeout.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.replies_rx.recv().await {
                Some(reply) => {
                    self.apply_reply(reply, Instant::now());
                }
                None => break,
            }
        }
    }

    /// Map center while the camera is animating; `None` once it has arrived.
    pub fn camera_position(&mut self, now: Instant) -> Option<Coordinate> {
        let camera = self.camera?;
        if camera.is_finished(now) {
            self.camera = None;
        }
        Some(camera.sample(now))
    }

    pub fn is_camera_moving(&self, now: Instant) -> bool {
        self.camera.is_some_and(|camera| !camera.is_finished(now))
    }

    /// True while something still changes on its own (lookups, animations, a
    /// region waiting to be confirmed)
    pub fn is_busy(&self, now: Instant) -> bool {
        self.pending > 0
            || self.camera.is_some()
            || self.notification.is_animating(now)
            || self.region_tracker.is_settling()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn pair_color(&self) -> Option<PinColor> {
        self.pair_color
    }

    pub fn notification(&self) -> &NotificationLabel {
        &self.notification
    }

    pub fn label_frame(&self, now: Instant) -> LabelFrame {
        self.notification.frame(now)
    }

    pub fn pending_requests(&self) -> usize {
        self.pending
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_annotation_id;
        self.next_annotation_id += 1;
        id
    }

    /// A new random color, never equal to the previous pair's
    fn next_pair_color(&mut self) -> PinColor {
        let mut color = random_pin_color();
        for _ in 0..8 {
            if Some(color) != self.pair_color {
                break;
            }
            color = random_pin_color();
        }
        if Some(color) == self.pair_color {
            // Still equal after retries: nudge one channel.
            color = PinColor::from_rgb(color.r().wrapping_add(1), color.g(), color.b());
        }
        self.pair_color = Some(color);
        color
    }

    fn request_geocode(&mut self, coordinate: Coordinate, request: GeocodeRequest) {
        let lookup = self.geocoder.reverse_geocode(coordinate);
        let tx = self.replies_tx.clone();
        self.pending += 1;

        let spawned = async_runtime::spawn(async move {
            let result = lookup.await;
            // The screen may be gone by now.
            let _ = tx.send(GeocodeReply { request, result });
        });

        if !spawned {
            let _ = self.replies_tx.send(GeocodeReply {
                request,
                result: Err(GeocodeError::Unavailable),
            });
        }
    }

    /// Returns false when the reply was stale and dropped.
    fn apply_reply(&mut self, reply: GeocodeReply, now: Instant) -> bool {
        self.pending = self.pending.saturating_sub(1);

        let place = match &reply.result {
            Ok(places) => places.first(),
            Err(err) => {
                tracing::debug!("Reverse geocoding failed: {err}");
                None
            }
        };

        match reply.request {
            GeocodeRequest::Region { sequence } => {
                if sequence < self.region_sequence {
                    tracing::trace!(
                        "Dropping stale region reply #{sequence} (latest #{})",
                        self.region_sequence
                    );
                    return false;
                }
                let message = region_message(place);
                self.show_notification(message, now);
            }
            GeocodeRequest::Tap { coordinate } => {
                let (title, subtitle) = tap_labels(place);
                tracing::debug!("Dropping pin '{title}, {subtitle}'");
                let id = self.next_id();
                self.annotations
                    .push(Annotation::place(id, coordinate, title, subtitle, now));
            }
        }
        true
    }
}
