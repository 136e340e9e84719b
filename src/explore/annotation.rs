//! Coordinates, annotations and pin styling
//!
//! An [`Annotation`] is a labeled point marker on the map. How it is drawn is
//! decided by [`pin_style`], which only looks at the annotation's role and color tag.

use crate::explore::animation::elapsed_between;
use egui::Color32;
use instant::{Duration, Instant};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pin tint color
pub type PinColor = Color32;

/// Tint used by every pin without a dedicated color
pub const DEFAULT_PIN_TINT: PinColor = Color32::from_rgb(61, 172, 247);

/// How long a freshly added pin takes to drop onto the map
pub const PIN_DROP_DURATION: Duration = Duration::from_millis(350);

/// A geographic coordinate (WGS84, degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// As a `geo` point (x = longitude, y = latitude)
    #[inline]
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }

    /// As a walkers map position
    #[inline]
    pub fn to_position(self) -> walkers::Position {
        walkers::lat_lon(self.latitude, self.longitude)
    }

    /// Component-wise comparison with a tolerance in degrees
    pub fn approx_eq(&self, other: &Coordinate, epsilon: f64) -> bool {
        (self.latitude - other.latitude).abs() <= epsilon
            && (self.longitude - other.longitude).abs() <= epsilon
    }
}

impl From<walkers::Position> for Coordinate {
    fn from(position: walkers::Position) -> Self {
        Self::new(position.y(), position.x())
    }
}

/// What an annotation stands for, which drives its styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    /// The fixed pin placed when the screen loads
    Home,
    /// A pin dropped by a single tap and labeled by reverse geocoding
    Place,
    /// First pin of a two-finger pair
    PairA,
    /// Second pin of a two-finger pair
    PairB,
}

impl PinRole {
    /// Title given to pair pins
    pub fn pair_title(self) -> Option<&'static str> {
        match self {
            Self::PairA => Some("Point A"),
            Self::PairB => Some("Point B"),
            Self::Home | Self::Place => None,
        }
    }
}

/// A labeled point marker placed on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: u64,
    pub coordinate: Coordinate,
    pub title: String,
    pub subtitle: Option<String>,
    pub color_tag: Option<PinColor>,
    pub role: PinRole,
    /// When the pin was added (drives the drop animation)
    pub added_at: Instant,
}

impl Annotation {
    pub fn place(
        id: u64,
        coordinate: Coordinate,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        added_at: Instant,
    ) -> Self {
        Self {
            id,
            coordinate,
            title: title.into(),
            subtitle: Some(subtitle.into()),
            color_tag: None,
            role: PinRole::Place,
            added_at,
        }
    }

    /// One half of a pin pair. `role` must be [`PinRole::PairA`] or [`PinRole::PairB`].
    pub fn pair(
        id: u64,
        role: PinRole,
        coordinate: Coordinate,
        color: PinColor,
        added_at: Instant,
    ) -> Self {
        debug_assert!(role.pair_title().is_some(), "not a pair role: {role:?}");
        Self {
            id,
            coordinate,
            title: role.pair_title().unwrap_or_default().to_string(),
            subtitle: None,
            color_tag: Some(color),
            role,
            added_at,
        }
    }

    /// Drop animation progress in `0.0..=1.0`
    pub fn drop_progress(&self, now: Instant) -> f32 {
        let elapsed = elapsed_between(self.added_at, now);
        (elapsed.as_secs_f32() / PIN_DROP_DURATION.as_secs_f32()).min(1.0)
    }
}

/// Accessory shown inside a pin's callout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinIcon {
    City,
}

impl PinIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::City => "🗺",
        }
    }
}

/// How a pin is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinStyle {
    pub tint: PinColor,
    pub icon: Option<PinIcon>,
    pub animates_drop: bool,
    pub shows_callout: bool,
}

/// Styling for an annotation's pin.
///
/// Place pins use [`DEFAULT_PIN_TINT`]. The home pin uses its random color tag and
/// the city icon. Pair pins use the color shared by their pair.
pub fn pin_style(annotation: &Annotation) -> PinStyle {
    let (tint, icon) = match annotation.role {
        PinRole::Home => (
            annotation.color_tag.unwrap_or_else(random_pin_color),
            Some(PinIcon::City),
        ),
        PinRole::PairA | PinRole::PairB => {
            (annotation.color_tag.unwrap_or(DEFAULT_PIN_TINT), None)
        }
        PinRole::Place => (DEFAULT_PIN_TINT, None),
    };

    PinStyle {
        tint,
        icon,
        animates_drop: true,
        shows_callout: true,
    }
}

/// Opaque color with random RGB channels.
///
/// Falls back to a hue walk when the OS random source is unavailable.
pub fn random_pin_color() -> PinColor {
    let mut rgb = [0u8; 3];
    match getrandom::getrandom(&mut rgb) {
        Ok(()) => Color32::from_rgb(rgb[0], rgb[1], rgb[2]),
        Err(err) => {
            tracing::debug!("Random source unavailable ({err}), using hue fallback");
            static FALLBACK_INDEX: AtomicUsize = AtomicUsize::new(0);
            hue_color(FALLBACK_INDEX.fetch_add(1, Ordering::Relaxed))
        }
    }
}

/// Distinct colors by stepping the hue by the golden angle
fn hue_color(index: usize) -> PinColor {
    let hue = (index as f32 * 137.508) % 360.0;
    let saturation = 0.7;
    let value = 0.9;

    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match hue {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color32::from_rgb(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
