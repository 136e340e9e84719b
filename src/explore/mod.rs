//! Explore Map core
//!
//! Everything the map screen does, independent of the widget that draws it:
//! pins dropped by taps and labeled through reverse geocoding, pin pairs whose
//! great-circle distance is reported, and the notification label that slides in
//! to describe the map center or the last measured distance.
//!
//! # Architecture
//!
//! - **[`MapScreen`]**: the screen controller owning annotations, pair color,
//!   notification and camera animations, and in-flight geocode requests
//! - **[`Geocoder`]**: asynchronous reverse geocoding, implemented over HTTP by
//!   [`NominatimGeocoder`]
//! - **[`MapView`]**: screen point to coordinate conversion supplied by the map widget
//! - **[`pin_style`]**: maps an [`Annotation`] to the [`PinStyle`] used to draw it
//! - **[`TwoFingerDoubleTap`]**: recognizes the pair gesture from raw touches

mod animation;
mod annotation;
pub mod distance;
mod gesture;
mod geocode;
mod notification;
mod screen;

pub use animation::{CameraAnimation, ease_in_out, spring_progress};
pub use annotation::{
    Annotation, Coordinate, DEFAULT_PIN_TINT, PIN_DROP_DURATION, PinColor, PinIcon, PinRole,
    PinStyle, pin_style, random_pin_color,
};
pub use gesture::{PairClickEmulator, TouchPhase, TouchSample, TwoFingerDoubleTap};
pub use geocode::{
    COUNTRY_FALLBACK, GeocodeError, GeocodeResult, Geocoder, LOCALITY_FALLBACK, NominatimConfig,
    NominatimGeocoder, Placemark, REGION_FALLBACK, region_label, region_message, tap_labels,
};
pub use notification::{LabelFrame, NotificationLabel, NotificationTiming};
pub use screen::{GeocodeReply, GeocodeRequest, MapScreen, MapView, RegionTracker, ScreenConfig};

/// Errors raised while setting up the explore core
#[derive(Debug, thiserror::Error)]
pub enum ExploreError {
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ExploreError>;
