pub mod location;
pub mod notification;

pub use location::{FixedGeolocator, Geolocator, LocationError, Permission};
pub use notification::{DefaultNotifier, LogNotifier, Notifier, SilentNotifier};
