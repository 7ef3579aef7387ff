use std::future::Future;

use thiserror::Error;

use crate::plugins::tasks::types::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location permission was denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// One-shot device positioning.
pub trait Geolocator: Send + Sync + 'static {
    fn request_permission(&self) -> impl Future<Output = Permission> + Send;

    fn current_position(&self) -> impl Future<Output = Result<Location, LocationError>> + Send;
}

/// Reports a configured position, or denies access when there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGeolocator {
    position: Option<Location>,
}

impl FixedGeolocator {
    pub fn at(position: Location) -> Self {
        Self {
            position: Some(position),
        }
    }

    pub fn denied() -> Self {
        Self { position: None }
    }
}

impl Geolocator for FixedGeolocator {
    async fn request_permission(&self) -> Permission {
        if self.position.is_some() {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_position(&self) -> Result<Location, LocationError> {
        self.position.ok_or(LocationError::PermissionDenied)
    }
}
