use serde::{Deserialize, Serialize};

use crate::catalog::CatalogConfig;
use crate::error::CoordinateError;
use crate::navigation::NavigationController;

/// Validated lat/lon. Both components are finite and in range. Only built
/// through [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }
}

// NaN fails `contains`, infinities fall outside the range.
pub(crate) fn validate_latitude(latitude: f64) -> Result<f64, CoordinateError> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(CoordinateError::LatitudeOutOfRange(latitude))
    }
}

pub(crate) fn validate_longitude(longitude: f64) -> Result<f64, CoordinateError> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(CoordinateError::LongitudeOutOfRange(longitude))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebcamLocation {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebcamLinks {
    pub viewer_url: String,
    pub provider_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebcamSummary {
    pub id: u64,
    pub title: String,
    pub location: WebcamLocation,
    pub links: WebcamLinks,
}

/// Webcams returned for one coordinate query, in server order.
///
/// Once attached to a screen state the catalog is never edited; transitions
/// move it into the next state instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebcamCatalog {
    webcams: Vec<WebcamSummary>,
}

impl WebcamCatalog {
    #[must_use]
    pub fn new(webcams: Vec<WebcamSummary>) -> Self {
        Self { webcams }
    }

    /// First entry whose id matches. Ids are expected to be unique but this
    /// is not enforced.
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&WebcamSummary> {
        self.webcams.iter().find(|w| w.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.webcams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.webcams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WebcamSummary> {
        self.webcams.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[WebcamSummary] {
        &self.webcams
    }
}

impl FromIterator<WebcamSummary> for WebcamCatalog {
    fn from_iter<I: IntoIterator<Item = WebcamSummary>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenState {
    #[default]
    LocationInput,
    List {
        catalog: WebcamCatalog,
    },
    Detail {
        selected: WebcamSummary,
        catalog: WebcamCatalog,
    },
}

impl ScreenState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LocationInput => "location_input",
            Self::List { .. } => "list",
            Self::Detail { .. } => "detail",
        }
    }

    #[must_use]
    pub const fn is_location_input(&self) -> bool {
        matches!(self, Self::LocationInput)
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub navigation: NavigationController,
    pub catalog_config: CatalogConfig,
}
