//! Manual coordinate entry.
//!
//! Latitude and longitude are validated independently, so both error flags
//! can be set by the same submission. Submission is blocked unless both pass.

use crate::error::CoordinateError;
use crate::model::{validate_latitude, validate_longitude, Coordinate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateForm {
    pub latitude_text: String,
    pub longitude_text: String,
    pub latitude_error: Option<CoordinateError>,
    pub longitude_error: Option<CoordinateError>,
}

impl CoordinateForm {
    pub fn set_latitude(&mut self, text: impl Into<String>) {
        self.latitude_text = text.into();
        self.latitude_error = None;
    }

    pub fn set_longitude(&mut self, text: impl Into<String>) {
        self.longitude_text = text.into();
        self.longitude_error = None;
    }

    /// Fill both fields from an acquired fix, clearing any stale flags.
    pub fn fill_from(&mut self, coordinate: Coordinate) {
        self.set_latitude(coordinate.latitude().to_string());
        self.set_longitude(coordinate.longitude().to_string());
    }

    /// Validates both fields, records a flag for each failing one and returns
    /// the coordinate only when both are valid.
    pub fn validate(&mut self) -> Option<Coordinate> {
        let latitude = parse_component(&self.latitude_text).and_then(validate_latitude);
        let longitude = parse_component(&self.longitude_text).and_then(validate_longitude);

        self.latitude_error = latitude.as_ref().err().cloned();
        self.longitude_error = longitude.as_ref().err().cloned();

        let (Ok(latitude), Ok(longitude)) = (latitude, longitude) else {
            return None;
        };
        Coordinate::new(latitude, longitude).ok()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.latitude_error.is_some() || self.longitude_error.is_some()
    }
}

fn parse_component(text: &str) -> Result<f64, CoordinateError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| CoordinateError::NotANumber(text.to_string()))
}
