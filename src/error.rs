use wasm_bindgen::JsValue;

/// A numeric form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Latitude,
    Longitude,
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Cadence => "cadence",
            Self::Elevation => "elevation",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: Field, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: Field, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: Field, value: f64 },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::NotFinite { field, .. }
            | Self::NotPositive { field, .. }
            | Self::Negative { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PersistenceError {
    #[error("stored workouts are corrupt: {0}")]
    Corrupt(String),

    #[error("failed to serialize workouts: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupt(e.to_string())
    }
}

impl From<ValidationError> for PersistenceError {
    fn from(e: ValidationError) -> Self {
        Self::Corrupt(e.to_string())
    }
}

/// Errors surfaced by the application controller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("could not get your location: {0}")]
    GeolocationUnavailable(String),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("no workout with id {0}")]
    RecordNotFound(String),

    #[error(transparent)]
    PersistenceCorrupt(#[from] PersistenceError),

    #[error("form submitted without a pending map location")]
    NoPendingLocation,
}

impl From<AppError> for JsValue {
    fn from(e: AppError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::NotPositive {
            field: Field::Distance,
            value: -1.0,
        };
        assert_eq!(err.to_string(), "distance must be positive, got -1");
        assert_eq!(err.field(), Field::Distance);

        let err = AppError::from(err);
        assert_eq!(
            err.to_string(),
            "invalid input: distance must be positive, got -1"
        );

        let err = AppError::PersistenceCorrupt(PersistenceError::Corrupt("eof".to_string()));
        assert_eq!(err.to_string(), "stored workouts are corrupt: eof");

        assert_eq!(
            AppError::NoPendingLocation.to_string(),
            "form submitted without a pending map location"
        );
    }
}
