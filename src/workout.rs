//! Workout records: running and cycling entries with derived metrics.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};

type Result<T> = std::result::Result<T, ValidationError>;

/// Opaque workout identifier, carried on rendered list entries as `data-id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(pub String);

impl WorkoutId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The millisecond value of a generated id, if this is one.
    pub fn numeric(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A map location in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn validate(&self) -> Result<()> {
        finite(Field::Latitude, self.lat)?;
        finite(Field::Longitude, self.lng)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Running,
    Cycling,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub fn capitalized(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }

    /// Parse the value of the activity-type `<select>`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "running" => Some(Self::Running),
            "cycling" => Some(Self::Cycling),
            _ => None,
        }
    }
}

/// Type-specific payload and its derived metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutMetrics {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_hr: f64,
    },
}

impl WorkoutMetrics {
    pub fn activity(&self) -> ActivityType {
        match self {
            Self::Running { .. } => ActivityType::Running,
            Self::Cycling { .. } => ActivityType::Cycling,
        }
    }
}

/// User input for a new workout, before validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutDraft {
    pub activity: ActivityType,
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Cadence (spm) for running, elevation gain (m) for cycling.
    pub type_specific: f64,
}

impl WorkoutDraft {
    pub fn running(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Self {
        Self {
            activity: ActivityType::Running,
            coords,
            distance_km,
            duration_min,
            type_specific: cadence_spm,
        }
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self {
            activity: ActivityType::Cycling,
            coords,
            distance_km,
            duration_min,
            type_specific: elevation_gain_m,
        }
    }

    /// Check every field against its lower bound.
    ///
    /// Distance, duration and cadence must be strictly positive; elevation
    /// gain may be zero but not negative. All values must be finite.
    pub fn validate(&self) -> Result<()> {
        self.coords.validate()?;
        positive(Field::Distance, self.distance_km)?;
        positive(Field::Duration, self.duration_min)?;
        match self.activity {
            ActivityType::Running => positive(Field::Cadence, self.type_specific),
            ActivityType::Cycling => non_negative(Field::Elevation, self.type_specific),
        }
    }
}

/// A single logged activity.
///
/// Everything except the click counter is fixed at construction; derived
/// metrics and the description are computed once in [`Workout::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<FixedOffset>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    description: String,
    metrics: WorkoutMetrics,
    click_count: u32,
}

impl Workout {
    pub fn create(
        draft: WorkoutDraft,
        id: WorkoutId,
        created_at: DateTime<FixedOffset>,
    ) -> Result<Self> {
        draft.validate()?;

        let metrics = match draft.activity {
            ActivityType::Running => WorkoutMetrics::Running {
                cadence_spm: draft.type_specific,
                pace_min_per_km: draft.duration_min / draft.distance_km,
            },
            ActivityType::Cycling => WorkoutMetrics::Cycling {
                elevation_gain_m: draft.type_specific,
                speed_km_per_hr: draft.distance_km / (draft.duration_min / 60.0),
            },
        };

        Ok(Self {
            id,
            created_at,
            coords: draft.coords,
            distance_km: draft.distance_km,
            duration_min: draft.duration_min,
            description: describe(draft.activity, &created_at),
            metrics,
            click_count: 0,
        })
    }

    pub(crate) fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    /// Record a selection from the workout list.
    pub fn click(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn activity(&self) -> ActivityType {
        self.metrics.activity()
    }

    pub fn created_at(&self) -> &DateTime<FixedOffset> {
        &self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metrics(&self) -> &WorkoutMetrics {
        &self.metrics
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Pace in min/km, for running workouts.
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.metrics {
            WorkoutMetrics::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            WorkoutMetrics::Cycling { .. } => None,
        }
    }

    /// Speed in km/h, for cycling workouts.
    pub fn speed_km_per_hr(&self) -> Option<f64> {
        match self.metrics {
            WorkoutMetrics::Cycling {
                speed_km_per_hr, ..
            } => Some(speed_km_per_hr),
            WorkoutMetrics::Running { .. } => None,
        }
    }
}

/// `"<Type> on <Month> <Day>"`, using the date in the timestamp's own offset.
pub fn describe(activity: ActivityType, created_at: &DateTime<FixedOffset>) -> String {
    format!(
        "{} on {}",
        activity.capitalized(),
        created_at.format("%B %-d")
    )
}

/// Largest numeric id accepted from storage. Keeps `IdGenerator` far from
/// `i64::MAX` after restoring.
pub const MAX_NUMERIC_ID: i64 = i64::MAX / 2;

/// Issues millisecond-timestamp ids that never repeat within a session.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for a clock reading of `now_ms`. When the clock hasn't moved
    /// past the last issued id, the previous value plus one is used.
    pub fn next(&mut self, now_ms: i64) -> WorkoutId {
        let value = if now_ms > self.last {
            now_ms
        } else {
            self.last.saturating_add(1)
        };
        self.last = value;
        WorkoutId(value.to_string())
    }

    /// Make sure later ids sort after an id restored from storage.
    pub fn observe(&mut self, id: &WorkoutId) {
        if let Some(value) = id.numeric() {
            self.last = self.last.max(value);
        }
    }
}

fn finite(field: Field, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

fn positive(field: Field, value: f64) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field, value })
    }
}

fn non_negative(field: Field, value: f64) -> Result<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative { field, value })
    }
}
