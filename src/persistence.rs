//! Stored form of the workout collection.
//!
//! Workouts are saved as a JSON array of flat records tagged with their
//! activity `type`, so restoring rebuilds typed records with their derived
//! metrics rather than bare data.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::collection::WorkoutCollection;
use crate::error::PersistenceError;
use crate::workout::{
    Coords, MAX_NUMERIC_ID, Workout, WorkoutDraft, WorkoutId, WorkoutMetrics,
};

type Result<T> = std::result::Result<T, PersistenceError>;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCommon {
    id: WorkoutId,
    date: DateTime<FixedOffset>,
    /// `[lat, lng]`
    coords: [f64; 2],
    distance_km: f64,
    duration_min: f64,
    description: String,
    #[serde(default)]
    clicks: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
enum StoredWorkout {
    Running {
        #[serde(flatten)]
        common: StoredCommon,
        cadence_spm: f64,
    },
    Cycling {
        #[serde(flatten)]
        common: StoredCommon,
        elevation_gain_m: f64,
    },
}

impl From<&Workout> for StoredWorkout {
    fn from(w: &Workout) -> Self {
        let coords = w.coords();
        let common = StoredCommon {
            id: w.id().clone(),
            date: *w.created_at(),
            coords: [coords.lat, coords.lng],
            distance_km: w.distance_km(),
            duration_min: w.duration_min(),
            description: w.description().to_string(),
            clicks: w.click_count(),
        };
        match *w.metrics() {
            WorkoutMetrics::Running { cadence_spm, .. } => Self::Running {
                common,
                cadence_spm,
            },
            WorkoutMetrics::Cycling {
                elevation_gain_m, ..
            } => Self::Cycling {
                common,
                elevation_gain_m,
            },
        }
    }
}

impl StoredWorkout {
    /// Rebuild through the factory so derived values are recomputed and
    /// invalid stored values are rejected.
    fn into_workout(self) -> Result<Workout> {
        let (common, draft) = match self {
            Self::Running {
                common,
                cadence_spm,
            } => {
                let draft = WorkoutDraft::running(
                    coords_of(&common),
                    common.distance_km,
                    common.duration_min,
                    cadence_spm,
                );
                (common, draft)
            }
            Self::Cycling {
                common,
                elevation_gain_m,
            } => {
                let draft = WorkoutDraft::cycling(
                    coords_of(&common),
                    common.distance_km,
                    common.duration_min,
                    elevation_gain_m,
                );
                (common, draft)
            }
        };

        let workout = Workout::create(draft, common.id, common.date)?;
        Ok(workout.with_click_count(common.clicks))
    }
}

fn coords_of(common: &StoredCommon) -> Coords {
    Coords::new(common.coords[0], common.coords[1])
}

/// Serialize every workout, in order.
pub fn to_blob(workouts: &WorkoutCollection) -> Result<String> {
    let stored: Vec<StoredWorkout> = workouts.iter().map(StoredWorkout::from).collect();
    serde_json::to_string(&stored).map_err(|e| PersistenceError::Serialize(e.to_string()))
}

/// Parse a stored blob back into typed workouts. Any unreadable record,
/// out-of-range id or repeated id rejects the whole blob.
pub fn from_blob(blob: &str) -> Result<Vec<Workout>> {
    let stored: Vec<StoredWorkout> = serde_json::from_str(blob)?;

    let mut seen = HashSet::with_capacity(stored.len());
    let mut workouts = Vec::with_capacity(stored.len());
    for record in stored {
        let workout = record.into_workout()?;
        let id = workout.id();
        if id.numeric().is_some_and(|n| n > MAX_NUMERIC_ID) {
            return Err(PersistenceError::Corrupt(format!("id {id} out of range")));
        }
        if !seen.insert(id.clone()) {
            return Err(PersistenceError::Corrupt(format!("duplicate id {id}")));
        }
        workouts.push(workout);
    }
    Ok(workouts)
}
