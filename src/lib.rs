pub mod collection;
pub mod controller;
pub mod error;
pub mod form;
pub mod host;
#[cfg(target_arch = "wasm32")]
pub mod logging;
pub mod options;
pub mod persistence;
pub mod render;
pub mod web;
pub mod workout;

pub use collection::WorkoutCollection;
pub use controller::{App, BootstrapStep, PositionRequest};
pub use error::{AppError, PersistenceError, ValidationError};
pub use form::{FieldSet, FormInput, FormState};
pub use options::AppOptions;
pub use web::WorkoutApp;
pub use workout::{ActivityType, Coords, Workout, WorkoutDraft, WorkoutId, WorkoutMetrics};
