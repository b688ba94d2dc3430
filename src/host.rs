//! Capabilities the controller drives: the map widget, the workout list, the
//! input form, user alerts, a key-value store and the clock.
//!
//! The browser binding implements these against a JavaScript host object;
//! tests use in-memory doubles.

use chrono::{DateTime, FixedOffset};

use crate::form::{FieldSet, FormReset};
use crate::render::{ListEntry, MarkerSpec, PanOptions, TileLayer};
use crate::workout::Coords;

pub trait MapView {
    fn create_view(&mut self, center: Coords, zoom: u8);
    fn add_tile_layer(&mut self, layer: &TileLayer);
    fn place_marker(&mut self, marker: &MarkerSpec);
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions);
}

pub trait WorkoutList {
    /// Insert an entry at the top of the list.
    fn render_entry(&mut self, entry: &ListEntry);
}

pub trait FormView {
    /// Reveal the form and focus the distance input.
    fn show(&mut self);
    /// Clear all inputs, hide the form and restore its layout after the delay.
    fn reset(&mut self, reset: &FormReset);
    /// Make only the rows for `fields` visible.
    fn show_fields(&mut self, fields: FieldSet);
}

pub trait Notifier {
    fn alert(&mut self, message: &str);
}

pub trait KeyValueStore {
    fn save(&mut self, key: &str, value: &str) -> Result<(), String>;
    fn load(&self, key: &str) -> Option<String>;
    fn remove(&mut self, key: &str);
}

pub trait Clock {
    /// Current local time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Everything the controller needs from its environment.
pub trait Host: MapView + WorkoutList + FormView + Notifier + KeyValueStore + Clock {}

impl<T> Host for T where T: MapView + WorkoutList + FormView + Notifier + KeyValueStore + Clock {}
