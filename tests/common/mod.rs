#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, TimeZone};
use mapty_wasm::form::{FieldSet, FormReset};
use mapty_wasm::host::{Clock, FormView, KeyValueStore, MapView, Notifier, WorkoutList};
use mapty_wasm::render::{ListEntry, MarkerSpec, PanOptions, TileLayer};
use mapty_wasm::{App, AppOptions, Coords, FormInput};

/// Everything the controller asked the host to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateView(Coords, u8),
    TileLayer(String),
    Marker(MarkerSpec),
    SetView(Coords, u8, PanOptions),
    Entry(ListEntry),
    ShowForm,
    ResetForm(FormReset),
    ShowFields(FieldSet),
    Alert(String),
}

pub struct RecordingHost {
    pub calls: Vec<Call>,
    pub store: HashMap<String, String>,
    pub now: DateTime<FixedOffset>,
    pub fail_saves: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            store: HashMap::new(),
            now: april_14(),
            fail_saves: false,
        }
    }

    pub fn markers(&self) -> Vec<&MarkerSpec> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Marker(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn entries(&self) -> Vec<&ListEntry> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Entry(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Alert(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl MapView for RecordingHost {
    fn create_view(&mut self, center: Coords, zoom: u8) {
        self.calls.push(Call::CreateView(center, zoom));
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.calls.push(Call::TileLayer(layer.url_template.clone()));
    }

    fn place_marker(&mut self, marker: &MarkerSpec) {
        self.calls.push(Call::Marker(marker.clone()));
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        self.calls.push(Call::SetView(center, zoom, pan));
    }
}

impl WorkoutList for RecordingHost {
    fn render_entry(&mut self, entry: &ListEntry) {
        self.calls.push(Call::Entry(entry.clone()));
    }
}

impl FormView for RecordingHost {
    fn show(&mut self) {
        self.calls.push(Call::ShowForm);
    }

    fn reset(&mut self, reset: &FormReset) {
        self.calls.push(Call::ResetForm(*reset));
    }

    fn show_fields(&mut self, fields: FieldSet) {
        self.calls.push(Call::ShowFields(fields));
    }
}

impl Notifier for RecordingHost {
    fn alert(&mut self, message: &str) {
        self.calls.push(Call::Alert(message.to_string()));
    }
}

impl KeyValueStore for RecordingHost {
    fn save(&mut self, key: &str, value: &str) -> Result<(), String> {
        if self.fail_saves {
            return Err("quota exceeded".to_string());
        }
        self.store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.store.get(key).cloned()
    }

    fn remove(&mut self, key: &str) {
        self.store.remove(key);
    }
}

impl Clock for RecordingHost {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}

/// 2025-04-14 09:30 at +02:00, i.e. 1744615800000 ms since the epoch.
pub fn april_14() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 4, 14, 9, 30, 0)
        .unwrap()
}

pub fn home() -> Coords {
    Coords::new(38.7, -9.1)
}

/// An app whose map is already up.
pub fn ready_app() -> App<RecordingHost> {
    let mut app = App::new(RecordingHost::new(), AppOptions::default());
    app.start();
    app.position_resolved(home());
    app.host_mut().calls.clear();
    app
}

pub fn running(distance: &str, duration: &str, cadence: &str) -> FormInput {
    serde_json::from_value(serde_json::json!({
        "type": "running",
        "distance": distance,
        "duration": duration,
        "cadence": cadence,
        "elevation": "",
    }))
    .unwrap()
}

pub fn cycling(distance: &str, duration: &str, elevation: &str) -> FormInput {
    serde_json::from_value(serde_json::json!({
        "type": "cycling",
        "distance": distance,
        "duration": duration,
        "cadence": "",
        "elevation": elevation,
    }))
    .unwrap()
}
