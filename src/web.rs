//! Browser binding. JavaScript creates a [`WorkoutApp`] with a host object
//! that wraps Leaflet, the DOM, `localStorage` and `alert`, then forwards
//! geolocation results and UI events to it.
//!
//! Host object methods: `createView(center, zoom)`, `addTileLayer(layer)`,
//! `placeMarker(marker)`, `setView(center, zoom, pan)`, `renderWorkout(entry)`,
//! `showForm()`, `resetForm(reset)`, `showFields(fields)`, `alert(message)`,
//! `save(key, value)`, `load(key)`, `remove(key)`.

use chrono::{DateTime, FixedOffset, Local};
use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::controller::App;
use crate::form::{FieldSet, FormInput, FormReset};
use crate::host::{Clock, FormView, KeyValueStore, MapView, Notifier, WorkoutList};
use crate::options::AppOptions;
use crate::render::{ListEntry, MarkerSpec, PanOptions, TileLayer};
use crate::workout::{ActivityType, Coords};

/// Forwards collaborator calls to methods on a JavaScript object.
pub struct JsHost {
    target: JsValue,
}

impl JsHost {
    pub fn new(target: JsValue) -> Self {
        Self { target }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        let func: Function = Reflect::get(&self.target, &JsValue::from_str(method))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("host has no method '{method}'")))?;
        let argv: Array = args.iter().collect();
        func.apply(&self.target, &argv)
    }

    /// Call a method whose result doesn't matter; failures are logged.
    fn invoke(&self, method: &str, args: &[JsValue]) {
        if let Err(e) = self.call(method, args) {
            tracing::warn!(method, error = ?e, "Host call failed");
        }
    }
}

/// Convert a value for the host. A failure is logged and JS gets `undefined`.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(js) => js,
        Err(e) => {
            tracing::warn!(
                error = %e,
                value_type = std::any::type_name::<T>(),
                "Failed to convert value for host"
            );
            JsValue::UNDEFINED
        }
    }
}

impl MapView for JsHost {
    fn create_view(&mut self, center: Coords, zoom: u8) {
        self.invoke("createView", &[to_js(&center), JsValue::from(zoom)]);
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.invoke("addTileLayer", &[to_js(layer)]);
    }

    fn place_marker(&mut self, marker: &MarkerSpec) {
        self.invoke("placeMarker", &[to_js(marker)]);
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        self.invoke("setView", &[to_js(&center), JsValue::from(zoom), to_js(&pan)]);
    }
}

impl WorkoutList for JsHost {
    fn render_entry(&mut self, entry: &ListEntry) {
        self.invoke("renderWorkout", &[to_js(entry)]);
    }
}

impl FormView for JsHost {
    fn show(&mut self) {
        self.invoke("showForm", &[]);
    }

    fn reset(&mut self, reset: &FormReset) {
        self.invoke("resetForm", &[to_js(reset)]);
    }

    fn show_fields(&mut self, fields: FieldSet) {
        self.invoke("showFields", &[to_js(&fields)]);
    }
}

impl Notifier for JsHost {
    fn alert(&mut self, message: &str) {
        self.invoke("alert", &[JsValue::from_str(message)]);
    }
}

impl KeyValueStore for JsHost {
    fn save(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.call("save", &[JsValue::from_str(key), JsValue::from_str(value)])
            .map(|_| ())
            .map_err(|e| format!("{e:?}"))
    }

    fn load(&self, key: &str) -> Option<String> {
        self.call("load", &[JsValue::from_str(key)])
            .ok()
            .and_then(|v| v.as_string())
    }

    fn remove(&mut self, key: &str) {
        self.invoke("remove", &[JsValue::from_str(key)]);
    }
}

impl Clock for JsHost {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// The workout tracker, driven from JavaScript event handlers.
#[wasm_bindgen]
pub struct WorkoutApp {
    app: App<JsHost>,
}

#[wasm_bindgen]
impl WorkoutApp {
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue, options: JsValue) -> Result<WorkoutApp, JsValue> {
        console_error_panic_hook::set_once();
        #[cfg(target_arch = "wasm32")]
        crate::logging::init();

        let opts = parse_options(options)?;
        Ok(Self {
            app: App::new(JsHost::new(host), opts),
        })
    }

    /// Restore saved workouts; returns the first geolocation request.
    pub fn start(&mut self) -> JsValue {
        to_js(&self.app.start())
    }

    #[wasm_bindgen(js_name = positionResolved)]
    pub fn position_resolved(&mut self, lat: f64, lng: f64) -> JsValue {
        to_js(&self.app.position_resolved(Coords::new(lat, lng)))
    }

    #[wasm_bindgen(js_name = positionFailed)]
    pub fn position_failed(&mut self, reason: &str) -> JsValue {
        to_js(&self.app.position_failed(reason))
    }

    #[wasm_bindgen(js_name = mapClicked)]
    pub fn map_clicked(&mut self, lat: f64, lng: f64) -> bool {
        self.app.map_clicked(Coords::new(lat, lng))
    }

    #[wasm_bindgen(js_name = activityChanged)]
    pub fn activity_changed(&mut self, value: &str) {
        if let Some(activity) = ActivityType::parse(value) {
            self.app.activity_changed(activity);
        }
    }

    /// Submit the form values `{type, distance, duration, cadence, elevation}`.
    /// Returns the new workout id, or `undefined` when the input was
    /// rejected (the user has already been alerted).
    pub fn submit(&mut self, input: JsValue) -> Result<Option<String>, JsValue> {
        let input: FormInput =
            serde_wasm_bindgen::from_value(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
        match self.app.submit(&input) {
            Ok(id) => Ok(Some(id.0)),
            Err(crate::error::AppError::Validation(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn cancel(&mut self) {
        self.app.cancel();
    }

    /// Pan to the workout whose list entry was clicked.
    #[wasm_bindgen(js_name = workoutSelected)]
    pub fn workout_selected(&mut self, id: Option<String>) -> bool {
        self.app.workout_selected(id.as_deref()).is_some()
    }

    pub fn reset(&mut self) {
        self.app.reset();
    }

    #[wasm_bindgen(js_name = workoutCount)]
    pub fn workout_count(&self) -> usize {
        self.app.workouts().len()
    }

    /// All workouts as a GeoJSON string.
    #[wasm_bindgen(js_name = exportGeoJson)]
    pub fn export_geojson(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.app.export_geojson())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn parse_options(options: JsValue) -> Result<AppOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(AppOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
