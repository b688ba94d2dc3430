//! Application controller.
//!
//! Owns the workout collection and the form session, and turns host events
//! (position fixes, map clicks, form submissions, list clicks) into calls on
//! the map, list, form, store and alert collaborators. Every handler runs to
//! completion on the caller's thread.

use geojson::FeatureCollection;
use serde::Serialize;

use crate::collection::WorkoutCollection;
use crate::error::AppError;
use crate::form::{FormInput, FormState};
use crate::host::Host;
use crate::options::AppOptions;
use crate::persistence;
use crate::render::{self, ListEntry, MarkerSpec, PanOptions, TileLayer};
use crate::workout::{ActivityType, Coords, IdGenerator, Workout, WorkoutId};

pub type Result<T> = std::result::Result<T, AppError>;

pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";
pub const NO_LOCATION_MESSAGE: &str = "Could not get your location";

/// A position lookup the host should perform, then report back through
/// [`App::position_resolved`] or [`App::position_failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    pub attempt: u32,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

/// Where geolocation bootstrap stands after a host report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BootstrapStep {
    /// The map is up and workouts can be added.
    Ready,
    /// Ask for the position again.
    Retry(PositionRequest),
    /// No location source; existing workouts can be viewed but no new ones
    /// can be placed.
    Degraded,
}

pub struct App<H: Host> {
    host: H,
    options: AppOptions,
    workouts: WorkoutCollection,
    form: FormState,
    ids: IdGenerator,
    started: bool,
    map_ready: bool,
    locate_attempts: u32,
    degraded: bool,
}

impl<H: Host> App<H> {
    pub fn new(host: H, options: AppOptions) -> Self {
        Self {
            host,
            options,
            workouts: WorkoutCollection::new(),
            form: FormState::default(),
            ids: IdGenerator::new(),
            started: false,
            map_ready: false,
            locate_attempts: 0,
            degraded: false,
        }
    }

    /// Restore saved workouts and return the first position request.
    ///
    /// Restored workouts are listed immediately; their markers wait until
    /// the map exists. Calling it again only repeats the current request.
    pub fn start(&mut self) -> PositionRequest {
        if self.started {
            tracing::debug!("Ignoring repeated start");
            return self.current_position_request();
        }
        self.started = true;
        if self.options.persist {
            self.restore();
        }
        self.next_position_request()
    }

    fn restore(&mut self) {
        let key = self.options.storage_key.clone();
        let Some(blob) = self.host.load(&key) else {
            return;
        };

        match persistence::from_blob(&blob) {
            Ok(records) => {
                for w in &records {
                    self.ids.observe(w.id());
                    self.host.render_entry(&ListEntry::for_workout(w));
                }
                tracing::info!(count = records.len(), "Restored saved workouts");
                self.workouts = WorkoutCollection::from_records(records);
            }
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!(error = %err, key = %key, "Discarding unreadable saved workouts");
                self.host.remove(&key);
                self.workouts = WorkoutCollection::new();
            }
        }
    }

    fn next_position_request(&mut self) -> PositionRequest {
        self.locate_attempts += 1;
        self.current_position_request()
    }

    fn current_position_request(&self) -> PositionRequest {
        PositionRequest {
            attempt: self.locate_attempts,
            timeout_ms: self.options.geolocation.timeout_ms,
            maximum_age_ms: self.options.geolocation.maximum_age_ms,
        }
    }

    /// The host found the user's position: build the map and place markers
    /// for every workout already in the collection.
    pub fn position_resolved(&mut self, position: Coords) -> BootstrapStep {
        if self.map_ready {
            tracing::debug!("Ignoring position after map is ready");
            return BootstrapStep::Ready;
        }
        if !position.lat.is_finite() || !position.lng.is_finite() {
            return self.position_failed("position is not a finite coordinate");
        }

        let zoom = self.options.map_zoom;
        self.host.create_view(position, zoom);
        self.host.add_tile_layer(&TileLayer {
            url_template: self.options.tile_url.clone(),
            attribution: self.options.attribution.clone(),
        });
        self.host.place_marker(&MarkerSpec::position(position));

        self.map_ready = true;
        self.degraded = false;
        for w in self.workouts.iter() {
            self.host.place_marker(&MarkerSpec::for_workout(w));
        }

        tracing::info!(
            lat = position.lat,
            lng = position.lng,
            zoom,
            markers = self.workouts.len(),
            "Map ready"
        );
        BootstrapStep::Ready
    }

    /// The host could not get a position. Retries until the configured
    /// attempt limit, then alerts the user once and degrades.
    pub fn position_failed(&mut self, reason: &str) -> BootstrapStep {
        if self.map_ready {
            return BootstrapStep::Ready;
        }
        if self.degraded {
            return BootstrapStep::Degraded;
        }

        let max_attempts = self.options.geolocation.max_attempts;
        if self.locate_attempts < max_attempts {
            let request = self.next_position_request();
            tracing::warn!(
                reason,
                attempt = request.attempt,
                max_attempts,
                "Geolocation failed, retrying"
            );
            return BootstrapStep::Retry(request);
        }

        let err = AppError::GeolocationUnavailable(reason.to_string());
        tracing::warn!(error = %err, attempts = self.locate_attempts, "Geolocation unavailable");
        self.host.alert(NO_LOCATION_MESSAGE);
        self.degraded = true;
        BootstrapStep::Degraded
    }

    /// A click on the map opens the form for that spot. Ignored until the
    /// map is ready.
    pub fn map_clicked(&mut self, at: Coords) -> bool {
        if !self.map_ready {
            tracing::debug!("Ignoring map click before map is ready");
            return false;
        }
        self.form.open(at);
        self.host.show();
        true
    }

    pub fn activity_changed(&mut self, activity: ActivityType) {
        if self.form.select(activity) {
            if let Some(fields) = self.form.fields() {
                self.host.show_fields(fields);
            }
        }
    }

    /// Validate the form and add the workout.
    ///
    /// On invalid input the user is alerted and nothing changes. On success
    /// the workout is stored, drawn on the map and in the list, the form is
    /// closed and the collection saved.
    pub fn submit(&mut self, input: &FormInput) -> Result<WorkoutId> {
        let Some(pending) = self.form.pending() else {
            tracing::error!("Form submitted while closed");
            return Err(AppError::NoPendingLocation);
        };

        let draft = input.to_draft(pending);
        if let Err(e) = draft.validate() {
            tracing::warn!(error = %e, "Rejected workout input");
            self.host.alert(INVALID_INPUT_MESSAGE);
            return Err(e.into());
        }

        let now = self.host.now();
        let id = self.ids.next(now.timestamp_millis());
        let workout = Workout::create(draft, id.clone(), now)?;

        if self.map_ready {
            self.host.place_marker(&MarkerSpec::for_workout(&workout));
        }
        self.host.render_entry(&ListEntry::for_workout(&workout));
        tracing::info!(
            workout_id = %id,
            activity = workout.activity().as_str(),
            distance_km = workout.distance_km(),
            "Workout added"
        );
        self.workouts.add(workout);

        self.close_form();
        self.save();
        Ok(id)
    }

    /// Close the form without adding a workout.
    pub fn cancel(&mut self) {
        if self.form.is_open() {
            self.close_form();
        }
    }

    fn close_form(&mut self) {
        let reset = self.form.close(self.options.form_redisplay_delay_ms);
        self.host.reset(&reset);
    }

    /// A click in the workout list. `id` is the `data-id` of the clicked
    /// entry, if any; clicks that don't resolve to a workout are ignored.
    /// Returns where the map was moved to.
    pub fn workout_selected(&mut self, id: Option<&str>) -> Option<Coords> {
        let id = WorkoutId(id?.to_string());
        match self.select(&id) {
            Ok(coords) => Some(coords),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring list click");
                None
            }
        }
    }

    fn select(&mut self, id: &WorkoutId) -> Result<Coords> {
        let workout = self
            .workouts
            .find_by_id_mut(id)
            .ok_or_else(|| AppError::RecordNotFound(id.to_string()))?;
        workout.click();
        let coords = workout.coords();

        if self.map_ready {
            self.host.set_view(
                coords,
                self.options.map_zoom,
                PanOptions {
                    animate: true,
                    duration_s: self.options.pan_duration_s,
                },
            );
        }
        self.save();
        Ok(coords)
    }

    fn save(&mut self) {
        if !self.options.persist {
            return;
        }
        let result = persistence::to_blob(&self.workouts)
            .map_err(|e| e.to_string())
            .and_then(|blob| self.host.save(&self.options.storage_key, &blob));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to save workouts");
        }
    }

    /// Delete saved workouts and empty the session.
    pub fn reset(&mut self) {
        self.host.remove(&self.options.storage_key);
        self.workouts.clear();
        self.form = FormState::Closed;
        tracing::info!("Workouts reset");
    }

    pub fn export_geojson(&self) -> FeatureCollection {
        render::to_feature_collection(&self.workouts)
    }

    pub fn workouts(&self) -> &WorkoutCollection {
        &self.workouts
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
