use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::collection::WorkoutCollection;
use crate::workout::{ActivityType, Coords, Workout, WorkoutMetrics};

/// Base map tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

/// Animated recentering of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanOptions {
    pub animate: bool,
    pub duration_s: f64,
}

/// A marker to place on the map. Workout markers carry an open popup; the
/// user's own position is a bare marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    pub coords: Coords,
    pub popup: Option<PopupSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSpec {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl MarkerSpec {
    pub fn position(coords: Coords) -> Self {
        Self {
            coords,
            popup: None,
        }
    }

    pub fn for_workout(workout: &Workout) -> Self {
        let activity = workout.activity();
        Self {
            coords: workout.coords(),
            popup: Some(PopupSpec {
                content: format!("{} {}", activity.icon(), workout.description()),
                class_name: format!("{}-popup", activity.as_str()),
                max_width: 250,
                min_width: 100,
                auto_close: false,
                close_on_click: false,
            }),
        }
    }
}

/// One icon/value/unit cell of a list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailItem {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl DetailItem {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// A workout as shown in the sidebar list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub activity: ActivityType,
    pub title: String,
    pub details: Vec<DetailItem>,
    pub html: String,
}

impl ListEntry {
    pub fn for_workout(workout: &Workout) -> Self {
        let activity = workout.activity();
        let mut details = vec![
            DetailItem::new(activity.icon(), workout.distance_km().to_string(), "km"),
            DetailItem::new("⏱", workout.duration_min().to_string(), "min"),
        ];

        match *workout.metrics() {
            WorkoutMetrics::Running {
                cadence_spm,
                pace_min_per_km,
            } => {
                details.push(DetailItem::new("⚡️", one_decimal(pace_min_per_km), "min/km"));
                details.push(DetailItem::new("🦶🏼", cadence_spm.to_string(), "spm"));
            }
            WorkoutMetrics::Cycling {
                elevation_gain_m,
                speed_km_per_hr,
            } => {
                details.push(DetailItem::new("⚡️", one_decimal(speed_km_per_hr), "km/h"));
                details.push(DetailItem::new("⛰", elevation_gain_m.to_string(), "m"));
            }
        }

        let mut entry = Self {
            id: workout.id().to_string(),
            activity,
            title: workout.description().to_string(),
            details,
            html: String::new(),
        };
        entry.html = entry.to_html();
        entry
    }

    /// `<li>` markup carrying the workout id as `data-id`.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<li class=\"workout workout--{}\" data-id=\"{}\">\n  <h2 class=\"workout__title\">{}</h2>\n",
            self.activity.as_str(),
            escape_html(&self.id),
            escape_html(&self.title),
        );
        for d in &self.details {
            html.push_str(&format!(
                "  <div class=\"workout__details\">\n    <span class=\"workout__icon\">{}</span>\n    <span class=\"workout__value\">{}</span>\n    <span class=\"workout__unit\">{}</span>\n  </div>\n",
                d.icon,
                escape_html(&d.value),
                d.unit,
            ));
        }
        html.push_str("</li>");
        html
    }
}

/// One decimal place, halves rounded away from zero (4.25 shows as 4.3).
fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Export all workouts as a GeoJSON FeatureCollection of points.
pub fn to_feature_collection(workouts: &WorkoutCollection) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: workouts.iter().map(workout_to_feature).collect(),
        foreign_members: None,
    }
}

fn workout_to_feature(workout: &Workout) -> Feature {
    let coords = workout.coords();
    // GeoJSON positions are [lon, lat]
    let geometry = Geometry::new(Value::Point(vec![coords.lng, coords.lat]));

    let mut props = Map::new();
    props.insert(
        "type".to_string(),
        JsonValue::String(workout.activity().as_str().to_string()),
    );
    props.insert(
        "description".to_string(),
        JsonValue::String(workout.description().to_string()),
    );
    props.insert(
        "createdAt".to_string(),
        JsonValue::String(workout.created_at().to_rfc3339()),
    );
    insert_number(&mut props, "distanceKm", workout.distance_km());
    insert_number(&mut props, "durationMin", workout.duration_min());
    props.insert(
        "clicks".to_string(),
        JsonValue::Number(workout.click_count().into()),
    );

    match *workout.metrics() {
        WorkoutMetrics::Running {
            cadence_spm,
            pace_min_per_km,
        } => {
            insert_number(&mut props, "cadenceSpm", cadence_spm);
            insert_number(&mut props, "paceMinPerKm", pace_min_per_km);
        }
        WorkoutMetrics::Cycling {
            elevation_gain_m,
            speed_km_per_hr,
        } => {
            insert_number(&mut props, "elevationGainM", elevation_gain_m);
            insert_number(&mut props, "speedKmPerHr", speed_km_per_hr);
        }
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(geojson::feature::Id::String(workout.id().to_string())),
        properties: Some(props),
        foreign_members: None,
    }
}

fn insert_number(props: &mut Map<String, JsonValue>, key: &str, value: f64) {
    if let Some(n) = serde_json::Number::from_f64(value) {
        props.insert(key.to_string(), JsonValue::Number(n));
    }
}
