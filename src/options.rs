use serde::Deserialize;

/// Application settings, passed from JavaScript when the app is created.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOptions {
    /// Zoom level for the initial view and for panning to a workout (default: 13)
    #[serde(default = "default_zoom")]
    pub map_zoom: u8,

    /// Tile layer URL template
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    /// Tile layer attribution HTML
    #[serde(default = "default_attribution")]
    pub attribution: String,

    /// Key under which workouts are stored (default: "workouts")
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Save workouts to the key-value store and restore them on start (default: true)
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Delay before the hidden form's layout is restored (default: 1000)
    #[serde(default = "default_redisplay_delay")]
    pub form_redisplay_delay_ms: u32,

    /// Duration of the pan animation when a workout is selected (default: 1.0)
    #[serde(default = "default_pan_duration")]
    pub pan_duration_s: f64,

    #[serde(default)]
    pub geolocation: GeolocationOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            map_zoom: default_zoom(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            storage_key: default_storage_key(),
            persist: true,
            form_redisplay_delay_ms: default_redisplay_delay(),
            pan_duration_s: default_pan_duration(),
            geolocation: GeolocationOptions::default(),
        }
    }
}

/// How the host should request the user's position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationOptions {
    /// Per-attempt timeout (default: 10000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u32,

    /// Maximum age of a cached position (default: 0)
    #[serde(default)]
    pub maximum_age_ms: u32,

    /// Attempts before giving up, including the first one (default: 3)
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout(),
            maximum_age_ms: 0,
            max_attempts: default_attempts(),
        }
    }
}

fn default_zoom() -> u8 {
    13
}

fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".to_string()
}

fn default_attribution() -> String {
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
        .to_string()
}

fn default_storage_key() -> String {
    "workouts".to_string()
}

fn default_true() -> bool {
    true
}

fn default_redisplay_delay() -> u32 {
    1000
}

fn default_pan_duration() -> f64 {
    1.0
}

fn default_timeout() -> u32 {
    10_000
}

fn default_attempts() -> u32 {
    3
}
