//! Input form session: which map location the open form targets and which
//! type-specific row is visible.

use serde::{Deserialize, Serialize};

use crate::workout::{ActivityType, Coords, WorkoutDraft};

/// Which type-specific input row is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSet {
    #[default]
    Running,
    Cycling,
}

impl FieldSet {
    pub fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Cycling,
            Self::Cycling => Self::Running,
        }
    }
}

impl From<ActivityType> for FieldSet {
    fn from(activity: ActivityType) -> Self {
        match activity {
            ActivityType::Running => Self::Running,
            ActivityType::Cycling => Self::Cycling,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Open { pending: Coords, fields: FieldSet },
}

/// Instruction to clear and hide the form, re-enabling its layout after a
/// delay so the hide transition doesn't flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReset {
    pub redisplay_after_ms: u32,
}

impl FormState {
    /// Target the form at a map click. Re-clicking while open moves the
    /// pending location and resets the visible rows.
    pub fn open(&mut self, pending: Coords) {
        *self = Self::Open {
            pending,
            fields: FieldSet::default(),
        };
    }

    /// Flip between running and cycling rows. Returns the new field set, or
    /// `None` when the form is closed.
    pub fn toggle_fields(&mut self) -> Option<FieldSet> {
        match self {
            Self::Open { fields, .. } => {
                *fields = fields.toggled();
                Some(*fields)
            }
            Self::Closed => None,
        }
    }

    /// Show the rows for `activity`. Returns whether the visible rows changed.
    pub fn select(&mut self, activity: ActivityType) -> bool {
        match self {
            Self::Open { fields, .. } => {
                let wanted = FieldSet::from(activity);
                let changed = *fields != wanted;
                *fields = wanted;
                changed
            }
            Self::Closed => false,
        }
    }

    pub fn close(&mut self, redisplay_after_ms: u32) -> FormReset {
        *self = Self::Closed;
        FormReset { redisplay_after_ms }
    }

    pub fn pending(&self) -> Option<Coords> {
        match self {
            Self::Open { pending, .. } => Some(*pending),
            Self::Closed => None,
        }
    }

    pub fn fields(&self) -> Option<FieldSet> {
        match self {
            Self::Open { fields, .. } => Some(*fields),
            Self::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Raw values of the five form inputs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    #[serde(rename = "type")]
    pub activity: Option<ActivityType>,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default)]
    pub elevation: String,
}

impl FormInput {
    /// Build a draft for `pending`. Only the row matching the activity type
    /// is read; a missing type defaults to running like the `<select>`.
    pub fn to_draft(&self, pending: Coords) -> WorkoutDraft {
        let distance = parse_number(&self.distance);
        let duration = parse_number(&self.duration);
        match self.activity.unwrap_or(ActivityType::Running) {
            ActivityType::Running => {
                WorkoutDraft::running(pending, distance, duration, parse_number(&self.cadence))
            }
            ActivityType::Cycling => {
                WorkoutDraft::cycling(pending, distance, duration, parse_number(&self.elevation))
            }
        }
    }
}

/// Numeric value of an input field: blank is 0, anything unparsable is NaN.
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_toggle_close() {
        let mut form = FormState::default();
        assert!(!form.is_open());
        assert_eq!(form.toggle_fields(), None);

        let at = Coords::new(10.0, 20.0);
        form.open(at);
        assert_eq!(form.pending(), Some(at));
        assert_eq!(form.fields(), Some(FieldSet::Running));

        assert_eq!(form.toggle_fields(), Some(FieldSet::Cycling));
        assert_eq!(form.pending(), Some(at));
        assert_eq!(form.toggle_fields(), Some(FieldSet::Running));

        let reset = form.close(1000);
        assert_eq!(reset.redisplay_after_ms, 1000);
        assert_eq!(form, FormState::Closed);
        assert_eq!(form.pending(), None);
    }

    #[test]
    fn test_select_keeps_pending() {
        let mut form = FormState::default();
        assert!(!form.select(ActivityType::Cycling));

        form.open(Coords::new(1.0, 1.0));
        assert!(form.select(ActivityType::Cycling));
        assert!(!form.select(ActivityType::Cycling));
        assert_eq!(form.pending(), Some(Coords::new(1.0, 1.0)));

        form.open(Coords::new(2.0, 2.0));
        assert_eq!(form.pending(), Some(Coords::new(2.0, 2.0)));
        assert_eq!(form.fields(), Some(FieldSet::Running));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("5.2"), 5.2);
        assert_eq!(parse_number("  24 "), 24.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("-1"), -1.0);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("5km").is_nan());
    }

    #[test]
    fn test_to_draft_reads_matching_row() {
        let input = FormInput {
            activity: Some(ActivityType::Cycling),
            distance: "27".to_string(),
            duration: "95".to_string(),
            cadence: "oops".to_string(),
            elevation: "523".to_string(),
        };
        let draft = input.to_draft(Coords::new(39.0, -12.0));
        assert_eq!(draft.activity, ActivityType::Cycling);
        assert_eq!(draft.type_specific, 523.0);
        assert!(draft.validate().is_ok());

        let input = FormInput {
            activity: None,
            distance: "5.2".to_string(),
            duration: "24".to_string(),
            cadence: "178".to_string(),
            elevation: String::new(),
        };
        let draft = input.to_draft(Coords::new(39.0, -12.0));
        assert_eq!(draft.activity, ActivityType::Running);
        assert_eq!(draft.type_specific, 178.0);
    }
}
